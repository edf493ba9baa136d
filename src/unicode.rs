// WHY: standalone punctuation canonicalization kept strictly length-preserving
// Every substitution is one scalar value for one scalar value, so character
// offsets computed before normalization stay valid afterwards with no remap pass

use crate::span::Span;
use thiserror::Error;

/// Input bytes could not be decoded into a stable code-point sequence
/// The only fatal error class in the pipeline; raised before any span is applied
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    #[error("input is not valid UTF-8 at byte offset {offset}")]
    InvalidUtf8 { offset: usize },
}

/// Decode raw input bytes into text, failing loudly on invalid sequences
/// WHY: silently mangling bytes here would corrupt every downstream offset
pub fn decode(bytes: &[u8]) -> Result<String, EncodingError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(e) => Err(EncodingError::InvalidUtf8 {
            offset: e.valid_up_to(),
        }),
    }
}

/// Single-codepoint substitutions applied before span application
/// Curly quotes, dashes, and non-breaking spaces collapse to ASCII equivalents
const SUBSTITUTIONS: &[(char, char)] = &[
    ('\u{2018}', '\''), // left single quotation mark
    ('\u{2019}', '\''), // right single quotation mark
    ('\u{201A}', '\''), // single low-9 quotation mark
    ('\u{201B}', '\''), // single high-reversed-9 quotation mark
    ('\u{201C}', '"'),  // left double quotation mark
    ('\u{201D}', '"'),  // right double quotation mark
    ('\u{201E}', '"'),  // double low-9 quotation mark
    ('\u{201F}', '"'),  // double high-reversed-9 quotation mark
    ('\u{2013}', '-'),  // en dash
    ('\u{2014}', '-'),  // em dash
    ('\u{2212}', '-'),  // minus sign
    ('\u{00A0}', ' '),  // no-break space
    ('\u{202F}', ' '),  // narrow no-break space
    ('\u{2007}', ' '),  // figure space
];

/// Canonicalize punctuation variants, one code point for one code point
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        result.push(substitute(ch));
    }
    result
}

fn substitute(ch: char) -> char {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == ch)
        .map(|(_, to)| *to)
        .unwrap_or(ch)
}

/// Re-validate span bounds against the normalized text
///
/// Normalization is length-preserving, so this can only fail if the caller
/// handed in spans computed against a different buffer entirely.
pub fn spans_within_bounds(spans: &[Span], text: &str) -> bool {
    let char_len = text.chars().count();
    spans.iter().all(|s| s.start < s.end && s.end <= char_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Span, SpanKind};

    #[test]
    fn test_decode_valid_utf8() {
        let text = decode("Hello, 世界".as_bytes()).unwrap();
        assert_eq!(text, "Hello, 世界");
    }

    #[test]
    fn test_decode_invalid_utf8_fails_with_offset() {
        let bytes = b"valid\xFF\xFEtail";
        let err = decode(bytes).unwrap_err();
        match err {
            EncodingError::InvalidUtf8 { offset } => assert_eq!(offset, 5),
        }
    }

    #[test]
    fn test_normalize_curly_quotes() {
        assert_eq!(normalize_text("\u{201C}John\u{201D}"), "\"John\"");
        assert_eq!(normalize_text("it\u{2019}s"), "it's");
    }

    #[test]
    fn test_normalize_dashes_and_spaces() {
        assert_eq!(normalize_text("a\u{2014}b\u{2013}c"), "a-b-c");
        assert_eq!(normalize_text("a\u{00A0}b"), "a b");
    }

    #[test]
    fn test_normalize_passes_other_text_through() {
        let text = "Unchanged ASCII and 世界 stay put.";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn test_all_substitutions_length_preserving() {
        // The offset-stability guarantee rests on this property
        for (from, to) in SUBSTITUTIONS {
            let original: String = std::iter::once(*from).collect();
            let normalized = normalize_text(&original);
            assert_eq!(normalized.chars().count(), 1, "{from:?} -> {to:?}");
            assert_eq!(normalized.chars().next(), Some(*to));
        }
    }

    #[test]
    fn test_normalization_preserves_char_count() {
        let text = "\u{201C}He said\u{201D}\u{2014}\u{00A0}loudly";
        let normalized = normalize_text(text);
        assert_eq!(text.chars().count(), normalized.chars().count());
    }

    #[test]
    fn test_spans_within_bounds() {
        let text = "John went home";
        let ok = Span {
            start: 0,
            end: 4,
            kind: SpanKind::PersonName,
            text: "John".to_string(),
            replacement: None,
            case: None,
        };
        let past_end = Span { start: 10, end: 20, ..ok.clone() };

        assert!(spans_within_bounds(&[ok.clone()], text));
        assert!(!spans_within_bounds(&[ok, past_end], text));
    }

    #[test]
    fn test_spans_within_bounds_char_offsets_not_bytes() {
        // 世界 is 2 chars but 6 bytes; bounds are in chars
        let text = "世界 hi";
        let span = Span {
            start: 3,
            end: 5,
            kind: SpanKind::PersonName,
            text: "hi".to_string(),
            replacement: None,
            case: None,
        };
        assert!(spans_within_bounds(&[span], text));
    }
}
