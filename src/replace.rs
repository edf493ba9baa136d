// WHY: text mutation isolated from span resolution; consumes a SpanSet whose
// non-overlap invariant already holds, so splicing needs no conflict handling
//
// Spans are processed in descending start order: edits at higher offsets never
// move the text under spans that have not been processed yet, so the original
// character offsets stay valid for the whole pass.

use crate::pronouns::PronounMapper;
use crate::span::{MissReason, PossibleMiss, Span, SpanKind, SpanSet};

/// Output rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Plain,
    Html,
}

/// Inline color for name-class replacements in HTML mode
const NAME_COLOR: &str = "#1f77b4";
/// Inline color for pronoun-class replacements in HTML mode
const PRONOUN_COLOR: &str = "#d62728";

/// Result of applying a SpanSet to a text buffer
#[derive(Debug, Clone)]
pub struct RedactedOutput {
    pub text: String,
    /// Advisories generated during application (unmapped pronoun forms)
    pub misses: Vec<PossibleMiss>,
}

/// Apply a resolved SpanSet to the text, producing the redacted buffer
///
/// Pronoun spans are resolved through the mapper at this point; unmapped
/// surface forms pass through unchanged and yield a LowConfidence advisory.
/// Name-kind spans use their pre-resolved replacement token verbatim.
pub fn apply(
    text: &str,
    spans: &SpanSet,
    mode: OutputMode,
    mapper: &PronounMapper,
) -> RedactedOutput {
    // Spans address characters; splicing addresses bytes
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());

    let mut misses = Vec::new();
    // Pieces are collected back-to-front, then reversed into the final buffer
    let mut pieces: Vec<String> = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = text.len();

    for span in spans.iter().rev() {
        let byte_start = boundaries[span.start];
        let byte_end = boundaries[span.end];

        pieces.push(passthrough(&text[byte_end..cursor], mode));
        pieces.push(render_replacement(span, mode, mapper, &mut misses));
        cursor = byte_start;
    }
    pieces.push(passthrough(&text[..cursor], mode));

    let mut result = String::with_capacity(text.len());
    for piece in pieces.iter().rev() {
        result.push_str(piece);
    }

    misses.sort_by_key(|m| (m.start, m.end));
    RedactedOutput {
        text: result,
        misses,
    }
}

fn render_replacement(
    span: &Span,
    mode: OutputMode,
    mapper: &PronounMapper,
    misses: &mut Vec<PossibleMiss>,
) -> String {
    match span.kind {
        SpanKind::Pronoun => match mapper.lookup(&span.text, span.case) {
            Some(neutral) => annotate(neutral, PRONOUN_COLOR, mode),
            None => {
                misses.push(PossibleMiss {
                    start: span.start,
                    end: span.end,
                    text: span.text.clone(),
                    reason: MissReason::LowConfidence,
                });
                passthrough(&span.text, mode)
            }
        },
        SpanKind::PersonName | SpanKind::PossessiveName | SpanKind::HyphenFragment => {
            match &span.replacement {
                Some(token) => annotate(token, NAME_COLOR, mode),
                None => {
                    // A name span without a resolved token cannot be applied
                    misses.push(PossibleMiss {
                        start: span.start,
                        end: span.end,
                        text: span.text.clone(),
                        reason: MissReason::LowConfidence,
                    });
                    passthrough(&span.text, mode)
                }
            }
        }
    }
}

fn passthrough(text: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Plain => text.to_string(),
        OutputMode::Html => escape_html(text),
    }
}

fn annotate(replacement: &str, color: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Plain => replacement.to_string(),
        // Empty replacements (deleted honorifics) leave no marker behind
        OutputMode::Html if replacement.is_empty() => String::new(),
        OutputMode::Html => format!(
            "<span style=\"color:{}\">{}</span>",
            color,
            escape_html(replacement)
        ),
    }
}

/// Minimal escaping for HTML fragment output: only reserved characters
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
