// WHY: lib-side orchestration of the core stages so the CLI driver and the
// integration tests share one code path
// Single-threaded and synchronous: nothing here suspends or shares state
// between runs, so batch callers can run one pipeline per file freely

use crate::normalizer;
use crate::pronouns::PronounMapper;
use crate::replace::{self, OutputMode, RedactedOutput};
use crate::span::{PossibleMiss, Span, SpanSet};
use crate::unicode;
use anyhow::Result;

/// Resolve raw tagged spans into the final non-overlapping set plus advisories
pub fn resolve(raw_spans: Vec<Span>, text_char_len: usize) -> (SpanSet, Vec<PossibleMiss>) {
    normalizer::normalize(raw_spans, text_char_len)
}

/// Canonicalize the text and apply the resolved span set
///
/// Punctuation normalization is length-preserving, so the span offsets stay
/// valid; the ordering invariant and the bounds are still re-checked and a
/// violation is an error, since it means the spans came from some other
/// buffer or a tampered cache record.
pub fn redact(
    text: &str,
    spans: &SpanSet,
    mode: OutputMode,
    mapper: &PronounMapper,
) -> Result<RedactedOutput> {
    if !spans.invariant_holds() {
        anyhow::bail!("span set violates ordering invariant; regenerate the span cache");
    }
    let normalized = unicode::normalize_text(text);
    if !unicode::spans_within_bounds(spans.as_slice(), &normalized) {
        anyhow::bail!("span offsets exceed text bounds; spans do not match this input");
    }
    Ok(replace::apply(&normalized, spans, mode, mapper))
}
