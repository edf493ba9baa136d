// WHY: standalone span-resolution logic separated from text mutation
// Everything here is pure: raw tagged spans in, resolved SpanSet plus
// advisory possible-miss records out. Deterministic and independent of the
// order the tagger emitted the spans in.

use crate::span::{MissReason, PossibleMiss, Span, SpanKind, SpanSet};

/// Validate, deduplicate, and resolve overlaps among raw tagged spans
///
/// Resolution policy:
/// - malformed spans (degenerate or out of bounds) become LowConfidence misses
/// - exact duplicate extents collapse to one span, silently
/// - a span strictly contained in a longer span loses, silently
/// - crossing overlaps (partial, not nested) drop both spans, each flagged
/// - HyphenFragment spans touching a PersonName merge into it, flagged
/// - PossessiveName markers are left untouched in output, flagged
pub fn normalize(raw_spans: Vec<Span>, text_len: usize) -> (SpanSet, Vec<PossibleMiss>) {
    let mut misses = Vec::new();

    // Malformed spans are downgraded to advisories, never errors; one bad
    // tagger record must not abort the whole document
    let mut spans: Vec<Span> = Vec::with_capacity(raw_spans.len());
    for span in raw_spans {
        if span.start >= span.end || span.end > text_len {
            misses.push(PossibleMiss {
                start: span.start,
                end: span.end,
                text: span.text,
                reason: MissReason::LowConfidence,
            });
        } else {
            spans.push(span);
        }
    }

    // Canonical order makes every later decision input-order independent
    spans.sort_by_key(|s| (s.start, s.end, kind_rank(s.kind)));
    spans.dedup_by(|a, b| a.start == b.start && a.end == b.end);

    let spans = resolve_containment(spans);
    let mut spans = resolve_crossings(spans, &mut misses);
    merge_hyphen_fragments(&mut spans, &mut misses);
    extract_possessive_markers(&mut spans, &mut misses);

    spans.sort_by_key(|s| (s.start, s.end));
    misses.sort_by_key(|m| (m.start, m.end));

    (SpanSet::from_resolved(spans), misses)
}

fn kind_rank(kind: SpanKind) -> u8 {
    match kind {
        SpanKind::PersonName => 0,
        SpanKind::PossessiveName => 1,
        SpanKind::Pronoun => 2,
        SpanKind::HyphenFragment => 3,
    }
}

/// Longer span wins; a strictly contained loser is discarded silently
fn resolve_containment(spans: Vec<Span>) -> Vec<Span> {
    let mut keep = vec![true; spans.len()];
    for i in 0..spans.len() {
        for j in 0..spans.len() {
            if i != j && spans[j].len() > spans[i].len() && spans[j].contains(&spans[i]) {
                keep[i] = false;
                break;
            }
        }
    }
    spans
        .into_iter()
        .zip(keep)
        .filter_map(|(s, k)| k.then_some(s))
        .collect()
}

/// Partially overlapping spans that are neither nested nor equal are both
/// dropped and surfaced for review — ambiguity resolved toward non-corruption
fn resolve_crossings(spans: Vec<Span>, misses: &mut Vec<PossibleMiss>) -> Vec<Span> {
    let mut keep = vec![true; spans.len()];
    for i in 0..spans.len() {
        for j in (i + 1)..spans.len() {
            if spans[j].start >= spans[i].end {
                break; // sorted by start, nothing further can overlap i
            }
            if spans[i].overlaps(&spans[j]) {
                keep[i] = false;
                keep[j] = false;
            }
        }
    }
    let mut result = Vec::with_capacity(spans.len());
    for (span, kept) in spans.into_iter().zip(keep) {
        if kept {
            result.push(span);
        } else {
            misses.push(PossibleMiss {
                start: span.start,
                end: span.end,
                text: span.text,
                reason: MissReason::LowConfidence,
            });
        }
    }
    result
}

/// Fold HyphenFragment spans touching a PersonName into that name's extent
/// The merge is auditable: each one leaves a Hyphenated advisory behind
fn merge_hyphen_fragments(spans: &mut Vec<Span>, misses: &mut Vec<PossibleMiss>) {
    let mut i = 0;
    while i < spans.len() {
        if spans[i].kind != SpanKind::HyphenFragment {
            i += 1;
            continue;
        }
        let fragment = spans.remove(i);

        let target = spans
            .iter()
            .position(|s| s.kind == SpanKind::PersonName && s.is_adjacent_to(&fragment));
        match target {
            Some(t) => {
                let name = &mut spans[t];
                if fragment.start == name.end {
                    name.end = fragment.end;
                    name.text.push_str(&fragment.text);
                } else {
                    name.start = fragment.start;
                    name.text = format!("{}{}", fragment.text, name.text);
                }
                misses.push(PossibleMiss {
                    start: name.start,
                    end: name.end,
                    text: name.text.clone(),
                    reason: MissReason::Hyphenated,
                });
            }
            None => {
                // Orphan fragment: replacing it in isolation risks mid-word
                // corruption, so it is flagged instead
                misses.push(PossibleMiss {
                    start: fragment.start,
                    end: fragment.end,
                    text: fragment.text,
                    reason: MissReason::Hyphenated,
                });
            }
        }
    }
}

/// Possessive markers stay in the output text; blanket removal risks
/// grammatical corruption, so they are surfaced for human review instead
fn extract_possessive_markers(spans: &mut Vec<Span>, misses: &mut Vec<PossibleMiss>) {
    let mut i = 0;
    while i < spans.len() {
        if spans[i].kind == SpanKind::PossessiveName {
            let marker = spans.remove(i);
            misses.push(PossibleMiss {
                start: marker.start,
                end: marker.end,
                text: marker.text,
                reason: MissReason::Possessive,
            });
        } else {
            i += 1;
        }
    }
}
