// WHY: the NLP tagger lives outside this crate; this module pins down the
// schema of its output and turns raw tagged records into resolved spans
// Offsets in tagger output are character offsets into the decoded source text

use crate::span::{PronounCase, Span, SpanKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// One raw record from the external entity/pronoun tagger
/// The core trusts these offsets refer to the original decoded text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
    pub text: String,
    /// Grammatical case, present on pronoun records only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<PronounCase>,
}

/// Read a tagger output file: a JSON array of tagged span records
pub async fn load_tagged_spans(path: &Path) -> Result<Vec<TaggedSpan>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read tagger output: {}", path.display()))?;
    let spans: Vec<TaggedSpan> = serde_json::from_str(&content)
        .with_context(|| format!("malformed tagger output: {}", path.display()))?;
    Ok(spans)
}

/// Resolve raw tagged records into spans carrying their replacement text
///
/// Name-kind spans take the caller-supplied token verbatim, no case
/// adjustment. Pronoun spans stay unresolved; the replacement engine maps
/// them through the pronoun table at apply time.
pub fn resolve_spans(tagged: Vec<TaggedSpan>, replacement_token: &str) -> Vec<Span> {
    tagged
        .into_iter()
        .map(|t| {
            let replacement = match t.kind {
                SpanKind::Pronoun => None,
                SpanKind::PersonName | SpanKind::PossessiveName | SpanKind::HyphenFragment => {
                    Some(replacement_token.to_string())
                }
            };
            Span {
                start: t.start,
                end: t.end,
                kind: t.kind,
                text: t.text,
                replacement,
                case: t.case,
            }
        })
        .collect()
}
