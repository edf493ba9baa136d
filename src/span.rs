// WHY: Shared span data model for the whole pipeline (normalizer, engine, cache)
// Offsets are zero-based character (Unicode scalar) indices, half-open [start, end)

use serde::{Deserialize, Serialize};

/// Semantic class of a tagged span, as produced by the external tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    PersonName,
    Pronoun,
    PossessiveName,
    HyphenFragment,
}

/// Grammatical case attribute carried by pronoun spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PronounCase {
    Subject,
    Object,
    PossessiveDeterminer,
    PossessivePronoun,
    Reflexive,
}

/// A resolved replacement span over the original text's character offsets
///
/// `replacement` is `Some` for name-kind spans (the caller token, resolved at
/// ingest) and `None` for pronouns, which the replacement engine resolves
/// through the pronoun table at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
    /// Original substring covered by the span
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<PronounCase>,
}

impl Span {
    /// Character length of the covered region
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True when the two spans share at least one character position
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely within this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the spans touch end-to-start without overlapping
    pub fn is_adjacent_to(&self, other: &Span) -> bool {
        self.end == other.start || other.end == self.start
    }
}

/// Why a region was deliberately left alone (or merged) for human review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissReason {
    Possessive,
    Hyphenated,
    LowConfidence,
}

/// Advisory record of text the engine did not (or only partially) alter
/// Never mutates output; surfaced to the caller and persisted in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleMiss {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub reason: MissReason,
}

/// Ordered, non-overlapping span sequence produced by the normalizer
///
/// Invariant: sorted ascending by `start`, and `spans[i].end <= spans[i+1].start`
/// for all i. Consumed exactly once per pipeline run by the replacement engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanSet(Vec<Span>);

impl SpanSet {
    /// Wrap an already-resolved span list
    /// WHY: only the normalizer and the cache codec construct SpanSets; both
    /// guarantee the ordering invariant, asserted here in debug builds
    pub(crate) fn from_resolved(spans: Vec<Span>) -> Self {
        let set = SpanSet(spans);
        debug_assert!(set.invariant_holds());
        set
    }

    /// Check the sorted/non-overlap invariant
    pub fn invariant_holds(&self) -> bool {
        self.0
            .windows(2)
            .all(|w| w[0].start <= w[1].start && w[0].end <= w[1].start)
            && self.0.iter().all(|s| s.start < s.end)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Span] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a SpanSet {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
