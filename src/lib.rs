pub mod cache;
pub mod normalizer;
pub mod pipeline;
pub mod pronouns;
pub mod reader;
pub mod replace;
pub mod span;
pub mod tagger;
pub mod unicode;

// Re-export main types for convenient access
pub use span::{MissReason, PossibleMiss, PronounCase, Span, SpanKind, SpanSet};

pub use cache::{CacheLookup, CacheRecord, CACHE_FORMAT_VERSION};
pub use pronouns::{PronounEntry, PronounMapper};
pub use replace::{OutputMode, RedactedOutput};
pub use unicode::EncodingError;
