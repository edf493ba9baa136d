// WHY: resolved spans are cached beside the input so reprocessing (different
// output mode, reviewed misses) never has to re-invoke the external tagger
// All cache decisions are explicit branches in the driver; nothing here keeps
// process state

use crate::span::{PossibleMiss, SpanSet};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Bump when the record schema changes; mismatches force regeneration,
/// never partial deserialization
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Persisted output of one tagging+normalization pass over an input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// SHA-256 hex digest of the raw undecoded input bytes
    pub source_digest: String,
    pub format_version: u32,
    pub spans: SpanSet,
    pub possible_misses: Vec<PossibleMiss>,
}

impl CacheRecord {
    pub fn new(source_digest: String, spans: SpanSet, possible_misses: Vec<PossibleMiss>) -> Self {
        Self {
            source_digest,
            format_version: CACHE_FORMAT_VERSION,
            spans,
            possible_misses,
        }
    }

    /// True when every name-kind span carries `token` as its replacement
    ///
    /// Cached spans embed the token they were resolved with; a caller asking
    /// for a different one needs to regenerate the cache to get it applied.
    pub fn uses_replacement_token(&self, token: &str) -> bool {
        self.spans
            .iter()
            .all(|s| s.replacement.as_deref().map_or(true, |t| t == token))
    }
}

/// Outcome of a cache probe; missing/unreadable caches are values, not errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(CacheRecord),
    NotFound,
    VersionMismatch { found: u32, expected: u32 },
}

/// Generate the cache file path from the source file path
/// Deterministic naming keeps the side file discoverable next to its input
pub fn cache_path(source_path: &Path) -> PathBuf {
    let mut path = source_path.to_path_buf();
    let file_stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    path.set_file_name(format!("{file_stem}_redactions.json"));
    path
}

/// Persist a cache record as pretty-printed JSON
pub async fn save(record: &CacheRecord, destination: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(record)?;
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(destination, content).await?;
    Ok(())
}

/// Load a cache record, degrading every failure mode to a fallback value
///
/// A missing, unreadable, or unparseable file is `NotFound` (the pipeline
/// falls through to full re-tagging); a parseable record with a different
/// schema version is `VersionMismatch` and is never partially deserialized.
pub async fn load(source: &Path) -> CacheLookup {
    let content = match fs::read_to_string(source).await {
        Ok(content) => content,
        Err(_) => return CacheLookup::NotFound,
    };

    // Version is checked before the full record is interpreted
    #[derive(Deserialize)]
    struct VersionProbe {
        format_version: u32,
    }
    let version = match serde_json::from_str::<VersionProbe>(&content) {
        Ok(probe) => probe.format_version,
        Err(_) => return CacheLookup::NotFound,
    };
    if version != CACHE_FORMAT_VERSION {
        return CacheLookup::VersionMismatch {
            found: version,
            expected: CACHE_FORMAT_VERSION,
        };
    }

    match serde_json::from_str::<CacheRecord>(&content) {
        // The side file is human-inspectable and therefore hand-editable; a
        // record whose spans violate the ordering invariant must never reach
        // the replacement engine
        Ok(record) if !record.spans.invariant_holds() => {
            warn!(
                "cache record violates span ordering, regenerating: {}",
                source.display()
            );
            CacheLookup::NotFound
        }
        Ok(record) => CacheLookup::Hit(record),
        Err(_) => CacheLookup::NotFound,
    }
}
