use crate::unicode::{self, EncodingError};
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

/// Decoded input text together with the digest of its raw bytes
///
/// The digest is computed over the undecoded bytes, before any decoding or
/// punctuation normalization, so changes to those stages never shift it.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    pub raw_digest: String,
    pub byte_len: usize,
}

impl SourceText {
    /// Character length of the decoded text, the coordinate space all span
    /// offsets refer to
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Read and decode an input file, failing on undecodable content
///
/// `EncodingError` is the one fatal error class in the pipeline: no spans are
/// ever applied to a buffer that could not be decoded losslessly.
pub async fn read_source<P: AsRef<Path>>(path: P) -> Result<SourceText> {
    let path = path.as_ref();
    debug!("Reading input file: {}", path.display());

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read input file: {}", path.display()))?;

    let raw_digest = digest_hex(&bytes);
    let text = unicode::decode(&bytes)
        .map_err(|e: EncodingError| anyhow::Error::new(e))
        .with_context(|| format!("undecodable input file: {}", path.display()))?;

    info!(
        "Read {}: {} bytes, {} chars, digest {}",
        path.display(),
        bytes.len(),
        text.chars().count(),
        &raw_digest[..12]
    );

    Ok(SourceText {
        text,
        raw_digest,
        byte_len: bytes.len(),
    })
}

/// SHA-256 hex digest of a byte buffer
pub fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_source_valid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("input.txt");
        tokio::fs::write(&path, "John went home.").await.unwrap();

        let source = read_source(&path).await.unwrap();
        assert_eq!(source.text, "John went home.");
        assert_eq!(source.byte_len, 15);
        assert_eq!(source.char_len(), 15);
        assert_eq!(source.raw_digest.len(), 64);
    }

    #[tokio::test]
    async fn test_read_source_invalid_utf8_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.txt");
        tokio::fs::write(&path, b"caf\xE9 owner".as_slice()).await.unwrap();

        assert!(read_source(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_read_source_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.txt");
        assert!(read_source(&missing).await.is_err());
    }

    #[test]
    fn test_digest_is_stable_and_content_sensitive() {
        let a = digest_hex(b"identical content");
        let b = digest_hex(b"identical content");
        assert_eq!(a, b);

        // One changed byte must change the digest (cache invalidation rests on this)
        let c = digest_hex(b"identical content!");
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_digest_covers_raw_bytes_not_normalized_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("curly.txt");
        // Curly apostrophe: normalization changes the text but not the digest
        tokio::fs::write(&path, "it\u{2019}s fine").await.unwrap();

        let source = read_source(&path).await.unwrap();
        assert_eq!(source.raw_digest, digest_hex("it\u{2019}s fine".as_bytes()));
    }
}
