use anyhow::Result;
use clap::Parser;
use redact::cache::{self, CacheLookup, CacheRecord};
use redact::pipeline;
use redact::pronouns::PronounMapper;
use redact::reader;
use redact::replace::OutputMode;
use redact::tagger;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "redact")]
#[command(about = "Redact person names and gendered pronouns from free text")]
#[command(version)]
struct Args {
    /// Input text file to redact
    input: PathBuf,

    /// Replacement token for person names
    #[arg(short, long)]
    replacement: String,

    /// Tagger output file (JSON array of tagged spans)
    #[arg(long)]
    spans: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit an HTML fragment with color-coded replacements
    #[arg(long)]
    html: bool,

    /// Skip the span cache and resolve from the tagger output file
    #[arg(long)]
    ignore_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: logs go to stderr so stdout stays clean for the redacted text
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    // WHY: validate the input early to fail fast with a clear error
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }
    if !args.input.is_file() {
        anyhow::bail!("Input path is not a file: {}", args.input.display());
    }

    let source = reader::read_source(&args.input).await?;

    let cache_path = cache::cache_path(&args.input);
    let record = match load_cached(&cache_path, &source.raw_digest, args.ignore_cache).await {
        Some(record) => {
            info!("Cache hit: {} ({} spans)", cache_path.display(), record.spans.len());
            if !record.uses_replacement_token(&args.replacement) {
                warn!(
                    "cached spans embed a different replacement token; \
                     pass --ignore-cache to apply {:?}",
                    args.replacement
                );
            }
            record
        }
        None => {
            let spans_path = args.spans.as_ref().ok_or_else(|| {
                anyhow::anyhow!(
                    "no usable span cache at {} and no --spans tagger output given",
                    cache_path.display()
                )
            })?;

            let tagged = tagger::load_tagged_spans(spans_path).await?;
            info!("Loaded {} tagged spans from {}", tagged.len(), spans_path.display());

            let raw = tagger::resolve_spans(tagged, &args.replacement);
            let (spans, misses) = pipeline::resolve(raw, source.char_len());
            info!(
                "Span resolution: {} replaceable spans, {} possible misses",
                spans.len(),
                misses.len()
            );

            let record = CacheRecord::new(source.raw_digest.clone(), spans, misses);
            cache::save(&record, &cache_path).await?;
            info!("Saved span cache: {}", cache_path.display());
            record
        }
    };

    let mode = if args.html { OutputMode::Html } else { OutputMode::Plain };
    let mapper = PronounMapper::new();
    let output = pipeline::redact(&source.text, &record.spans, mode, &mapper)?;

    let mut misses = record.possible_misses.clone();
    misses.extend(output.misses.iter().cloned());
    for miss in &misses {
        warn!(
            "Possible miss [{:?}] at {}..{}: {:?}",
            miss.reason, miss.start, miss.end, miss.text
        );
    }
    info!(
        "Redaction complete: {} spans applied, {} possible misses",
        record.spans.len(),
        misses.len()
    );

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &output.text).await.map_err(|e| {
                anyhow::anyhow!("failed to write output to {}: {}", path.display(), e)
            })?;
            info!("Wrote redacted output: {}", path.display());
        }
        None => {
            print!("{}", output.text);
        }
    }

    Ok(())
}

/// Probe the span cache; any unusable state degrades to None and the driver
/// falls through to the tagger output file
async fn load_cached(
    cache_path: &std::path::Path,
    source_digest: &str,
    ignore_cache: bool,
) -> Option<CacheRecord> {
    if ignore_cache {
        info!("Cache bypassed (--ignore-cache)");
        return None;
    }
    match cache::load(cache_path).await {
        CacheLookup::Hit(record) if record.source_digest == source_digest => Some(record),
        CacheLookup::Hit(_) => {
            info!("Cache digest mismatch, input changed; re-resolving spans");
            None
        }
        CacheLookup::VersionMismatch { found, expected } => {
            warn!("Cache format version {found} != {expected}; regenerating");
            None
        }
        CacheLookup::NotFound => None,
    }
}
