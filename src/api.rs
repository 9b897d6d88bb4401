//! API materialization: write mapped rows as a static JSON API.
//!
//! A generation run walks the CSV rows in source order, maps each one, and
//! writes `<id>.json` into the draws directory. After the last row, the most
//! recently written document is copied byte for byte to `latest.json`.
//! "Most recent" means last in source order, whatever its identifier.
//!
//! ```no_run
//! use lottery_api::api::{GenerateOptions, convert_file};
//! use lottery_api::ingest::IngestOptions;
//! use lottery_api::mapping::MappingKind;
//! use std::path::Path;
//!
//! let report = convert_file(
//!     Path::new("federal.csv"),
//!     Path::new("v1/lotteries/federal/draws"),
//!     MappingKind::Federal,
//!     &IngestOptions::default(),
//!     &GenerateOptions::default(),
//! )?;
//! println!("{}", report.summary());
//! # Ok::<(), lottery_api::error::LotteryApiError>(())
//! ```
//!
//! Re-running over the same directory overwrites same-named documents. It
//! does not remove documents whose identifiers are gone from the source.

pub mod index;
pub mod layout;

pub use index::{IndexOptions, build_index, write_index};

use crate::error::{LotteryApiError, Result, ResultExt as _};
use crate::ingest::{CsvSource, IngestOptions};
use crate::mapping::{MapOutcome, MappingKind};
use crate::record::ApiRecord;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Settings for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Log a progress line every N written records (0 disables)
    pub progress_interval: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            progress_interval: 100,
        }
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Rows written as documents
    pub processed: usize,
    /// Rows the mapper declined
    pub skipped: usize,
    /// Rows that could not be decoded or written
    pub failed: usize,
    pub output_dir: PathBuf,
    /// `latest.json`, when at least one document was written
    pub latest: Option<PathBuf>,
    pub duration: Duration,
}

impl RunReport {
    /// Skipped plus failed rows.
    pub fn errors(&self) -> usize {
        self.skipped + self.failed
    }

    pub fn summary(&self) -> String {
        format!(
            "Conversion complete: {} rows processed, {} errors ({} skipped, {} failed), output in {}, {:.2}s",
            self.processed,
            self.errors(),
            self.skipped,
            self.failed,
            self.output_dir.display(),
            self.duration.as_secs_f64()
        )
    }
}

/// Open `csv_path` and generate its documents into `output_dir`.
///
/// # Errors
///
/// Fails without writing anything when the file is missing or has no header
/// row. Per-row problems are counted in the report instead.
pub fn convert_file(
    csv_path: &Path,
    output_dir: &Path,
    mapping: MappingKind,
    ingest: &IngestOptions,
    options: &GenerateOptions,
) -> Result<RunReport> {
    let source = CsvSource::open(csv_path, ingest)?;
    generate(source, mapping, output_dir, options)
}

/// Map every row of `source` and write the resulting documents.
///
/// # Errors
///
/// Returns error if `output_dir` cannot be created, the source fails with an
/// I/O error mid-stream, or `latest.json` cannot be written. Skipped and
/// failed rows only show up in the report.
pub fn generate<R: Read>(
    source: CsvSource<R>,
    mapping: MappingKind,
    output_dir: &Path,
    options: &GenerateOptions,
) -> Result<RunReport> {
    let start = Instant::now();

    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    info!(mapping = %mapping, source = source.label(), "Generating documents into {}", output_dir.display());

    let mut processed = 0;
    let mut skipped = 0;
    let mut failed = 0;
    let mut last_written: Option<PathBuf> = None;

    for (row_index, row) in source.rows() {
        let row = match row {
            Ok(row) => row,
            Err(LotteryApiError::Io(e)) => {
                return Err(LotteryApiError::Io(e)).context(format!("Failed reading row {row_index}"));
            }
            Err(e) => {
                error!(row = row_index, error = %e, "Error processing row");
                failed += 1;
                continue;
            }
        };

        let record = match mapping.map(row_index, &row) {
            MapOutcome::Record(record) => record,
            MapOutcome::Skip { reason } => {
                warn!(row = row_index, %reason, "Missing basic data, skipping");
                skipped += 1;
                continue;
            }
        };

        match write_record(&record, output_dir) {
            Ok(path) => {
                last_written = Some(path);
                processed += 1;
                if options.progress_interval > 0 && processed % options.progress_interval == 0 {
                    info!("Processed {processed} rows...");
                }
            }
            Err(e) => {
                error!(row = row_index, id = record.id(), error = %e, "Error processing row");
                failed += 1;
            }
        }
    }

    let latest = match last_written {
        Some(last) => {
            let latest = layout::latest_path(output_dir);
            fs::copy(&last, &latest).with_context(|| {
                format!("Failed to copy {} to {}", last.display(), latest.display())
            })?;
            info!("Copied latest draw JSON to: {}", latest.display());
            Some(latest)
        }
        None => {
            warn!("No rows produced a document, latest.json left untouched");
            None
        }
    };

    Ok(RunReport {
        processed,
        skipped,
        failed,
        output_dir: output_dir.to_path_buf(),
        latest,
        duration: start.elapsed(),
    })
}

/// Serialize `record` and write it as `<id>.json` in `dir`.
///
/// The document is fully rendered before the file is touched.
///
/// # Errors
///
/// [`LotteryApiError::InvalidRecordId`] when the identifier cannot be a file
/// stem, or the serialization or write error.
pub fn write_record(record: &ApiRecord, dir: &Path) -> Result<PathBuf> {
    let path = layout::record_path(dir, record.id())?;
    let bytes = record.to_json_bytes()?;
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Result of publishing a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub path: PathBuf,
    pub latest: PathBuf,
    /// A document with the same identifier was already present
    pub replaced: bool,
}

/// Write one record and make it `latest.json`, creating `draws_dir` if needed.
///
/// # Errors
///
/// Returns error if the directory, the record or `latest.json` cannot be
/// written, or the identifier is not a valid file stem.
pub fn publish_record(record: &ApiRecord, draws_dir: &Path) -> Result<Published> {
    fs::create_dir_all(draws_dir)
        .with_context(|| format!("Failed to create draws directory: {}", draws_dir.display()))?;

    let replaced = layout::record_path(draws_dir, record.id())?.exists();
    if replaced {
        info!("Draw #{} already exists, updating anyway", record.id());
    }

    let path = write_record(record, draws_dir)?;
    let latest = layout::latest_path(draws_dir);
    fs::copy(&path, &latest)
        .with_context(|| format!("Failed to update {}", latest.display()))?;

    info!("Saved draw result: {}", path.display());
    Ok(Published {
        path,
        latest,
        replaced,
    })
}
