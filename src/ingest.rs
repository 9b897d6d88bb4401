//! CSV ingestion.
//!
//! Opens a CSV export, sniffs its delimiter from the first bytes, and hands
//! out rows one at a time as [`RawRow`]s keyed by the header row. The row
//! sequence is single-pass: [`CsvSource::rows`] consumes the source.
//!
//! ```no_run
//! use lottery_api::ingest::{CsvSource, IngestOptions};
//! use std::path::Path;
//!
//! let source = CsvSource::open(Path::new("federal.csv"), &IngestOptions::default())?;
//! println!("{} columns", source.headers().len());
//! for (row_index, row) in source.rows() {
//!     let row = row?;
//!     println!("row {row_index}: {} cells", row.len());
//! }
//! # Ok::<(), lottery_api::error::LotteryApiError>(())
//! ```

use crate::error::{LotteryApiError, Result};
use crate::record::RawRow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Chain, Cursor, Read};
use std::path::Path;
use tracing::{debug, info};

/// Delimiters considered by [`sniff_delimiter`], in tie-break order.
pub const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Used when sniffing cannot decide.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Bytes read up front for delimiter sniffing.
pub const DEFAULT_SNIFF_SAMPLE_BYTES: usize = 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Share of sampled lines that must agree on a candidate's count.
const MIN_CONSISTENCY_PERCENT: usize = 90;

/// Ingestion settings.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// How many leading bytes are inspected to pick the delimiter
    pub sniff_sample_bytes: usize,
    /// Skip sniffing and use this delimiter
    pub delimiter: Option<u8>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            sniff_sample_bytes: DEFAULT_SNIFF_SAMPLE_BYTES,
            delimiter: None,
        }
    }
}

/// A CSV source whose header row has been read.
///
/// The sniffed sample is replayed in front of the remaining input, so the
/// source never needs to seek.
pub struct CsvSource<R: Read> {
    label: String,
    delimiter: u8,
    headers: Vec<String>,
    reader: csv::Reader<Chain<Cursor<Vec<u8>>, R>>,
}

impl CsvSource<File> {
    /// Open a CSV file.
    ///
    /// # Errors
    ///
    /// - [`LotteryApiError::SourceNotFound`] if `path` does not exist
    /// - [`LotteryApiError::MissingHeader`] if the header row is absent or blank
    /// - [`LotteryApiError::Io`] if the file cannot be read
    pub fn open(path: &Path, options: &IngestOptions) -> Result<Self> {
        if !path.is_file() {
            return Err(LotteryApiError::SourceNotFound(path.display().to_string()));
        }
        let file = File::open(path)?;
        Self::from_reader(file, path.display().to_string(), options)
    }
}

impl<R: Read> CsvSource<R> {
    /// Build a source from any reader. `label` names it in errors and logs.
    ///
    /// # Errors
    ///
    /// - [`LotteryApiError::MissingHeader`] if the header row is absent, blank
    ///   or undecodable
    /// - [`LotteryApiError::Io`] if the reader fails
    pub fn from_reader(
        mut reader: R,
        label: impl Into<String>,
        options: &IngestOptions,
    ) -> Result<Self> {
        let label = label.into();

        let mut sample = Vec::with_capacity(options.sniff_sample_bytes);
        (&mut reader)
            .take(options.sniff_sample_bytes as u64)
            .read_to_end(&mut sample)?;
        let truncated = sample.len() >= options.sniff_sample_bytes;
        if sample.starts_with(UTF8_BOM) {
            sample.drain(..UTF8_BOM.len());
        }

        let delimiter = match options.delimiter {
            Some(delimiter) => delimiter,
            None => {
                sniff_delimiter(&sample, truncated).unwrap_or_else(|| {
                    debug!(source = %label, "Delimiter sniffing inconclusive, using ','");
                    DEFAULT_DELIMITER
                })
            }
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(Cursor::new(sample).chain(reader));

        let headers: Vec<String> = match csv_reader.headers() {
            Ok(record) => record.iter().map(ToOwned::to_owned).collect(),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!(source = %label, error = %e, "Header row could not be decoded");
                return Err(LotteryApiError::MissingHeader(label));
            }
        };

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(LotteryApiError::MissingHeader(label));
        }

        info!(
            source = %label,
            delimiter = %char::from(delimiter).escape_default(),
            "Processing CSV with {} columns",
            headers.len()
        );
        debug!(source = %label, ?headers, "Headers");

        Ok(Self {
            label,
            delimiter,
            headers,
            reader: csv_reader,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Consume the source into its rows, numbered from 1.
    pub fn rows(self) -> Rows<R> {
        Rows {
            headers: self.headers,
            records: self.reader.into_records(),
            next_index: 1,
        }
    }
}

/// Single-pass iterator over `(row_index, row)` pairs.
///
/// A row that cannot be decoded yields an error in place of the row; the
/// iterator keeps going with the next one.
pub struct Rows<R: Read> {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<Chain<Cursor<Vec<u8>>, R>>,
    next_index: usize,
}

impl<R: Read> Iterator for Rows<R> {
    type Item = (usize, Result<RawRow>);

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let row_index = self.next_index;
        self.next_index += 1;

        let row = record
            .map(|record| {
                if record.len() > self.headers.len() {
                    debug!(
                        row = row_index,
                        extra = record.len() - self.headers.len(),
                        "Ignoring fields beyond the header row"
                    );
                }
                self.headers
                    .iter()
                    .enumerate()
                    .fold(RawRow::new(), |mut row, (i, header)| {
                        row.push(header.clone(), record.get(i).map(ToOwned::to_owned));
                        row
                    })
            })
            .map_err(LotteryApiError::from);

        Some((row_index, row))
    }
}

/// Guess the field delimiter from the start of a file.
///
/// Each candidate is counted (outside quotes) on every sampled line. A
/// candidate qualifies when its most common non-zero count appears on at
/// least 90% of the lines; among those, the most consistent wins, then the
/// highest count, then the earlier candidate. If none qualifies, a candidate
/// found on the header line is accepted when every other line has between one
/// and that many occurrences, so short rows do not hide the delimiter.
///
/// When `truncated` is set the last line is assumed to be cut off and
/// ignored. Returns `None` when no candidate qualifies.
pub fn sniff_delimiter(sample: &[u8], truncated: bool) -> Option<u8> {
    let text = String::from_utf8_lossy(sample);
    let mut lines: Vec<&str> = text.lines().collect();
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    lines.retain(|line| !line.trim().is_empty());

    if lines.is_empty() {
        return None;
    }

    sniff_by_consistency(&lines).or_else(|| sniff_by_header_width(&lines))
}

fn sniff_by_consistency(lines: &[&str]) -> Option<u8> {
    DELIMITER_CANDIDATES
        .iter()
        .filter_map(|&candidate| {
            let (count, agreeing) = modal_count(lines, candidate)?;
            (agreeing * 100 >= lines.len() * MIN_CONSISTENCY_PERCENT)
                .then_some((candidate, (agreeing, count)))
        })
        .fold(None, |best: Option<(u8, (usize, usize))>, (candidate, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((candidate, score)),
        })
        .map(|(candidate, _)| candidate)
}

fn sniff_by_header_width(lines: &[&str]) -> Option<u8> {
    let (header, rows) = lines.split_first()?;
    DELIMITER_CANDIDATES
        .iter()
        .filter_map(|&candidate| {
            let width = count_unquoted(header, candidate);
            let fits = rows.iter().all(|line| {
                let count = count_unquoted(line, candidate);
                count > 0 && count <= width
            });
            (width > 0 && fits).then_some((candidate, width))
        })
        .fold(None, |best: Option<(u8, usize)>, (candidate, width)| match best {
            Some((_, best_width)) if best_width >= width => best,
            _ => Some((candidate, width)),
        })
        .map(|(candidate, _)| candidate)
}

/// Most common non-zero count of `delimiter` across `lines`, with the number
/// of lines showing it. Ties go to the larger count.
fn modal_count(lines: &[&str], delimiter: u8) -> Option<(usize, usize)> {
    let mut tally: BTreeMap<usize, usize> = BTreeMap::new();
    for count in lines.iter().map(|line| count_unquoted(line, delimiter)) {
        if count > 0 {
            *tally.entry(count).or_default() += 1;
        }
    }
    tally
        .into_iter()
        .max_by_key(|&(count, agreeing)| (agreeing, count))
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    line.bytes()
        .filter(|&b| {
            if b == b'"' {
                in_quotes = !in_quotes;
            }
            !in_quotes && b == delimiter
        })
        .count()
}
