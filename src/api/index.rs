//! Index phase: rebuild `index.json` from the documents in a draws directory.
//!
//! The index is a pure function of the directory contents, so it can be
//! regenerated at any time, independently of ingestion.

use super::layout::{RECORD_EXTENSION, RESERVED_STEMS, index_path};
use crate::error::{Result, ResultExt as _};
use crate::record::{IndexDocument, IndexEntry};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Settings for the index phase.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Type label of the index, usually the lottery name
    pub lottery: String,
    /// Endpoint pattern with `{lottery}` and `{id}` placeholders
    pub endpoint_template: String,
}

/// Fill `{lottery}` and `{id}` in an endpoint template.
pub fn endpoint_for(template: &str, lottery: &str, id: &str) -> String {
    template.replace("{lottery}", lottery).replace("{id}", id)
}

/// Sort key giving ascending numeric order for all-digit identifiers of any
/// length. Every other identifier (and `"0"`) sorts as zero, ahead of the rest.
pub fn numeric_sort_key(id: &str) -> (usize, &str) {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return (0, "");
    }
    let significant = id.trim_start_matches('0');
    (significant.len(), significant)
}

/// Read every record document in `draws_dir` into an index.
///
/// `latest.json` is left out. Documents that cannot be read or parsed are
/// logged and left out. A document without a string `date` indexes with an
/// empty date.
///
/// # Errors
///
/// Returns error if `draws_dir` cannot be listed.
pub fn build_index(draws_dir: &Path, options: &IndexOptions) -> Result<IndexDocument> {
    let mut paths: Vec<PathBuf> = fs::read_dir(draws_dir)
        .with_context(|| format!("Failed to read draws directory {}", draws_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_record_document(path))
        .collect();

    // Equal sort keys keep file-name order, which keeps reruns byte-identical.
    paths.sort();

    let mut entries: Vec<IndexEntry> = paths
        .iter()
        .filter_map(|path| match read_entry(path, options) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Error reading record, leaving it out of the index");
                None
            }
        })
        .collect();

    entries.sort_by(|a, b| numeric_sort_key(&a.id).cmp(&numeric_sort_key(&b.id)));

    debug!(count = entries.len(), dir = %draws_dir.display(), "Index built");
    Ok(IndexDocument::new(options.lottery.clone(), entries))
}

/// Build the index and write it next to `draws_dir`. Returns the path written.
///
/// # Errors
///
/// Returns error if `draws_dir` cannot be listed or `index.json` cannot be
/// written.
pub fn write_index(draws_dir: &Path, options: &IndexOptions) -> Result<(PathBuf, IndexDocument)> {
    let document = build_index(draws_dir, options)?;
    let path = index_path(draws_dir);

    let json = serde_json::to_vec_pretty(&document).context("Failed to serialize index")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        total = document.total,
        "Index written to {}",
        path.display()
    );
    Ok((path, document))
}

fn is_record_document(path: &Path) -> bool {
    let is_json = path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION);
    let stem = path.file_stem().and_then(|s| s.to_str());
    is_json && stem.is_some_and(|s| !RESERVED_STEMS.contains(&s))
}

fn read_entry(path: &Path, options: &IndexOptions) -> Result<IndexEntry> {
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_owned();

    let document: Value = serde_json::from_slice(&fs::read(path)?)?;
    let date = document
        .get("date")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Ok(IndexEntry {
        endpoint: endpoint_for(&options.endpoint_template, &options.lottery, &id),
        id,
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn options() -> IndexOptions {
        IndexOptions {
            lottery: "federal".to_owned(),
            endpoint_template: "/v1/lotteries/{lottery}/draws/{id}".to_owned(),
        }
    }

    #[test]
    fn test_numeric_sort_key() {
        let mut ids = vec!["10", "2", "9", "abc", "0010", "100000000000000000000000"];
        ids.sort_by_key(|&id| numeric_sort_key(id));
        assert_eq!(ids, ["abc", "2", "9", "10", "0010", "100000000000000000000000"]);
        assert_eq!(numeric_sort_key("0"), numeric_sort_key("row_1"));
    }

    #[test]
    fn test_endpoint_for() {
        assert_eq!(
            endpoint_for("/api/{lottery}/contest/{id}", "federal", "5843"),
            "/api/federal/contest/5843"
        );
    }

    #[test]
    fn test_build_index_orders_and_filters() -> Result<()> {
        let root = tempdir()?;
        let draws = root.path().join("federal").join("draws");
        fs::create_dir_all(&draws)?;

        for id in ["10", "2", "9"] {
            fs::write(
                draws.join(format!("{id}.json")),
                format!(r#"{{"drawNumber": {id}, "date": "2024-01-{id:0>2}", "results": []}}"#),
            )?;
        }
        fs::write(draws.join("latest.json"), r#"{"date": "x"}"#)?;
        fs::write(draws.join("notes.txt"), "not a record")?;
        fs::write(draws.join("broken.json"), "{ nope")?;

        let (path, index) = write_index(&draws, &options())?;
        assert_eq!(path, root.path().join("federal").join("index.json"));
        assert_eq!(index.total, 3);

        let ids: Vec<&str> = index.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["2", "9", "10"]);
        assert_eq!(index.entries[0].date, "2024-01-02");
        assert_eq!(index.entries[2].endpoint, "/v1/lotteries/federal/draws/10");

        let on_disk: IndexDocument = serde_json::from_slice(&fs::read(&path)?)?;
        assert_eq!(on_disk, index);
        Ok(())
    }

    #[test]
    fn test_missing_date_reads_empty() -> Result<()> {
        let root = tempdir()?;
        let draws = root.path().join("draws");
        fs::create_dir_all(&draws)?;
        fs::write(draws.join("row_1.json"), r#"{"Concurso": "1"}"#)?;

        let index = build_index(&draws, &options())?;
        assert_eq!(index.entries.len(), 1);
        assert_eq!(index.entries[0].date, "");
        Ok(())
    }

    #[test]
    fn test_missing_directory_fails() {
        assert!(build_index(Path::new("no/such/draws"), &options()).is_err());
    }
}
