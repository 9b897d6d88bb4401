//! End-to-end generation tests
//!
//! These tests convert the fixture CSVs under `testdata/` into a scratch
//! directory and check the documents, `latest.json` and `index.json`.

use lottery_api::api::{self, GenerateOptions, IndexOptions, layout};
use lottery_api::error::{LotteryApiError, Result};
use lottery_api::ingest::IngestOptions;
use lottery_api::mapping::MappingKind;
use lottery_api::record::{ApiRecord, IndexDocument};
use lottery_api::upstream::UpstreamResult;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

fn index_options(lottery: &str) -> IndexOptions {
    IndexOptions {
        lottery: lottery.to_owned(),
        endpoint_template: "/v1/lotteries/{lottery}/draws/{id}".to_owned(),
    }
}

fn convert(csv: &str, draws: &Path, mapping: MappingKind) -> Result<api::RunReport> {
    api::convert_file(
        &fixture(csv),
        draws,
        mapping,
        &IngestOptions::default(),
        &GenerateOptions::default(),
    )
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

/// Every file under `dir`, by relative path.
fn snapshot(dir: &Path) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path.strip_prefix(dir).map_or_else(|_| path.clone(), Path::to_path_buf);
                files.insert(relative, fs::read(&path)?);
            }
        }
    }
    Ok(files)
}

#[test]
fn test_federal_conversion() -> Result<()> {
    let root = tempdir()?;
    let draws = layout::draws_dir(root.path(), "federal");

    let report = convert("federal.csv", &draws, MappingKind::Federal)?;
    assert_eq!(report.processed, 4);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors(), 1);

    let draw = read_json(&draws.join("5842.json"))?;
    assert_eq!(
        draw,
        json!({
            "drawNumber": 5842,
            "date": "2024-03-02",
            "results": [
                { "position": 1, "winningNumber": "012345", "prizeAmount": 500000.0 },
                { "position": 2, "winningNumber": "054321", "prizeAmount": 27000.0 }
            ]
        })
    );

    let partial = read_json(&draws.join("5843.json"))?;
    assert_eq!(partial["results"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_latest_is_last_row_not_highest_id() -> Result<()> {
    let root = tempdir()?;
    let draws = root.path().join("draws");

    convert("federal.csv", &draws, MappingKind::Federal)?;

    assert_eq!(
        fs::read(draws.join("latest.json"))?,
        fs::read(draws.join("5.json"))?
    );
    Ok(())
}

#[test]
fn test_index_counts_documents_in_numeric_order() -> Result<()> {
    let root = tempdir()?;
    let draws = layout::draws_dir(root.path(), "federal");

    convert("federal.csv", &draws, MappingKind::Federal)?;
    let (path, index) = api::write_index(&draws, &index_options("federal"))?;

    let ids: Vec<&str> = index.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["5", "12", "5842", "5843"]);
    assert_eq!(index.total, 4);
    assert_eq!(index.kind, "federal");

    let on_disk: IndexDocument = serde_json::from_slice(&fs::read(&path)?)?;
    assert_eq!(on_disk.entries[3].endpoint, "/v1/lotteries/federal/draws/5843");
    assert_eq!(on_disk.entries[3].date, "2024-03-05");
    Ok(())
}

#[test]
fn test_rerun_is_byte_identical() -> Result<()> {
    let root = tempdir()?;
    let draws = layout::draws_dir(root.path(), "federal");

    convert("federal.csv", &draws, MappingKind::Federal)?;
    api::write_index(&draws, &index_options("federal"))?;
    let first = snapshot(root.path())?;

    convert("federal.csv", &draws, MappingKind::Federal)?;
    api::write_index(&draws, &index_options("federal"))?;
    let second = snapshot(root.path())?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_bold_headers_and_comma_delimiter() -> Result<()> {
    let root = tempdir()?;
    let draws = root.path().join("draws");

    let report = convert("federal_bold.csv", &draws, MappingKind::Federal)?;
    assert_eq!(report.processed, 1);

    let draw = read_json(&draws.join("5843.json"))?;
    assert_eq!(draw["date"], "2024-03-05");
    assert_eq!(draw["results"][0]["prizeAmount"], 500_000.0);
    Ok(())
}

#[test]
fn test_passthrough_mapping() -> Result<()> {
    let root = tempdir()?;
    let draws = root.path().join("generic").join("draws");

    let report = convert("generic.csv", &draws, MappingKind::Default)?;
    assert_eq!(report.processed, 2);

    assert_eq!(
        read_json(&draws.join("row_2.json"))?,
        json!({ "Concurso": "2", "Data": "08/01/2024", "Ganhadores": null })
    );

    let index = api::build_index(&draws, &index_options("generic"))?;
    let ids: Vec<&str> = index.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["row_1", "row_2"]);
    assert!(index.entries.iter().all(|e| e.date.is_empty()));
    Ok(())
}

#[test]
fn test_fatal_errors_write_nothing() -> Result<()> {
    let root = tempdir()?;
    let draws = root.path().join("draws");

    let missing = convert("no_such_file.csv", &draws, MappingKind::Federal);
    assert!(matches!(missing, Err(LotteryApiError::SourceNotFound(_))));

    let empty = root.path().join("empty.csv");
    fs::write(&empty, "")?;
    let no_header = api::convert_file(
        &empty,
        &draws,
        MappingKind::Federal,
        &IngestOptions::default(),
        &GenerateOptions::default(),
    );
    assert!(matches!(no_header, Err(LotteryApiError::MissingHeader(_))));
    assert!(!draws.exists());
    Ok(())
}

#[test]
fn test_update_latest_publishes_and_reindexes() -> Result<()> {
    let root = tempdir()?;
    let draws = layout::draws_dir(root.path(), "federal");
    convert("federal.csv", &draws, MappingKind::Federal)?;

    let result = UpstreamResult::from_json(&fs::read_to_string(fixture("upstream_latest.json"))?)?;
    let record = ApiRecord::from(result.to_draw_record()?);
    let published = api::publish_record(&record, &draws)?;
    assert!(!published.replaced);

    assert_eq!(fs::read(&published.latest)?, fs::read(draws.join("5844.json"))?);

    let (_, index) = api::write_index(&draws, &index_options("federal"))?;
    assert_eq!(index.total, 5);
    assert_eq!(index.entries.last().map(|e| e.id.as_str()), Some("5844"));
    Ok(())
}
