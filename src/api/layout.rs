//! On-disk layout of the published API.
//!
//! ```text
//! <api_root>/lotteries/<lottery>/
//!     index.json
//!     draws/
//!         <id>.json
//!         latest.json
//! ```

use crate::error::{LotteryApiError, Result};
use std::path::{Path, PathBuf};

pub const LOTTERIES_DIR: &str = "lotteries";
pub const DRAWS_DIR: &str = "draws";
pub const LATEST_FILE: &str = "latest.json";
pub const INDEX_FILE: &str = "index.json";
pub const RECORD_EXTENSION: &str = "json";

/// File stems that a record identifier may not take.
pub const RESERVED_STEMS: [&str; 2] = ["latest", "index"];

pub fn draws_dir(api_root: &Path, lottery: &str) -> PathBuf {
    api_root.join(LOTTERIES_DIR).join(lottery).join(DRAWS_DIR)
}

pub fn latest_path(draws_dir: &Path) -> PathBuf {
    draws_dir.join(LATEST_FILE)
}

/// `index.json` sits next to the draws directory, not inside it.
pub fn index_path(draws_dir: &Path) -> PathBuf {
    draws_dir
        .parent()
        .map_or_else(|| PathBuf::from(INDEX_FILE), |parent| parent.join(INDEX_FILE))
}

/// Lottery name implied by a draws directory: the name of its parent.
pub fn lottery_name(draws_dir: &Path) -> Option<String> {
    draws_dir
        .parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
}

/// Path of the document for record `id`.
///
/// # Errors
///
/// [`LotteryApiError::InvalidRecordId`] when `id` is empty, reserved, or not
/// a plain file stem.
pub fn record_path(draws_dir: &Path, id: &str) -> Result<PathBuf> {
    validate_record_id(id)?;
    Ok(draws_dir.join(format!("{id}.{RECORD_EXTENSION}")))
}

/// Check that `id` can name a record document.
///
/// # Errors
///
/// [`LotteryApiError::InvalidRecordId`] for empty, untrimmed, reserved or
/// path-like identifiers.
pub fn validate_record_id(id: &str) -> Result<()> {
    let invalid = id.is_empty()
        || id != id.trim()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0'])
        || RESERVED_STEMS.contains(&id);

    if invalid {
        Err(LotteryApiError::InvalidRecordId(id.to_owned()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_dir_layout() {
        let dir = draws_dir(Path::new("v1"), "federal");
        assert_eq!(dir, Path::new("v1/lotteries/federal/draws"));
        assert_eq!(index_path(&dir), Path::new("v1/lotteries/federal/index.json"));
        assert_eq!(latest_path(&dir), Path::new("v1/lotteries/federal/draws/latest.json"));
        assert_eq!(lottery_name(&dir).as_deref(), Some("federal"));
    }

    #[test]
    fn test_relative_draws_dir() {
        assert_eq!(index_path(Path::new("draws")), Path::new("index.json"));
        assert_eq!(lottery_name(Path::new("draws")), None);
    }

    #[test]
    fn test_record_ids() {
        assert!(record_path(Path::new("d"), "5843").is_ok());
        assert!(record_path(Path::new("d"), "row_1").is_ok());
        for bad in ["", "latest", "index", "..", "a/b", "a\\b", " 1"] {
            assert!(
                matches!(validate_record_id(bad), Err(LotteryApiError::InvalidRecordId(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
