//! Row mapping strategies.
//!
//! A mapper turns one [`RawRow`] (plus its 1-based position in the source)
//! into either an [`ApiRecord`] or a skip signal. The set of mappers is
//! closed: [`MappingKind`] is the whole table, and supporting a new lottery
//! means adding a variant and a submodule.
//!
//! ```
//! use lottery_api::mapping::{MapOutcome, MappingKind};
//! use lottery_api::record::RawRow;
//!
//! let mapper: MappingKind = "federal".parse()?;
//! let row: RawRow = [("Extração", "5843"), ("Data Sorteio", "05/03/2024")]
//!     .into_iter()
//!     .collect();
//!
//! match mapper.map(1, &row) {
//!     MapOutcome::Record(record) => assert_eq!(record.id(), "5843"),
//!     MapOutcome::Skip { reason } => panic!("skipped: {reason}"),
//! }
//! # Ok::<(), lottery_api::error::LotteryApiError>(())
//! ```

pub mod default;
pub mod federal;

use crate::error::LotteryApiError;
use crate::record::{ApiRecord, RawRow};
use std::fmt;
use std::str::FromStr;

/// Result of mapping one row.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    Record(ApiRecord),
    /// Row lacks what the mapper needs; it is counted and left out.
    Skip { reason: String },
}

/// Every mapper the generator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingKind {
    /// Header-to-value passthrough, identifiers `row_<n>`
    #[default]
    Default,
    /// Loteria Federal: draw number, date and five ranked prizes
    Federal,
}

impl MappingKind {
    pub const ALL: [Self; 2] = [Self::Default, Self::Federal];

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Federal => "federal",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.name()).collect()
    }

    /// Map the row at 1-based `row_index`.
    pub fn map(self, row_index: usize, row: &RawRow) -> MapOutcome {
        match self {
            Self::Default => MapOutcome::Record(ApiRecord::Passthrough(default::map_row(
                row_index, row,
            ))),
            Self::Federal => federal::map_row(row),
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MappingKind {
    type Err = LotteryApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LotteryApiError::UnknownMapping {
                name: s.to_owned(),
                available: Self::names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!("federal".parse::<MappingKind>().ok(), Some(MappingKind::Federal));
        assert_eq!(" Default ".parse::<MappingKind>().ok(), Some(MappingKind::Default));
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "megasena".parse::<MappingKind>().unwrap_err();
        assert!(matches!(err, LotteryApiError::UnknownMapping { .. }));
        assert!(err.to_string().contains("default, federal"));
    }

    #[test]
    fn test_default_never_skips() {
        let row = RawRow::new();
        match MappingKind::Default.map(7, &row) {
            MapOutcome::Record(record) => assert_eq!(record.id(), "row_7"),
            MapOutcome::Skip { reason } => panic!("unexpected skip: {reason}"),
        }
    }
}
