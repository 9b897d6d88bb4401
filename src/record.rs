//! Data model shared by the mapping and materialization stages.
//!
//! - [`RawRow`]: one CSV row as read, keyed by the exact header text
//! - [`ApiRecord`]: what a mapper produces for a row
//! - [`DrawRecord`] / [`PrizeEntry`]: the canonical draw document
//! - [`IndexDocument`] / [`IndexEntry`]: the reduction written to `index.json`

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One source row: header text (verbatim, decorative markup included) to cell text.
///
/// Cells that the row did not provide (short rows) are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, Option<String>)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: impl Into<String>, value: Option<String>) {
        self.cells.push((header.into(), value));
    }

    /// Cell under `header`. With duplicated headers the rightmost column wins.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .rev()
            .find(|(h, _)| h == header)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains_header(&self, header: &str) -> bool {
        self.cells.iter().any(|(h, _)| h == header)
    }

    /// Cells in source column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<H, V> FromIterator<(H, V)> for RawRow
where
    H: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(h, v)| (h.into(), Some(v.into())))
                .collect(),
        }
    }
}

/// One ranked prize of a draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeEntry {
    /// Rank, starting at 1
    pub position: u32,
    /// Winning ticket number, kept as text
    pub winning_number: String,
    /// Prize value in currency units
    pub prize_amount: f64,
}

/// Canonical document for one draw.
///
/// The identifier names the file (`<id>.json`) and is not repeated in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRecord {
    #[serde(skip)]
    pub id: String,
    pub draw_number: u64,
    /// `YYYY-MM-DD`, or the source text when it was not a valid date
    pub date: String,
    /// Ordered by rank
    pub results: Vec<PrizeEntry>,
}

/// Header-to-value document produced when no specialized mapper applies.
#[derive(Debug, Clone, PartialEq)]
pub struct PassthroughRecord {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// Output of a mapper for one row.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRecord {
    Draw(DrawRecord),
    Passthrough(PassthroughRecord),
}

impl ApiRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::Draw(record) => &record.id,
            Self::Passthrough(record) => &record.id,
        }
    }

    /// Render the document body exactly as it is stored on disk.
    ///
    /// # Errors
    ///
    /// Returns the serialization error, if any.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            Self::Draw(record) => serde_json::to_vec_pretty(record)?,
            Self::Passthrough(record) => serde_json::to_vec_pretty(&record.fields)?,
        };
        Ok(bytes)
    }
}

impl From<DrawRecord> for ApiRecord {
    fn from(record: DrawRecord) -> Self {
        Self::Draw(record)
    }
}

/// One line of `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub date: String,
    pub endpoint: String,
}

/// Summary of every draw document present in a draws directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub total: usize,
    pub entries: Vec<IndexEntry>,
}

impl IndexDocument {
    pub fn new(kind: impl Into<String>, entries: Vec<IndexEntry>) -> Self {
        Self {
            kind: kind.into(),
            total: entries.len(),
            entries,
        }
    }
}
