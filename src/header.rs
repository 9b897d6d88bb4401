//! Header resolution across publisher spelling variants.
//!
//! The same logical column shows up under different header texts depending
//! on who exported the spreadsheet and when: verbatim, wrapped in markdown
//! bold (`**1º prêmio**`), with a degree sign instead of the ordinal
//! indicator (`1° prêmio`), or without accents. [`HEADER_VARIANTS`] lists the
//! accepted spellings per logical field, in lookup order; supporting a new
//! export format means adding spellings there.

use crate::record::RawRow;

/// Placeholder replaced by the prize rank in ranked spellings.
pub const RANK_PLACEHOLDER: &str = "{rank}";

/// Kinds of logical column, without the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    DrawNumber,
    DrawDate,
    PrizeNumber,
    PrizeValue,
}

/// Accepted header spellings per field kind, tried in order.
pub static HEADER_VARIANTS: &[(FieldKind, &[&str])] = &[
    (
        FieldKind::DrawNumber,
        &["Extração", "**Extração**", "Extracao", "**Extracao**"],
    ),
    (
        FieldKind::DrawDate,
        &["Data Sorteio", "**Data Sorteio**", "Data do Sorteio", "**Data do Sorteio**"],
    ),
    (
        FieldKind::PrizeNumber,
        &[
            "{rank}º prêmio",
            "**{rank}º prêmio**",
            "{rank}° prêmio",
            "**{rank}° prêmio**",
            "{rank}º premio",
            "**{rank}º premio**",
        ],
    ),
    (
        FieldKind::PrizeValue,
        &[
            "Valor {rank}º prêmio",
            "**Valor {rank}º prêmio**",
            "Valor {rank}° prêmio",
            "**Valor {rank}° prêmio**",
            "Valor {rank}º premio",
            "**Valor {rank}º premio**",
        ],
    ),
];

/// A logical column a mapper asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DrawNumber,
    DrawDate,
    PrizeNumber(u32),
    PrizeValue(u32),
}

impl Field {
    pub fn kind(self) -> FieldKind {
        match self {
            Self::DrawNumber => FieldKind::DrawNumber,
            Self::DrawDate => FieldKind::DrawDate,
            Self::PrizeNumber(_) => FieldKind::PrizeNumber,
            Self::PrizeValue(_) => FieldKind::PrizeValue,
        }
    }

    pub fn rank(self) -> Option<u32> {
        match self {
            Self::PrizeNumber(rank) | Self::PrizeValue(rank) => Some(rank),
            Self::DrawNumber | Self::DrawDate => None,
        }
    }

    /// Concrete header texts for this field, in lookup order.
    pub fn variants(self) -> Vec<String> {
        let kind = self.kind();
        let templates = HEADER_VARIANTS
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, templates)| *templates)
            .unwrap_or_default();

        match self.rank() {
            Some(rank) => {
                let rank = rank.to_string();
                templates
                    .iter()
                    .map(|t| t.replace(RANK_PLACEHOLDER, &rank))
                    .collect()
            }
            None => templates.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

/// Value of the first spelling of `field` that is present in `row` with a
/// non-blank cell, trimmed. Empty string when no spelling matches.
pub fn resolve(row: &RawRow, field: Field) -> String {
    field
        .variants()
        .iter()
        .filter_map(|header| row.get(header))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_default()
}

/// Cell of the first spelling of `field` that is present in `row` with a
/// non-empty cell, untrimmed.
///
/// Unlike [`resolve`], a whitespace-only cell counts as present. Prize values
/// use this so a blank amount still publishes its rank, valued at zero.
pub fn resolve_raw(row: &RawRow, field: Field) -> Option<&str> {
    field
        .variants()
        .iter()
        .filter_map(|header| row.get(header))
        .find(|value| !value.is_empty())
}
