//! Loteria Federal mapper.
//!
//! A row needs a draw number (`Extração`) and a draw date (`Data Sorteio`);
//! without either it is skipped. Prizes are read for ranks 1 to 5 and a rank
//! is kept only when both its winning number and its value are present. A
//! whitespace-only value still counts as present and reads as zero.

use super::MapOutcome;
use crate::header::{Field, resolve, resolve_raw};
use crate::normalize::{
    normalize_date, normalize_integer, normalize_monetary, normalize_prize_number,
};
use crate::record::{ApiRecord, DrawRecord, PrizeEntry, RawRow};
use std::ops::RangeInclusive;

/// Prize ranks published for a Federal draw.
pub const PRIZE_RANKS: RangeInclusive<u32> = 1..=5;

pub fn map_row(row: &RawRow) -> MapOutcome {
    let draw_number = resolve(row, Field::DrawNumber);
    let draw_date = resolve(row, Field::DrawDate);

    let missing: Vec<&str> = [
        (draw_number.is_empty(), "draw number"),
        (draw_date.is_empty(), "draw date"),
    ]
    .into_iter()
    .filter_map(|(absent, name)| absent.then_some(name))
    .collect();

    if !missing.is_empty() {
        return MapOutcome::Skip {
            reason: format!("missing {}", missing.join(" and ")),
        };
    }

    let number = normalize_integer(&draw_number);
    MapOutcome::Record(ApiRecord::Draw(DrawRecord {
        id: draw_number,
        draw_number: number,
        date: normalize_date(&draw_date),
        results: extract_prizes(row),
    }))
}

/// Ranked prizes found in `row`, in rank order.
pub fn extract_prizes(row: &RawRow) -> Vec<PrizeEntry> {
    PRIZE_RANKS
        .filter_map(|rank| {
            let number = resolve(row, Field::PrizeNumber(rank));
            let value = resolve_raw(row, Field::PrizeValue(rank))?;
            if number.is_empty() {
                return None;
            }
            Some(PrizeEntry {
                position: rank,
                winning_number: normalize_prize_number(&number),
                prize_amount: normalize_monetary(value),
            })
        })
        .collect()
}
