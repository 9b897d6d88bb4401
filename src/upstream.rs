//! Upstream "latest result" documents.
//!
//! The lottery operator publishes the most recent draw as a JSON document
//! with Portuguese keys. This module reads that document (fetching it is left
//! to the caller) and converts it into a [`DrawRecord`] that can be published
//! with [`crate::api::publish_record`].
//!
//! ```
//! use lottery_api::upstream::UpstreamResult;
//!
//! let payload = r#"{
//!     "numero": 5843,
//!     "dataApuracao": "05/03/2024",
//!     "dezenasSorteadasOrdemSorteio": ["041234"],
//!     "listaRateioPremio": [{ "valorPremio": 500000.0 }]
//! }"#;
//!
//! let record = UpstreamResult::from_json(payload)?.to_draw_record()?;
//! assert_eq!(record.id, "5843");
//! assert_eq!(record.date, "2024-03-05");
//! # Ok::<(), lottery_api::error::LotteryApiError>(())
//! ```

use crate::error::{LotteryApiError, Result};
use crate::normalize::{normalize_date, normalize_integer, normalize_monetary};
use crate::record::{DrawRecord, PrizeEntry};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

/// The fields of an upstream result document that the generator uses.
///
/// Unknown keys are ignored. Missing keys read as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpstreamResult {
    /// Draw number; published as either a JSON number or a string
    pub numero: Value,
    /// `DD/MM/YYYY`
    pub data_apuracao: String,
    /// Winning numbers in draw order; entry `i` belongs to prize tier `i + 1`
    pub dezenas_sorteadas_ordem_sorteio: Vec<String>,
    pub lista_rateio_premio: Vec<PrizeTier>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrizeTier {
    pub valor_premio: Value,
}

impl PrizeTier {
    /// Prize value in currency units; 0.0 when absent or unusable.
    pub fn amount(&self) -> f64 {
        match &self.valor_premio {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0),
            Value::String(s) => normalize_monetary(s),
            _ => 0.0,
        }
    }
}

impl UpstreamResult {
    /// # Errors
    ///
    /// [`LotteryApiError::Upstream`] when `json` is not a result document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LotteryApiError::Upstream(format!("invalid result document: {e}")))
    }

    /// # Errors
    ///
    /// [`LotteryApiError::Upstream`] when the input cannot be read or is not
    /// a result document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| LotteryApiError::Upstream(format!("invalid result document: {e}")))
    }

    /// Draw number as text, trimmed. Empty when absent.
    pub fn draw_id(&self) -> String {
        match &self.numero {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_owned(),
            _ => String::new(),
        }
    }

    /// Convert into the canonical draw document.
    ///
    /// A prize tier is kept only when a winning number exists at the same
    /// position.
    ///
    /// # Errors
    ///
    /// [`LotteryApiError::Upstream`] when the document has no draw number.
    pub fn to_draw_record(&self) -> Result<DrawRecord> {
        let id = self.draw_id();
        if id.is_empty() {
            return Err(LotteryApiError::Upstream(
                "could not extract draw number from result document".to_owned(),
            ));
        }

        let results = self
            .lista_rateio_premio
            .iter()
            .zip(&self.dezenas_sorteadas_ordem_sorteio)
            .zip(1..)
            .map(|((tier, winning_number), position)| PrizeEntry {
                position,
                winning_number: winning_number.trim().to_owned(),
                prize_amount: tier.amount(),
            })
            .collect();

        Ok(DrawRecord {
            draw_number: normalize_integer(&id),
            date: normalize_date(&self.data_apuracao),
            results,
            id,
        })
    }
}
