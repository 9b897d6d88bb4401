//! Cell normalizers.
//!
//! Every function here is total: a malformed cell degrades to a documented
//! sentinel instead of failing, so one bad cell never aborts a file.
//!
//! | Function | Empty input | Unparseable input |
//! |----------|-------------|-------------------|
//! | [`normalize_monetary`] | `0.0` | `0.0` |
//! | [`normalize_date`] | `""` | the input, unchanged |
//! | [`normalize_integer`] | `0` | `0` |
//! | [`trim`] | `""` | n/a |

use chrono::NaiveDate;

/// Currency symbol stripped from monetary cells.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Day-first date layout used by the upstream spreadsheets.
pub const SOURCE_DATE_FORMAT: &str = "%d/%m/%Y";

/// ISO calendar date layout used in the published documents.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a Brazilian-formatted amount such as `R$ 1.234,56`.
///
/// The currency symbol and any whitespace are dropped, `.` thousands
/// separators are removed and the `,` decimal separator becomes `.`.
/// Returns `0.0` for empty, unparseable, non-finite or negative amounts.
pub fn normalize_monetary(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let cleaned: String = text
        .replace(CURRENCY_SYMBOL, "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Convert `DD/MM/YYYY` to `YYYY-MM-DD`.
///
/// Empty input gives an empty string; anything that does not parse is
/// returned unchanged, so downstream consumers must tolerate non-ISO dates.
pub fn normalize_date(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    NaiveDate::parse_from_str(text.trim(), SOURCE_DATE_FORMAT)
        .map(|date| date.format(API_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| text.to_owned())
}

/// Parse a cell made only of ASCII digits, otherwise `0`.
///
/// Values that overflow `u64` also read as `0`.
pub fn normalize_integer(text: &str) -> u64 {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    text.parse().unwrap_or(0)
}

/// Trim surrounding whitespace; an absent cell becomes an empty string.
pub fn trim(text: Option<&str>) -> String {
    text.map(str::trim).unwrap_or_default().to_owned()
}

/// Winning numbers are kept as text (leading zeros matter), only trimmed.
pub fn normalize_prize_number(text: &str) -> String {
    trim(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monetary_brazilian_format() {
        assert!((normalize_monetary("R$ 1.234,56") - 1234.56).abs() < f64::EPSILON);
        assert!((normalize_monetary("R$500.000,00") - 500_000.0).abs() < f64::EPSILON);
        assert!((normalize_monetary("18.000,00") - 18_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_monetary_fallbacks() {
        assert!(normalize_monetary("").abs() < f64::EPSILON);
        assert!(normalize_monetary("garbage").abs() < f64::EPSILON);
        assert!(normalize_monetary("R$").abs() < f64::EPSILON);
        assert!(normalize_monetary("-10,00").abs() < f64::EPSILON);
        assert!(normalize_monetary("inf").abs() < f64::EPSILON);
    }

    #[test]
    fn test_monetary_non_breaking_space() {
        assert!((normalize_monetary("R$\u{a0}2.500,50") - 2500.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_date_conversion() {
        assert_eq!(normalize_date("05/03/2024"), "2024-03-05");
        assert_eq!(normalize_date(" 31/12/1999 "), "1999-12-31");
    }

    #[test]
    fn test_date_fallbacks() {
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("not-a-date"), "not-a-date");
        assert_eq!(normalize_date("31/02/2024"), "31/02/2024");
        assert_eq!(normalize_date("2024-03-05"), "2024-03-05");
    }

    #[test]
    fn test_integer() {
        assert_eq!(normalize_integer("5843"), 5843);
        assert_eq!(normalize_integer("007"), 7);
        assert_eq!(normalize_integer(""), 0);
        assert_eq!(normalize_integer("12a"), 0);
        assert_eq!(normalize_integer("-3"), 0);
        assert_eq!(normalize_integer(" 12"), 0);
        assert_eq!(normalize_integer("99999999999999999999999"), 0);
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(None), "");
        assert_eq!(trim(Some("  041.234 \t")), "041.234");
        assert_eq!(normalize_prize_number(" 00123 "), "00123");
    }
}
