//! Lenient parsing of client-supplied fields.
//!
//! Forms post dates as `YYYY-MM-DD` or full timestamps, and numbers as
//! either JSON numbers or strings. These helpers accept both and return
//! `None` for anything unusable so callers pick the fallback.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

/// `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its UTC date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]` (what datetime-local inputs send) read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// A non-negative amount from a JSON number or numeric string.
pub fn coerce_decimal(value: Option<&Value>) -> Option<Decimal> {
    let parsed = match value? {
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => decimal_from_str(s.trim()),
        _ => None,
    }?;
    (parsed >= Decimal::ZERO).then_some(parsed)
}

/// A strictly positive integer from a JSON number (truncated) or integer string.
pub fn coerce_positive_int(value: Option<&Value>) -> Option<i32> {
    let parsed = match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    i32::try_from(parsed).ok().filter(|n| *n > 0)
}

/// Trimmed text, or `None` when absent or blank.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn decimal_from_str(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn d(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[rstest]
    #[case("2026-06-01", Some((2026, 6, 1)))]
    #[case(" 2026-06-01 ", Some((2026, 6, 1)))]
    #[case("2026-06-01T23:30:00Z", Some((2026, 6, 1)))]
    #[case("2026-06-01T23:30:00-02:00", Some((2026, 6, 2)))]
    #[case("01/06/2026", None)]
    #[case("", None)]
    fn dates(#[case] raw: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
        assert_eq!(parse_date(raw), expected);
    }

    #[test]
    fn datetime_local_input_is_read_as_utc() {
        let ts = parse_timestamp("2026-06-02T10:00").expect("timestamp");
        assert_eq!(ts.to_rfc3339(), "2026-06-02T10:00:00+00:00");
    }

    #[rstest]
    #[case(json!(25), Some(d("25")))]
    #[case(json!(12.5), Some(d("12.5")))]
    #[case(json!("40.25"), Some(d("40.25")))]
    #[case(json!(" 7 "), Some(d("7")))]
    #[case(json!("free"), None)]
    #[case(json!(-3), None)]
    #[case(json!(null), None)]
    #[case(json!(true), None)]
    fn decimals(#[case] value: Value, #[case] expected: Option<Decimal>) {
        assert_eq!(coerce_decimal(Some(&value)), expected);
    }

    #[test]
    fn absent_decimal_is_none() {
        assert_eq!(coerce_decimal(None), None);
    }

    #[rstest]
    #[case(json!(90), Some(90))]
    #[case(json!(90.9), Some(90))]
    #[case(json!("120"), Some(120))]
    #[case(json!("two hours"), None)]
    #[case(json!(0), None)]
    #[case(json!(-15), None)]
    #[case(json!(10_000_000_000_i64), None)]
    fn positive_ints(#[case] value: Value, #[case] expected: Option<i32>) {
        assert_eq!(coerce_positive_int(Some(&value)), expected);
    }

    #[test]
    fn blank_text_is_none() {
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" Paris ")), Some("Paris".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
