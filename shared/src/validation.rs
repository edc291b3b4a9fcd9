//! Validation utilities for form input
//!
//! Form bodies arrive as plain strings. The helpers here coerce them into
//! typed values the same way the browser forms do (a blank number field
//! counts as zero) and collect failures into a [`FieldErrors`] map so a form
//! can show every problem at once.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use validator::ValidationErrors;

use crate::types::FieldErrors;

// ============================================================================
// Error collection
// ============================================================================

/// Record a message for a field
pub fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

/// Flatten `validator` errors into the form error map
pub fn to_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            push_error(&mut out, field, message);
        }
    }
    out
}

/// Merge `other` into `errors`, keeping message order per field
pub fn merge_errors(errors: &mut FieldErrors, other: FieldErrors) {
    for (field, messages) in other {
        errors.entry(field).or_default().extend(messages);
    }
}

// ============================================================================
// Coercion
// ============================================================================

/// Trim a text field, treating blank as absent
pub fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Coerce a form value to a decimal. Blank or missing is zero.
pub fn coerce_decimal(raw: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<Decimal> {
    let trimmed = raw.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    match trimmed.parse::<Decimal>() {
        Ok(value) => Some(value),
        Err(_) => {
            push_error(errors, field, "Expected number, received nan");
            None
        }
    }
}

/// Money is stored as NUMERIC(15,2): whole cents
pub const MONEY_SCALE: u32 = 2;

/// 9_999_999_999_999.99, the largest NUMERIC(15,2) value
pub const MAX_MONEY: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, MONEY_SCALE);

/// Round to whole cents, halves away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether the value can be stored in a money column as-is
pub fn is_money(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE && value.abs() <= MAX_MONEY
}

/// Coerce a money field: like [`coerce_decimal`], plus at most two decimals
/// and no more than [`MAX_MONEY`]
pub fn coerce_money(raw: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<Decimal> {
    let value = coerce_decimal(raw, field, errors)?;
    if value.normalize().scale() > MONEY_SCALE {
        push_error(errors, field, "Maksimal 2 angka di belakang koma.");
        return None;
    }
    if value.abs() > MAX_MONEY {
        push_error(errors, field, "Nilai terlalu besar.");
        return None;
    }
    Some(value)
}

/// Coerce a form value to a whole number. Blank or missing is zero.
pub fn coerce_int(raw: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<i32> {
    let trimmed = raw.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Ok(value) = trimmed.parse::<i32>() {
        return Some(value);
    }
    if trimmed.parse::<Decimal>().is_ok() {
        push_error(errors, field, "Expected integer, received float");
    } else {
        push_error(errors, field, "Expected number, received nan");
    }
    None
}

/// Parse the date formats produced by `<input type="date">`,
/// `<input type="datetime-local">` and RFC 3339 strings. Naive values are
/// taken as UTC.
pub fn parse_form_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// ============================================================================
// Rules
// ============================================================================

/// Require `value > 0`
pub fn require_positive(
    value: Option<Decimal>,
    field: &str,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    match value {
        Some(v) if v > Decimal::ZERO => Some(v),
        Some(_) => {
            push_error(errors, field, message);
            None
        }
        None => None,
    }
}

/// Require `value >= min`
pub fn require_at_least(
    value: Option<Decimal>,
    min: Decimal,
    field: &str,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    match value {
        Some(v) if v >= min => Some(v),
        Some(_) => {
            push_error(errors, field, message);
            None
        }
        None => None,
    }
}

/// Require an identifier-like field to be present
pub fn require_present(raw: Option<&str>, field: &str, message: &str, errors: &mut FieldErrors) -> Option<String> {
    let value = non_blank(raw);
    if value.is_none() {
        push_error(errors, field, message);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::str::FromStr;
    use validator::Validate;

    #[test]
    fn test_coerce_decimal_blank_is_zero() {
        let mut errors = FieldErrors::new();
        assert_eq!(coerce_decimal(Some("  "), "nominal", &mut errors), Some(Decimal::ZERO));
        assert_eq!(coerce_decimal(None, "nominal", &mut errors), Some(Decimal::ZERO));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_coerce_decimal_rejects_text() {
        let mut errors = FieldErrors::new();
        assert_eq!(coerce_decimal(Some("sepuluh"), "nominal", &mut errors), None);
        assert_eq!(errors["nominal"], vec!["Expected number, received nan"]);
    }

    #[test]
    fn test_coerce_decimal_keeps_precision() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            coerce_decimal(Some("120000.50"), "harga", &mut errors),
            Some(Decimal::from_str("120000.50").unwrap())
        );
    }

    #[test]
    fn test_max_money_is_numeric_15_2_limit() {
        assert_eq!(MAX_MONEY, Decimal::new(999_999_999_999_999, 2));
        assert_eq!(MAX_MONEY.to_string(), "9999999999999.99");
    }

    #[test]
    fn test_coerce_money_rejects_fractions_of_a_cent() {
        let mut errors = FieldErrors::new();
        assert_eq!(coerce_money(Some("1.005"), "harga_beli", &mut errors), None);
        assert_eq!(errors["harga_beli"], vec!["Maksimal 2 angka di belakang koma."]);
    }

    #[test]
    fn test_coerce_money_accepts_trailing_zeros() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            coerce_money(Some("120000.500"), "harga_beli", &mut errors),
            Some(Decimal::from_str("120000.5").unwrap())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_coerce_money_rejects_out_of_range() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            coerce_money(Some("79228162514264337593543950335"), "harga_beli", &mut errors),
            None
        );
        assert_eq!(errors["harga_beli"], vec!["Nilai terlalu besar."]);

        let mut errors = FieldErrors::new();
        assert_eq!(coerce_money(Some("9999999999999.99"), "nominal", &mut errors), Some(MAX_MONEY));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(Decimal::from_str("0.005").unwrap()), Decimal::from_str("0.01").unwrap());
        assert_eq!(round_money(Decimal::from_str("-0.005").unwrap()), Decimal::from_str("-0.01").unwrap());
        assert_eq!(round_money(Decimal::from_str("7.5").unwrap()), Decimal::from_str("7.50").unwrap());
    }

    #[test]
    fn test_coerce_int() {
        let mut errors = FieldErrors::new();
        assert_eq!(coerce_int(Some("10"), "jumlah", &mut errors), Some(10));
        assert_eq!(coerce_int(Some(""), "jumlah", &mut errors), Some(0));
        assert!(errors.is_empty());

        assert_eq!(coerce_int(Some("2.5"), "jumlah", &mut errors), None);
        assert_eq!(errors["jumlah"], vec!["Expected integer, received float"]);
    }

    #[test]
    fn test_parse_form_date_formats() {
        let d = parse_form_date("2025-01-05").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2025, 1, 5));

        let dt = parse_form_date("2025-01-05T10:30").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (10, 30));

        let rfc = parse_form_date("2025-01-05T10:30:00+07:00").unwrap();
        assert_eq!(rfc.hour(), 3);

        assert!(parse_form_date("kemarin").is_none());
        assert!(parse_form_date("").is_none());
    }

    #[test]
    fn test_require_positive() {
        let mut errors = FieldErrors::new();
        assert!(require_positive(Some(Decimal::ZERO), "nominal", "harus > 0", &mut errors).is_none());
        assert!(require_positive(Some(Decimal::ONE), "nominal", "harus > 0", &mut errors).is_some());
        assert_eq!(errors["nominal"], vec!["harus > 0"]);
    }

    #[derive(Validate)]
    struct Named {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
    }

    #[test]
    fn test_to_field_errors_uses_messages() {
        let err = Named { name: "ab".into() }.validate().unwrap_err();
        let errors = to_field_errors(&err);
        assert_eq!(errors["name"], vec!["too short"]);
    }

    #[test]
    fn test_merge_errors_appends() {
        let mut a = FieldErrors::new();
        push_error(&mut a, "x", "one");
        let mut b = FieldErrors::new();
        push_error(&mut b, "x", "two");
        push_error(&mut b, "y", "three");
        merge_errors(&mut a, b);
        assert_eq!(a["x"], vec!["one", "two"]);
        assert_eq!(a["y"], vec!["three"]);
    }
}
