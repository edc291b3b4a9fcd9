//! Common types used across the platform

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Database identifier (BIGSERIAL)
pub type Id = i64;

/// Field name -> list of messages, the shape returned to forms on validation failure
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Why a raw identifier could not be turned into an [`Id`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier `{0}` is not a number")]
    NotNumeric(String),

    #[error("identifier must be positive, got {0}")]
    NotPositive(i64),
}

/// Parse an identifier coming from a path segment or a form field.
///
/// Surrounding whitespace is ignored; anything else that is not a plain
/// base-10 integer is rejected.
pub fn parse_id(raw: &str) -> Result<Id, IdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty);
    }

    let id = trimmed
        .parse::<i64>()
        .map_err(|_| IdError::NotNumeric(trimmed.to_string()))?;

    if id <= 0 {
        return Err(IdError::NotPositive(id));
    }

    Ok(id)
}

/// Payment status of a purchase or sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[serde(rename = "lunas")]
    Paid,
    #[default]
    #[serde(rename = "belum_lunas")]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "lunas",
            PaymentStatus::Unpaid => "belum_lunas",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "lunas" => Ok(PaymentStatus::Paid),
            "belum_lunas" => Ok(PaymentStatus::Unpaid),
            other => Err(format!("unknown payment status `{}`", other)),
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role carried by a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "kasir")]
    Cashier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Cashier => "kasir",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "kasir" => Ok(UserRole::Cashier),
            other => Err(format!("unknown role `{}`", other)),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Result of a form action that did not redirect
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub errors: FieldErrors,
}

impl ActionState {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: FieldErrors::new(),
        }
    }

    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            message: Some(message.into()),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_padded_numbers() {
        assert_eq!(parse_id("42"), Ok(42));
        assert_eq!(parse_id("  7 \n"), Ok(7));
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert_eq!(parse_id(""), Err(IdError::Empty));
        assert_eq!(parse_id("   "), Err(IdError::Empty));
        assert_eq!(parse_id("12n"), Err(IdError::NotNumeric("12n".to_string())));
        assert_eq!(parse_id("abc"), Err(IdError::NotNumeric("abc".to_string())));
        assert_eq!(parse_id("1.5"), Err(IdError::NotNumeric("1.5".to_string())));
    }

    #[test]
    fn test_parse_id_rejects_non_positive() {
        assert_eq!(parse_id("0"), Err(IdError::NotPositive(0)));
        assert_eq!(parse_id("-3"), Err(IdError::NotPositive(-3)));
    }

    #[test]
    fn test_payment_status_round_trip_names() {
        assert_eq!("lunas".parse::<PaymentStatus>(), Ok(PaymentStatus::Paid));
        assert_eq!("belum_lunas".parse::<PaymentStatus>(), Ok(PaymentStatus::Unpaid));
        assert!("paid".parse::<PaymentStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"belum_lunas\""
        );
    }

    #[test]
    fn test_user_role_names() {
        assert_eq!(UserRole::Cashier.as_str(), "kasir");
        assert_eq!(UserRole::try_from("admin".to_string()), Ok(UserRole::Admin));
    }

    #[test]
    fn test_action_state_skips_empty_errors() {
        let json = serde_json::to_value(ActionState::message("ok")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "ok" }));
    }
}
