// launchdeck/src/models/coupon.rs

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

pub mod fields {
  pub const CODE: &str = "code";
  pub const EXPIRY_DATE: &str = "expiryDate";
  pub const DESCRIPTION: &str = "description";
  pub const DISCOUNT_AMOUNT: &str = "discountAmount";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
  #[serde(rename = "_id")]
  pub id: ObjectId,
  pub code: String,
  pub expiry_date: DateTime<Utc>,
  pub description: String,
  pub discount_amount: Decimal,
}

/// Outcome of a successful coupon validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRedemption {
  pub code: String,
  pub valid: bool,
  pub discount_amount: Decimal,
}

/// Raw coupon input as an admin form would send it.
///
/// `discount_amount` accepts a JSON number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDraft {
  pub code: Option<String>,
  pub expiry_date: Option<String>,
  pub description: Option<String>,
  pub discount_amount: Option<Value>,
}

/// A draft whose fields are all present and well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCouponDraft {
  pub code: String,
  pub expiry_date: DateTime<Utc>,
  pub description: String,
  pub discount_amount: Decimal,
}

impl CouponDraft {
  pub fn validate(&self) -> Result<ValidCouponDraft> {
    let discount_raw = self.discount_amount.as_ref().and_then(|v| match v {
      Value::Null => None,
      Value::String(s) => Some(s.clone()),
      other => Some(other.to_string()),
    });

    let missing = super::blank_fields(&[
      ("code", self.code.as_deref()),
      ("expiryDate", self.expiry_date.as_deref()),
      ("description", self.description.as_deref()),
      ("discountAmount", discount_raw.as_deref()),
    ]);
    if !missing.is_empty() {
      return Err(EngineError::MissingFields(missing));
    }

    // All four were checked non-blank above.
    let code = self.code.as_deref().unwrap_or_default().trim().to_string();
    let description = self.description.as_deref().unwrap_or_default().trim().to_string();
    let expiry_date = parse_expiry(self.expiry_date.as_deref().unwrap_or_default())?;
    let discount_amount = parse_discount(discount_raw.as_deref().unwrap_or_default())?;

    Ok(ValidCouponDraft {
      code,
      expiry_date,
      description,
      discount_amount,
    })
  }
}

/// Accepts RFC 3339 timestamps, or a bare `YYYY-MM-DD` meaning the last
/// instant of that day in UTC.
pub fn parse_expiry(raw: &str) -> Result<DateTime<Utc>> {
  let raw = raw.trim();
  if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
    return Ok(ts.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|day| day.and_hms_milli_opt(23, 59, 59, 999))
    .map(|end_of_day| end_of_day.and_utc())
    .ok_or_else(|| EngineError::InvalidField {
      field: "expiryDate",
      reason: format!("'{}' is neither an RFC 3339 timestamp nor a YYYY-MM-DD date", raw),
    })
}

/// Coerces a numeric string into a non-negative decimal.
pub fn parse_discount(raw: &str) -> Result<Decimal> {
  let raw = raw.trim();
  let amount = Decimal::from_str(raw)
    .or_else(|_| Decimal::from_scientific(raw))
    .map_err(|e| EngineError::InvalidField {
      field: "discountAmount",
      reason: format!("'{}' is not a number: {}", raw, e),
    })?;
  if amount.is_sign_negative() && !amount.is_zero() {
    return Err(EngineError::InvalidField {
      field: "discountAmount",
      reason: format!("{} is negative", amount),
    });
  }
  Ok(amount.normalize())
}
