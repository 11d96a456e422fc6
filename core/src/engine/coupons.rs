// launchdeck/src/engine/coupons.rs

//! Coupon Engine.
//!
//! Validity is always evaluated against the clock at call time; nothing about
//! expiry is cached or persisted.

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use crate::models::coupon::fields;
use crate::models::{Coupon, CouponDraft, CouponRedemption};
use crate::state::EngineState;
use crate::store::{timestamp_value, Filter, GuardedUpdate, Patch};
use serde_json::Value;
use tracing::{info, instrument, warn};

fn unexpired(state: &EngineState) -> Filter {
  Filter::gte(fields::EXPIRY_DATE, timestamp_value(state.now()))
}

/// Looks up an unexpired coupon by exact code.
#[instrument(name = "engine::validate_coupon", skip(state), err(level = "warn", Display))]
pub async fn validate(state: &EngineState, code: &str) -> Result<CouponRedemption> {
  let code = code.trim();
  if code.is_empty() {
    return Err(EngineError::MissingFields(vec!["code"]));
  }

  let filter = Filter::equals(fields::CODE, code).and(unexpired(state));
  match state.coupons().find_one(&filter).await? {
    Some(coupon) => {
      info!(discount = %coupon.discount_amount, "Coupon accepted.");
      Ok(CouponRedemption {
        code: coupon.code,
        valid: true,
        discount_amount: coupon.discount_amount,
      })
    }
    None => {
      warn!("Coupon rejected.");
      Err(EngineError::InvalidOrExpiredCoupon(code.to_string()))
    }
  }
}

pub async fn list(state: &EngineState) -> Result<Vec<Coupon>> {
  state.coupons().find(&Filter::All).await
}

/// Coupons whose expiry is not yet past, as of now.
pub async fn list_valid(state: &EngineState) -> Result<Vec<Coupon>> {
  state.coupons().find(&unexpired(state)).await
}

pub async fn get(state: &EngineState, id: &ObjectId) -> Result<Coupon> {
  state.coupons().require(id).await
}

#[instrument(name = "engine::create_coupon", skip_all, err(level = "warn", Display))]
pub async fn create(state: &EngineState, draft: &CouponDraft) -> Result<Coupon> {
  let valid = draft.validate()?;
  let coupon = Coupon {
    id: ObjectId::new(),
    code: valid.code,
    expiry_date: valid.expiry_date,
    description: valid.description,
    discount_amount: valid.discount_amount,
  };

  let inserted = state
    .coupons()
    .insert_unless(&Filter::equals(fields::CODE, coupon.code.as_str()), &coupon)
    .await?;
  if inserted.is_none() {
    return Err(EngineError::Conflict(format!("Coupon code '{}' already exists.", coupon.code)));
  }
  info!(coupon_id = %coupon.id, code = %coupon.code, "Coupon created.");
  Ok(coupon)
}

/// Replaces every field of an existing coupon.
#[instrument(name = "engine::update_coupon", skip_all, fields(coupon_id = %id), err(level = "warn", Display))]
pub async fn update(state: &EngineState, id: &ObjectId, draft: &CouponDraft) -> Result<Coupon> {
  let valid = draft.validate()?;
  let coupons = state.coupons();

  let patches = [
    Patch::set(fields::CODE, valid.code.as_str()),
    Patch::set(fields::EXPIRY_DATE, timestamp_value(valid.expiry_date)),
    Patch::set(fields::DESCRIPTION, valid.description.as_str()),
    Patch::set(fields::DISCOUNT_AMOUNT, Value::String(valid.discount_amount.to_string())),
  ];
  let clash = Filter::equals(fields::CODE, valid.code.as_str());
  match coupons
    .update_returning_unless(&Filter::Id(*id), &clash, &patches)
    .await?
  {
    GuardedUpdate::Updated(updated) => {
      info!("Coupon updated.");
      Ok(updated)
    }
    GuardedUpdate::Blocked => Err(EngineError::Conflict(format!(
      "Coupon code '{}' already exists.",
      valid.code
    ))),
    GuardedUpdate::NoMatch => Err(coupons.not_found(id)),
  }
}

#[instrument(name = "engine::delete_coupon", skip_all, fields(coupon_id = %id), err(level = "warn", Display))]
pub async fn delete(state: &EngineState, id: &ObjectId) -> Result<()> {
  let coupons = state.coupons();
  if !coupons.delete(id).await? {
    return Err(coupons.not_found(id));
  }
  info!("Coupon deleted.");
  Ok(())
}
