// launchdeck/src/actions/common_steps.rs

use super::contexts::TargetsProduct;
use crate::errors::{EngineError, Result};
use crate::flow::{ContextData, StepControl};
use crate::identifier::{self, ObjectId};

pub const VALIDATE_IDENTIFIER: &str = "validate_identifier";

/// First step of every product action: reject malformed ids before any
/// store call.
pub async fn validate_identifier<T: TargetsProduct>(ctx: ContextData<T>) -> Result<StepControl> {
  let raw = ctx.read().raw_product_id().to_string();
  let id = identifier::validate(&raw)?;
  ctx.write().set_product_id(id);
  Ok(StepControl::Continue)
}

/// The id set by `validate_identifier`.
pub fn validated_id<T: TargetsProduct>(ctx: &ContextData<T>) -> Result<ObjectId> {
  ctx
    .read()
    .product_id()
    .ok_or_else(|| EngineError::Internal(format!("{} step did not run", VALIDATE_IDENTIFIER)))
}
