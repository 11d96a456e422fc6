// launchdeck/src/engine/moderation.rs

//! Status/Feature Workflow.
//!
//! Any status in the enum may be set directly. Featuring is one-way; there is
//! no operation that clears the flag.

use crate::errors::Result;
use crate::identifier::ObjectId;
use crate::models::product::fields;
use crate::models::ProductStatus;
use crate::state::EngineState;
use crate::store::{timestamp_value, Filter, Patch};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Result of a workflow update on an existing product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowChange {
  pub product_id: ObjectId,
  /// `false` when the product already had the requested value.
  pub modified: bool,
}

/// Sets `field` to `value` unless it already holds it.
///
/// Zero matches means either "absent" (`NotFound`) or "already set" (no-op
/// success); a follow-up existence check tells the two apart.
async fn set_if_different(state: &EngineState, product_id: &ObjectId, field: &str, value: Value) -> Result<WorkflowChange> {
  let products = state.products();
  let filter = Filter::Id(*product_id).and(Filter::not_equals(field, value.clone()));
  let outcome = products
    .update(
      &filter,
      &[Patch::set(field, value), Patch::set(fields::UPDATED_AT, timestamp_value(state.now()))],
    )
    .await?;

  if outcome.matched {
    return Ok(WorkflowChange {
      product_id: *product_id,
      modified: outcome.modified,
    });
  }
  if products.exists(product_id).await? {
    debug!(field, "Value already set; nothing to change.");
    return Ok(WorkflowChange {
      product_id: *product_id,
      modified: false,
    });
  }
  Err(products.not_found(product_id))
}

#[instrument(name = "engine::set_status", skip_all, fields(product_id = %product_id, status = %status), err(level = "warn", Display))]
pub async fn set_status(state: &EngineState, product_id: &ObjectId, status: ProductStatus) -> Result<WorkflowChange> {
  let change = set_if_different(state, product_id, fields::STATUS, Value::from(status.as_str())).await?;
  info!(modified = change.modified, "Status updated.");
  Ok(change)
}

#[instrument(name = "engine::promote_featured", skip_all, fields(product_id = %product_id), err(level = "warn", Display))]
pub async fn promote_featured(state: &EngineState, product_id: &ObjectId) -> Result<WorkflowChange> {
  let change = set_if_different(state, product_id, fields::FEATURED, Value::Bool(true)).await?;
  info!(modified = change.modified, "Product featured.");
  Ok(change)
}
