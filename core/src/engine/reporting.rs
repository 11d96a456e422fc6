// launchdeck/src/engine/reporting.rs

//! Reporting Engine: append-only moderation reports.

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use crate::models::product::fields;
use crate::models::Report;
use crate::state::EngineState;
use crate::store::{self, timestamp_value, Filter, Patch};
use serde_json::Value;
use tracing::{info, instrument};

/// Appends a report and flags the product as reported, in one update.
///
/// Repeat reports from the same reporter are all kept.
#[instrument(name = "engine::report", skip_all, fields(product_id = %product_id, reporter = %reporter_id), err(level = "warn", Display))]
pub async fn report(state: &EngineState, product_id: &ObjectId, reporter_id: &str, reason: &str) -> Result<Report> {
  if let Some(max_len) = state.config.report_reason_max_len {
    let len = reason.chars().count();
    if len > max_len {
      return Err(EngineError::InvalidField {
        field: "reason",
        reason: format!("{} characters exceeds the limit of {}", len, max_len),
      });
    }
  }

  let now = state.now();
  let report = Report {
    reporter_id: reporter_id.trim().to_string(),
    reason: reason.to_string(),
    reported_at: now,
  };

  let products = state.products();
  let outcome = products
    .update(
      &Filter::Id(*product_id),
      &[
        Patch::push(fields::REPORTS, Value::Object(store::to_document(&report)?)),
        Patch::set(fields::REPORTED, true),
        Patch::set(fields::UPDATED_AT, timestamp_value(now)),
      ],
    )
    .await?;

  if !outcome.matched {
    return Err(products.not_found(product_id));
  }
  info!("Report recorded.");
  Ok(report)
}

/// Reports filed against a product, oldest first.
pub async fn reports_for(state: &EngineState, product_id: &ObjectId) -> Result<Vec<Report>> {
  Ok(state.products().require(product_id).await?.reports)
}
