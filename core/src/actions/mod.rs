// launchdeck/src/actions/mod.rs

//! Pipelines for the inbound mutating actions.
//!
//! Each action validates its input first, then hands off to one engine call.

pub mod common_steps;
pub mod contexts;
pub mod coupon;
pub mod report;
pub mod vote;
pub mod workflow;

use crate::errors::EngineError;
use crate::flow::{Dispatcher, FlowError};

/// Registers every action pipeline. Called once when a `Catalog` is built.
pub fn register_all_pipelines(dispatcher: &Dispatcher<EngineError>) -> Result<(), FlowError> {
  tracing::debug!("Registering action pipelines...");

  vote::register_upvote_pipeline(dispatcher)?;
  report::register_report_pipeline(dispatcher)?;
  workflow::register_set_status_pipeline(dispatcher)?;
  workflow::register_promote_featured_pipeline(dispatcher)?;
  coupon::register_validate_coupon_pipeline(dispatcher)?;

  tracing::debug!("All action pipelines registered.");
  Ok(())
}
