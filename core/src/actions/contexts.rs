// launchdeck/src/actions/contexts.rs

//! Per-action context structs. Each pipeline is keyed by its context type.
//!
//! Inputs arrive raw (unvalidated strings); steps fill in the parsed values
//! and finally the result.

use crate::engine::moderation::WorkflowChange;
use crate::identifier::ObjectId;
use crate::models::{CouponRedemption, ProductStatus, Report};
use crate::state::EngineState;

/// Contexts whose first step validates a product identifier.
pub trait TargetsProduct: Send + Sync + 'static {
  fn raw_product_id(&self) -> &str;
  fn product_id(&self) -> Option<ObjectId>;
  fn set_product_id(&mut self, id: ObjectId);
}

macro_rules! targets_product {
  ($ctx:ty) => {
    impl TargetsProduct for $ctx {
      fn raw_product_id(&self) -> &str {
        &self.raw_product_id
      }
      fn product_id(&self) -> Option<ObjectId> {
        self.product_id
      }
      fn set_product_id(&mut self, id: ObjectId) {
        self.product_id = Some(id);
      }
    }
  };
}

#[derive(Clone)]
pub struct UpvoteCtxData {
  pub state: EngineState,
  pub raw_product_id: String,
  pub voter_id: String,
  pub product_id: Option<ObjectId>,
  pub votes: Option<u64>,
}

#[derive(Clone)]
pub struct ReportCtxData {
  pub state: EngineState,
  pub raw_product_id: String,
  pub reporter_id: String,
  pub reason: String,
  pub product_id: Option<ObjectId>,
  pub report: Option<Report>,
}

#[derive(Clone)]
pub struct SetStatusCtxData {
  pub state: EngineState,
  pub raw_product_id: String,
  pub raw_status: String,
  pub product_id: Option<ObjectId>,
  pub status: Option<ProductStatus>,
  pub change: Option<WorkflowChange>,
}

#[derive(Clone)]
pub struct PromoteFeaturedCtxData {
  pub state: EngineState,
  pub raw_product_id: String,
  pub product_id: Option<ObjectId>,
  pub change: Option<WorkflowChange>,
}

#[derive(Clone)]
pub struct ValidateCouponCtxData {
  pub state: EngineState,
  pub code: String,
  pub redemption: Option<CouponRedemption>,
}

targets_product!(UpvoteCtxData);
targets_product!(ReportCtxData);
targets_product!(SetStatusCtxData);
targets_product!(PromoteFeaturedCtxData);

impl UpvoteCtxData {
  pub fn new(state: EngineState, raw_product_id: &str, voter_id: &str) -> Self {
    Self {
      state,
      raw_product_id: raw_product_id.to_string(),
      voter_id: voter_id.to_string(),
      product_id: None,
      votes: None,
    }
  }
}

impl ReportCtxData {
  pub fn new(state: EngineState, raw_product_id: &str, reporter_id: &str, reason: &str) -> Self {
    Self {
      state,
      raw_product_id: raw_product_id.to_string(),
      reporter_id: reporter_id.to_string(),
      reason: reason.to_string(),
      product_id: None,
      report: None,
    }
  }
}

impl SetStatusCtxData {
  pub fn new(state: EngineState, raw_product_id: &str, raw_status: &str) -> Self {
    Self {
      state,
      raw_product_id: raw_product_id.to_string(),
      raw_status: raw_status.to_string(),
      product_id: None,
      status: None,
      change: None,
    }
  }
}

impl PromoteFeaturedCtxData {
  pub fn new(state: EngineState, raw_product_id: &str) -> Self {
    Self {
      state,
      raw_product_id: raw_product_id.to_string(),
      product_id: None,
      change: None,
    }
  }
}

impl ValidateCouponCtxData {
  pub fn new(state: EngineState, code: &str) -> Self {
    Self {
      state,
      code: code.to_string(),
      redemption: None,
    }
  }
}
