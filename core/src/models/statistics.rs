// launchdeck/src/models/statistics.rs

use serde::Serialize;

/// Admin dashboard counters, read at call time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
  pub total_products: u64,
  pub accepted_products: u64,
  pub pending_products: u64,
  pub rejected_products: u64,
  pub total_reviews: u64,
  pub total_users: u64,
  pub total_creators: u64,
  pub upvotes: u64,
}
