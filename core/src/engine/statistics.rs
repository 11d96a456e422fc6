// launchdeck/src/engine/statistics.rs

//! Statistics Aggregator.
//!
//! Each figure is a separate read; concurrent writers may make them disagree
//! slightly with one another. That is acceptable for a dashboard.

use crate::errors::Result;
use crate::models::product::fields as product_fields;
use crate::models::user::fields as user_fields;
use crate::models::{ProductStatus, Role, Statistics};
use crate::state::EngineState;
use crate::store::{Filter, SumExpr};
use tracing::{debug, instrument};

#[instrument(name = "engine::compute_statistics", skip_all, err(level = "warn", Display))]
pub async fn compute_statistics(state: &EngineState) -> Result<Statistics> {
  let products = state.products();
  let status_count = |status: ProductStatus| Filter::equals(product_fields::STATUS, status.as_str());

  let total_products = products.count(&Filter::All).await?;
  let accepted_products = products.count(&status_count(ProductStatus::Accepted)).await?;
  let pending_products = products.count(&status_count(ProductStatus::Pending)).await?;
  let rejected_products = products.count(&status_count(ProductStatus::Rejected)).await?;

  let total_reviews = state.reviews().count(&Filter::All).await?;

  let users = state.users();
  let total_users = users.count(&Filter::All).await?;
  let total_creators = users
    .count(&Filter::equals_ignore_case(user_fields::ROLE, Role::Creator.as_str()))
    .await?;

  let upvote_sum = state
    .store
    .aggregate_sum(products.name(), &SumExpr::size(product_fields::UPVOTED_BY), &Filter::All)
    .await?;

  let stats = Statistics {
    total_products,
    accepted_products,
    pending_products,
    rejected_products,
    total_reviews,
    total_users,
    total_creators,
    upvotes: upvote_sum.max(0.0).round() as u64,
  };
  debug!(?stats, "Statistics computed.");
  Ok(stats)
}
