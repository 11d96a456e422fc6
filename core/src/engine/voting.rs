// launchdeck/src/engine/voting.rs

//! Voting Engine: at most one upvote per voter per product.

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use crate::models::product::fields;
use crate::state::EngineState;
use crate::store::{timestamp_value, Filter, Patch};
use tracing::{info, instrument, warn};

/// Records `voter_id`'s upvote and returns the product's new vote count.
///
/// Membership check and increment are one conditional update: the filter
/// only matches while `voter_id` is absent from `upvotedBy`, so two racing
/// calls from the same voter cannot both succeed.
#[instrument(name = "engine::upvote", skip_all, fields(product_id = %product_id, voter = %voter_id), err(level = "warn", Display))]
pub async fn upvote(state: &EngineState, product_id: &ObjectId, voter_id: &str) -> Result<u64> {
  let voter_id = voter_id.trim();
  if voter_id.is_empty() {
    return Err(EngineError::MissingFields(vec!["voterId"]));
  }

  let products = state.products();
  let filter = Filter::Id(*product_id).and(Filter::not_contains(fields::UPVOTED_BY, voter_id));
  let patches = [
    Patch::inc(fields::VOTES, 1),
    Patch::add_to_set(fields::UPVOTED_BY, voter_id),
    Patch::set(fields::UPDATED_AT, timestamp_value(state.now())),
  ];

  if let Some(product) = products.update_returning(&filter, &patches).await? {
    info!(votes = product.votes, "Upvote recorded.");
    return Ok(product.votes);
  }

  if !products.exists(product_id).await? {
    return Err(products.not_found(product_id));
  }
  warn!(voter = %voter_id, "Duplicate upvote rejected.");
  Err(EngineError::AlreadyVoted {
    product_id: product_id.to_hex(),
    voter: voter_id.to_string(),
  })
}

/// Whether `voter_id` has already upvoted the product.
pub async fn has_voted(state: &EngineState, product_id: &ObjectId, voter_id: &str) -> Result<bool> {
  Ok(state.products().require(product_id).await?.has_voted(voter_id.trim()))
}
