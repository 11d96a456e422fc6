// launchdeck/src/engine/reviews.rs

//! Product reviews: append-only.

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use crate::models::review::{fields, MAX_RATING, MIN_RATING};
use crate::models::{NewReview, Review};
use crate::state::EngineState;
use crate::store::Filter;
use tracing::{info, instrument};

#[instrument(name = "engine::add_review", skip_all, fields(product_id = %product_id), err(level = "warn", Display))]
pub async fn add(state: &EngineState, product_id: &ObjectId, new_review: NewReview) -> Result<Review> {
  let mut missing = Vec::new();
  if new_review.author.trim().is_empty() {
    missing.push("author");
  }
  if new_review.rating.is_none() {
    missing.push("rating");
  }
  if !missing.is_empty() {
    return Err(EngineError::MissingFields(missing));
  }

  let rating = new_review.rating.unwrap_or_default();
  if !(MIN_RATING..=MAX_RATING).contains(&rating) {
    return Err(EngineError::InvalidField {
      field: "rating",
      reason: format!("{} is outside {}..={}", rating, MIN_RATING, MAX_RATING),
    });
  }

  let products = state.products();
  if !products.exists(product_id).await? {
    return Err(products.not_found(product_id));
  }

  let review = Review {
    id: ObjectId::new(),
    product_id: *product_id,
    author: new_review.author.trim().to_string(),
    content: new_review.content,
    rating,
    created_at: state.now(),
  };
  state.reviews().insert(&review).await?;
  info!(review_id = %review.id, rating, "Review added.");
  Ok(review)
}

pub async fn list_for_product(state: &EngineState, product_id: &ObjectId) -> Result<Vec<Review>> {
  state
    .reviews()
    .find(&Filter::equals(fields::PRODUCT_ID, product_id.to_hex()))
    .await
}
