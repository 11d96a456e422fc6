// launchdeck/src/models/review.rs

use crate::identifier::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod fields {
  pub const PRODUCT_ID: &str = "productId";
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  #[serde(rename = "_id")]
  pub id: ObjectId,
  pub product_id: ObjectId,
  pub author: String,
  #[serde(default)]
  pub content: String,
  pub rating: u8,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
  #[serde(default)]
  pub author: String,
  #[serde(default)]
  pub content: String,
  pub rating: Option<u8>,
}
