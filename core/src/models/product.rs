// launchdeck/src/models/product.rs

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use crate::store::Filter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Stored field names, shared by filters and patches.
pub mod fields {
  pub const OWNER_EMAIL: &str = "ownerEmail";
  pub const NAME: &str = "name";
  pub const DESCRIPTION: &str = "description";
  pub const TAGS: &str = "tags";
  pub const EXTERNAL_LINKS: &str = "externalLinks";
  pub const STATUS: &str = "status";
  pub const FEATURED: &str = "featured";
  pub const VOTES: &str = "votes";
  pub const UPVOTED_BY: &str = "upvotedBy";
  pub const REPORTED: &str = "reported";
  pub const REPORTS: &str = "reports";
  pub const UPDATED_AT: &str = "updatedAt";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductStatus {
  #[default]
  Pending,
  Accepted,
  Rejected,
}

impl ProductStatus {
  pub const ALL: [ProductStatus; 3] = [ProductStatus::Pending, ProductStatus::Accepted, ProductStatus::Rejected];

  pub fn as_str(&self) -> &'static str {
    match self {
      ProductStatus::Pending => "Pending",
      ProductStatus::Accepted => "Accepted",
      ProductStatus::Rejected => "Rejected",
    }
  }

  /// Parses a status name, ignoring case. Anything outside the enum is `InvalidStatus`.
  pub fn parse(raw: &str) -> Result<Self> {
    let wanted = raw.trim();
    Self::ALL
      .into_iter()
      .find(|s| s.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| EngineError::InvalidStatus(raw.to_string()))
  }
}

impl fmt::Display for ProductStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ProductStatus {
  type Err = EngineError;

  fn from_str(s: &str) -> Result<Self> {
    ProductStatus::parse(s)
  }
}

/// A moderation report. Immutable once appended to its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
  pub reporter_id: String,
  pub reason: String,
  pub reported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  #[serde(rename = "_id")]
  pub id: ObjectId,
  pub owner_email: String,
  #[serde(default)]
  pub owner_name: Option<String>,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub tags: BTreeSet<String>,
  #[serde(default)]
  pub external_links: Vec<String>,
  #[serde(default)]
  pub status: ProductStatus,
  #[serde(default)]
  pub featured: bool,
  #[serde(default)]
  pub votes: u64,
  #[serde(default)]
  pub upvoted_by: Vec<String>,
  #[serde(default)]
  pub reported: bool,
  #[serde(default)]
  pub reports: Vec<Report>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// A freshly submitted product: pending, unfeatured, no votes, no reports.
  pub fn from_submission(submission: ProductSubmission, now: DateTime<Utc>) -> Result<Self> {
    let missing = super::blank_fields(&[
      ("ownerEmail", Some(submission.owner_email.as_str())),
      ("name", Some(submission.name.as_str())),
    ]);
    if !missing.is_empty() {
      return Err(EngineError::MissingFields(missing));
    }

    Ok(Self {
      id: ObjectId::new(),
      owner_email: submission.owner_email.trim().to_string(),
      owner_name: submission.owner_name,
      name: submission.name.trim().to_string(),
      description: submission.description,
      tags: normalize_tags(submission.tags),
      external_links: submission.external_links,
      status: ProductStatus::Pending,
      featured: false,
      votes: 0,
      upvoted_by: Vec::new(),
      reported: false,
      reports: Vec::new(),
      created_at: now,
      updated_at: now,
    })
  }

  pub fn has_voted(&self, voter_id: &str) -> bool {
    self.upvoted_by.iter().any(|v| v == voter_id)
  }
}

/// Trims, drops empties and de-duplicates.
pub(crate) fn normalize_tags(tags: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  tags
    .into_iter()
    .map(|t| t.trim().to_string())
    .filter(|t| !t.is_empty())
    .collect()
}

/// Input for submitting a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubmission {
  #[serde(default)]
  pub owner_email: String,
  #[serde(default)]
  pub owner_name: Option<String>,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub external_links: Vec<String>,
}

/// Owner-editable fields; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEdit {
  pub name: Option<String>,
  pub description: Option<String>,
  pub tags: Option<Vec<String>>,
  pub external_links: Option<Vec<String>>,
}

impl ProductEdit {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.description.is_none() && self.tags.is_none() && self.external_links.is_none()
  }
}

/// Listing filter; unset fields do not constrain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
  pub owner_email: Option<String>,
  pub status: Option<ProductStatus>,
  pub featured: Option<bool>,
  pub reported: Option<bool>,
}

impl ProductQuery {
  pub fn to_filter(&self) -> Filter {
    let mut filter = Filter::All;
    if let Some(email) = &self.owner_email {
      filter = filter.and(Filter::equals(fields::OWNER_EMAIL, email.as_str()));
    }
    if let Some(status) = self.status {
      filter = filter.and(Filter::equals(fields::STATUS, status.as_str()));
    }
    if let Some(featured) = self.featured {
      filter = filter.and(Filter::equals(fields::FEATURED, featured));
    }
    if let Some(reported) = self.reported {
      filter = filter.and(Filter::equals(fields::REPORTED, reported));
    }
    filter
  }
}
