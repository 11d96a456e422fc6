// launchdeck/src/adapters/products.rs

//! Product Store Adapter: product-specific queries and edits.

use super::TypedCollection;
use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use crate::models::product::{fields, normalize_tags};
use crate::models::{Product, ProductEdit, ProductQuery, ProductStatus};
use crate::store::{timestamp_value, Filter, Patch};
use chrono::{DateTime, Utc};
use serde_json::Value;

impl TypedCollection<'_, Product> {
  pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    self.find(&query.to_filter()).await
  }

  /// Accepted products, most voted first; ties keep the older product first.
  pub async fn trending(&self, limit: Option<usize>) -> Result<Vec<Product>> {
    let mut products = self
      .find(&Filter::equals(fields::STATUS, ProductStatus::Accepted.as_str()))
      .await?;
    products.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.created_at.cmp(&b.created_at)));
    if let Some(limit) = limit {
      products.truncate(limit);
    }
    Ok(products)
  }

  /// Applies owner edits in one update and returns the edited product.
  pub async fn apply_edit(&self, id: &ObjectId, edit: ProductEdit, now: DateTime<Utc>) -> Result<Product> {
    if edit.is_empty() {
      return self.require(id).await;
    }

    let mut patches = Vec::with_capacity(5);
    if let Some(name) = edit.name {
      let name = name.trim().to_string();
      if name.is_empty() {
        return Err(EngineError::MissingFields(vec!["name"]));
      }
      patches.push(Patch::set(fields::NAME, name));
    }
    if let Some(description) = edit.description {
      patches.push(Patch::set(fields::DESCRIPTION, description));
    }
    if let Some(tags) = edit.tags {
      let tags: Vec<Value> = normalize_tags(tags).into_iter().map(Value::String).collect();
      patches.push(Patch::set(fields::TAGS, tags));
    }
    if let Some(links) = edit.external_links {
      patches.push(Patch::set(fields::EXTERNAL_LINKS, links));
    }
    patches.push(Patch::set(fields::UPDATED_AT, timestamp_value(now)));

    self
      .update_returning(&Filter::Id(*id), &patches)
      .await?
      .ok_or_else(|| self.not_found(id))
  }
}
