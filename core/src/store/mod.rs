// launchdeck/src/store/mod.rs

//! The persistence collaborator, seen as a generic document store.
//!
//! Engines never read-then-write. Every invariant-bearing mutation is a single
//! `update_one` / `find_one_and_update` whose filter carries the condition,
//! so the store enforces it per document.

pub mod filter;
pub mod memory;
pub mod patch;

pub use filter::Filter;
pub use memory::MemoryStore;
pub use patch::Patch;

use crate::identifier::ObjectId;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document: a JSON object whose `_id` holds the hex identifier.
pub type Document = Map<String, Value>;

/// Name of the identifier field in every document.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Collection '{0}' is unavailable")]
  Unavailable(String),

  #[error("Document codec failure: {0}")]
  Codec(#[from] serde_json::Error),

  #[error("Malformed document in '{collection}': {reason}")]
  Malformed { collection: String, reason: String },

  #[error("Duplicate identifier {id} in '{collection}'")]
  DuplicateId { collection: String, id: String },

  #[error("Store backend failure: {0}")]
  Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result of `update_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
  /// A document satisfied the filter.
  pub matched: bool,
  /// The matched document actually changed.
  pub modified: bool,
}

/// Result of `update_one_unless`.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardedUpdate<T = Document> {
  /// The post-update document.
  Updated(T),
  /// Some other document matched the guard; nothing was written.
  Blocked,
  /// No document matched the filter.
  NoMatch,
}

impl<T> GuardedUpdate<T> {
  pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<GuardedUpdate<U>, E> {
    Ok(match self {
      GuardedUpdate::Updated(value) => GuardedUpdate::Updated(f(value)?),
      GuardedUpdate::Blocked => GuardedUpdate::Blocked,
      GuardedUpdate::NoMatch => GuardedUpdate::NoMatch,
    })
  }
}

/// Result of `delete_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
  pub deleted: bool,
}

/// Per-document expression summed by `aggregate_sum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SumExpr {
  /// Numeric value of a field; missing or non-numeric counts as zero.
  Field(String),
  /// Length of an array field; missing counts as zero.
  Size(String),
}

impl SumExpr {
  pub fn field(name: impl Into<String>) -> Self {
    SumExpr::Field(name.into())
  }

  pub fn size(name: impl Into<String>) -> Self {
    SumExpr::Size(name.into())
  }

  pub fn evaluate(&self, doc: &Document) -> f64 {
    match self {
      SumExpr::Field(name) => doc.get(name).and_then(Value::as_f64).unwrap_or(0.0),
      SumExpr::Size(name) => doc.get(name).and_then(Value::as_array).map_or(0.0, |a| a.len() as f64),
    }
  }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
  async fn find_by_id(&self, collection: &str, id: &ObjectId) -> StoreResult<Option<Document>>;

  /// All documents matching `filter`, in insertion order.
  async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

  async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

  /// Inserts `doc`, generating an `_id` when it has none. Returns the id.
  async fn insert(&self, collection: &str, doc: Document) -> StoreResult<ObjectId>;

  /// Inserts `doc` only if no document matches `unless`, atomically.
  /// Returns `None` when a match already existed.
  async fn insert_if_absent(&self, collection: &str, unless: &Filter, doc: Document) -> StoreResult<Option<ObjectId>>;

  /// Applies `patches` to the first document matching `filter`, atomically.
  async fn update_one(&self, collection: &str, filter: &Filter, patches: &[Patch]) -> StoreResult<UpdateOutcome>;

  /// Like `update_one`, but returns the updated document (or `None` on no match).
  async fn find_one_and_update(
    &self,
    collection: &str,
    filter: &Filter,
    patches: &[Patch],
  ) -> StoreResult<Option<Document>>;

  /// Applies `patches` to the first document matching `filter` unless another
  /// document in the collection matches `unless`. Guard and write are one
  /// atomic step; this is how a unique key is kept across updates.
  async fn update_one_unless(
    &self,
    collection: &str,
    filter: &Filter,
    unless: &Filter,
    patches: &[Patch],
  ) -> StoreResult<GuardedUpdate>;

  async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteOutcome>;

  async fn aggregate_sum(&self, collection: &str, expr: &SumExpr, filter: &Filter) -> StoreResult<f64>;
}

/// Serializes a model into a document.
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
  match serde_json::to_value(value)? {
    Value::Object(map) => Ok(map),
    other => Err(StoreError::Malformed {
      collection: String::new(),
      reason: format!("expected an object, got {}", other),
    }),
  }
}

/// Deserializes a document into a model.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
  Ok(serde_json::from_value(Value::Object(doc))?)
}

/// A timestamp in the RFC 3339 form `DateTime<Utc>` serializes to, for use in
/// filters and patches.
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
  Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
