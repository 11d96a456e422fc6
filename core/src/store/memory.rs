// launchdeck/src/store/memory.rs

//! In-process `DocumentStore`.
//!
//! Each mutating call holds the collection map's write lock for its whole
//! duration, which gives the same per-call atomicity a document database
//! gives a single-document update.

use super::{
  DeleteOutcome, Document, DocumentStore, Filter, GuardedUpdate, Patch, StoreError, StoreResult, SumExpr, UpdateOutcome,
  ID_FIELD,
};
use crate::identifier::ObjectId;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{event, Level};

#[derive(Debug, Default)]
pub struct MemoryStore {
  collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of documents in `collection`, ignoring filters.
  pub fn len(&self, collection: &str) -> usize {
    self.collections.read().get(collection).map_or(0, Vec::len)
  }

  pub fn is_empty(&self, collection: &str) -> bool {
    self.len(collection) == 0
  }

  fn ensure_id(collection: &str, docs: &[Document], doc: &mut Document) -> StoreResult<ObjectId> {
    let id = match doc.get(ID_FIELD) {
      None | Some(Value::Null) => {
        let id = ObjectId::new();
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        id
      }
      Some(Value::String(raw)) => {
        let id = ObjectId::parse_str(raw).map_err(|e| StoreError::Malformed {
          collection: collection.to_string(),
          reason: format!("bad {}: {}", ID_FIELD, e),
        })?;
        // Stored lowercase so `Filter::Id` finds it.
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        id
      }
      Some(other) => {
        return Err(StoreError::Malformed {
          collection: collection.to_string(),
          reason: format!("{} must be a string, got {}", ID_FIELD, other),
        })
      }
    };

    if docs.iter().any(|existing| Filter::Id(id).matches(existing)) {
      return Err(StoreError::DuplicateId {
        collection: collection.to_string(),
        id: id.to_hex(),
      });
    }
    Ok(id)
  }

  /// Finds the first match and applies `patches` to a copy; the copy replaces
  /// the stored document only if every patch succeeded. With `unless`, the
  /// write is refused when any other document matches it.
  fn patch_first(
    &self,
    collection: &str,
    filter: &Filter,
    unless: Option<&Filter>,
    patches: &[Patch],
  ) -> StoreResult<Patched> {
    let mut collections = self.collections.write();
    let Some(docs) = collections.get_mut(collection) else {
      return Ok(Patched::NoMatch);
    };
    let Some(idx) = docs.iter().position(|doc| filter.matches(doc)) else {
      return Ok(Patched::NoMatch);
    };
    if let Some(unless) = unless {
      if docs.iter().enumerate().any(|(i, doc)| i != idx && unless.matches(doc)) {
        return Ok(Patched::Blocked);
      }
    }

    let target = &mut docs[idx];
    let mut updated = target.clone();
    for patch in patches {
      patch.apply(&mut updated).map_err(|reason| StoreError::Malformed {
        collection: collection.to_string(),
        reason,
      })?;
    }

    let modified = updated != *target;
    if modified {
      *target = updated.clone();
    }
    Ok(Patched::Applied { doc: updated, modified })
  }
}

enum Patched {
  Applied { doc: Document, modified: bool },
  Blocked,
  NoMatch,
}

#[async_trait]
impl DocumentStore for MemoryStore {
  async fn find_by_id(&self, collection: &str, id: &ObjectId) -> StoreResult<Option<Document>> {
    let filter = Filter::Id(*id);
    Ok(
      self
        .collections
        .read()
        .get(collection)
        .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)).cloned()),
    )
  }

  async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
    Ok(
      self
        .collections
        .read()
        .get(collection)
        .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
        .unwrap_or_default(),
    )
  }

  async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
    Ok(
      self
        .collections
        .read()
        .get(collection)
        .map_or(0, |docs| docs.iter().filter(|doc| filter.matches(doc)).count() as u64),
    )
  }

  async fn insert(&self, collection: &str, mut doc: Document) -> StoreResult<ObjectId> {
    let mut collections = self.collections.write();
    let docs = collections.entry(collection.to_string()).or_default();
    let id = Self::ensure_id(collection, docs.as_slice(), &mut doc)?;
    docs.push(doc);
    event!(Level::TRACE, collection, id = %id, "Inserted document.");
    Ok(id)
  }

  async fn insert_if_absent(&self, collection: &str, unless: &Filter, mut doc: Document) -> StoreResult<Option<ObjectId>> {
    let mut collections = self.collections.write();
    let docs = collections.entry(collection.to_string()).or_default();
    if docs.iter().any(|existing| unless.matches(existing)) {
      return Ok(None);
    }
    let id = Self::ensure_id(collection, docs.as_slice(), &mut doc)?;
    docs.push(doc);
    event!(Level::TRACE, collection, id = %id, "Inserted document (unique).");
    Ok(Some(id))
  }

  async fn update_one(&self, collection: &str, filter: &Filter, patches: &[Patch]) -> StoreResult<UpdateOutcome> {
    Ok(match self.patch_first(collection, filter, None, patches)? {
      Patched::Applied { modified, .. } => UpdateOutcome { matched: true, modified },
      Patched::Blocked | Patched::NoMatch => UpdateOutcome::default(),
    })
  }

  async fn find_one_and_update(
    &self,
    collection: &str,
    filter: &Filter,
    patches: &[Patch],
  ) -> StoreResult<Option<Document>> {
    Ok(match self.patch_first(collection, filter, None, patches)? {
      Patched::Applied { doc, .. } => Some(doc),
      Patched::Blocked | Patched::NoMatch => None,
    })
  }

  async fn update_one_unless(
    &self,
    collection: &str,
    filter: &Filter,
    unless: &Filter,
    patches: &[Patch],
  ) -> StoreResult<GuardedUpdate> {
    Ok(match self.patch_first(collection, filter, Some(unless), patches)? {
      Patched::Applied { doc, .. } => GuardedUpdate::Updated(doc),
      Patched::Blocked => {
        event!(Level::TRACE, collection, "Guarded update blocked.");
        GuardedUpdate::Blocked
      }
      Patched::NoMatch => GuardedUpdate::NoMatch,
    })
  }

  async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteOutcome> {
    let mut collections = self.collections.write();
    let Some(docs) = collections.get_mut(collection) else {
      return Ok(DeleteOutcome::default());
    };
    match docs.iter().position(|doc| filter.matches(doc)) {
      Some(idx) => {
        docs.remove(idx);
        Ok(DeleteOutcome { deleted: true })
      }
      None => Ok(DeleteOutcome::default()),
    }
  }

  async fn aggregate_sum(&self, collection: &str, expr: &SumExpr, filter: &Filter) -> StoreResult<f64> {
    Ok(
      self
        .collections
        .read()
        .get(collection)
        .map_or(0.0, |docs| docs.iter().filter(|doc| filter.matches(doc)).map(|doc| expr.evaluate(doc)).sum()),
    )
  }
}
