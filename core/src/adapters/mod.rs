// launchdeck/src/adapters/mod.rs

//! Typed views over store collections.
//!
//! `TypedCollection<T>` turns documents into models and store failures into
//! `EngineError::Store`. Domain rules live in `engine`, not here.

pub mod products;

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use crate::models::{Coupon, Product, Review, User};
use crate::store::{self, DocumentStore, Filter, GuardedUpdate, Patch, UpdateOutcome};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// A model stored in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
  /// Human-readable name used in error messages.
  const LABEL: &'static str;

  fn id(&self) -> ObjectId;
}

impl Entity for Product {
  const LABEL: &'static str = "Product";
  fn id(&self) -> ObjectId {
    self.id
  }
}

impl Entity for User {
  const LABEL: &'static str = "User";
  fn id(&self) -> ObjectId {
    self.id
  }
}

impl Entity for Coupon {
  const LABEL: &'static str = "Coupon";
  fn id(&self) -> ObjectId {
    self.id
  }
}

impl Entity for Review {
  const LABEL: &'static str = "Review";
  fn id(&self) -> ObjectId {
    self.id
  }
}

pub struct TypedCollection<'a, T: Entity> {
  store: &'a dyn DocumentStore,
  name: &'a str,
  _entity: PhantomData<T>,
}

impl<'a, T: Entity> TypedCollection<'a, T> {
  pub fn new(store: &'a dyn DocumentStore, name: &'a str) -> Self {
    Self {
      store,
      name,
      _entity: PhantomData,
    }
  }

  pub fn name(&self) -> &str {
    self.name
  }

  pub fn not_found(&self, id: &ObjectId) -> EngineError {
    EngineError::NotFound(format!("{} with ID {} not found.", T::LABEL, id))
  }

  pub async fn get(&self, id: &ObjectId) -> Result<Option<T>> {
    match self.store.find_by_id(self.name, id).await? {
      Some(doc) => Ok(Some(store::from_document(doc)?)),
      None => Ok(None),
    }
  }

  /// Like `get`, but absence is `NotFound`.
  pub async fn require(&self, id: &ObjectId) -> Result<T> {
    self.get(id).await?.ok_or_else(|| self.not_found(id))
  }

  pub async fn exists(&self, id: &ObjectId) -> Result<bool> {
    Ok(self.store.count(self.name, &Filter::Id(*id)).await? > 0)
  }

  pub async fn find(&self, filter: &Filter) -> Result<Vec<T>> {
    self
      .store
      .find(self.name, filter)
      .await?
      .into_iter()
      .map(|doc| store::from_document(doc).map_err(EngineError::from))
      .collect()
  }

  pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>> {
    Ok(self.find(filter).await?.into_iter().next())
  }

  pub async fn count(&self, filter: &Filter) -> Result<u64> {
    Ok(self.store.count(self.name, filter).await?)
  }

  pub async fn insert(&self, entity: &T) -> Result<ObjectId> {
    Ok(self.store.insert(self.name, store::to_document(entity)?).await?)
  }

  /// Inserts unless a document matches `unless`; `Ok(None)` on a clash.
  pub async fn insert_unless(&self, unless: &Filter, entity: &T) -> Result<Option<ObjectId>> {
    Ok(
      self
        .store
        .insert_if_absent(self.name, unless, store::to_document(entity)?)
        .await?,
    )
  }

  pub async fn update(&self, filter: &Filter, patches: &[Patch]) -> Result<UpdateOutcome> {
    Ok(self.store.update_one(self.name, filter, patches).await?)
  }

  /// Atomic update returning the post-update entity.
  pub async fn update_returning(&self, filter: &Filter, patches: &[Patch]) -> Result<Option<T>> {
    match self.store.find_one_and_update(self.name, filter, patches).await? {
      Some(doc) => Ok(Some(store::from_document(doc)?)),
      None => Ok(None),
    }
  }

  /// Atomic update refused when another document matches `unless`.
  pub async fn update_returning_unless(
    &self,
    filter: &Filter,
    unless: &Filter,
    patches: &[Patch],
  ) -> Result<GuardedUpdate<T>> {
    self
      .store
      .update_one_unless(self.name, filter, unless, patches)
      .await?
      .try_map(|doc| store::from_document(doc).map_err(EngineError::from))
  }

  pub async fn delete(&self, id: &ObjectId) -> Result<bool> {
    Ok(self.store.delete_one(self.name, &Filter::Id(*id)).await?.deleted)
  }
}
