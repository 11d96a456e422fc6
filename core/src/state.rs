// launchdeck/src/state.rs
use crate::adapters::TypedCollection;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::models::{Coupon, Product, Review, User};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Everything an engine call needs: the store, a clock and configuration.
#[derive(Clone)]
pub struct EngineState {
  pub store: Arc<dyn DocumentStore>,
  pub clock: Arc<dyn Clock>,
  pub config: Arc<EngineConfig>,
}

impl EngineState {
  pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
    Self {
      store,
      clock,
      config: Arc::new(config),
    }
  }

  /// Wall-clock time and default configuration.
  pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
    Self::new(store, Arc::new(SystemClock), EngineConfig::default())
  }

  pub fn now(&self) -> DateTime<Utc> {
    self.clock.now()
  }

  pub fn products(&self) -> TypedCollection<'_, Product> {
    TypedCollection::new(self.store.as_ref(), &self.config.collections.products)
  }

  pub fn users(&self) -> TypedCollection<'_, User> {
    TypedCollection::new(self.store.as_ref(), &self.config.collections.users)
  }

  pub fn reviews(&self) -> TypedCollection<'_, Review> {
    TypedCollection::new(self.store.as_ref(), &self.config.collections.reviews)
  }

  pub fn coupons(&self) -> TypedCollection<'_, Coupon> {
    TypedCollection::new(self.store.as_ref(), &self.config.collections.coupons)
  }
}
