// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use launchdeck::store::{DeleteOutcome, Document, GuardedUpdate, StoreResult, SumExpr, UpdateOutcome};
use launchdeck::{
  Catalog, DocumentStore, EngineConfig, Filter, ManualClock, MemoryStore, ObjectId, Patch, StoreError,
};
use launchdeck::models::{Product, ProductSubmission};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;

// --- Tracing (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn start_time() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// A catalog over an in-memory store and a manual clock, with handles to both.
pub struct Harness {
  pub catalog: Catalog,
  pub store: Arc<MemoryStore>,
  pub clock: Arc<ManualClock>,
}

pub fn harness() -> Harness {
  harness_with_config(EngineConfig::default())
}

pub fn harness_with_config(config: EngineConfig) -> Harness {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let clock = Arc::new(ManualClock::new(start_time()));
  let catalog = Catalog::with_parts(store.clone(), clock.clone(), config).unwrap();
  Harness { catalog, store, clock }
}

pub fn submission(owner_email: &str, name: &str) -> ProductSubmission {
  ProductSubmission {
    owner_email: owner_email.to_string(),
    owner_name: Some("Test Owner".to_string()),
    name: name.to_string(),
    description: format!("{} does useful things", name),
    tags: vec!["tools".to_string(), "ai".to_string()],
    external_links: vec![format!("https://example.com/{}", name.to_lowercase())],
  }
}

pub async fn seed_product(catalog: &Catalog, name: &str) -> Product {
  catalog.submit_product(submission("maker@example.com", name)).await.unwrap()
}

// --- A store whose backend is always down ---

/// Counts calls so tests can assert the store was never reached.
#[derive(Debug, Default)]
pub struct FailingStore {
  pub calls: AtomicUsize,
}

impl FailingStore {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  fn fail<T>(&self) -> StoreResult<T> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Err(StoreError::Backend(anyhow::anyhow!("connection refused (10.0.0.7:27017)")))
  }
}

#[async_trait]
impl DocumentStore for FailingStore {
  async fn find_by_id(&self, _: &str, _: &ObjectId) -> StoreResult<Option<Document>> {
    self.fail()
  }
  async fn find(&self, _: &str, _: &Filter) -> StoreResult<Vec<Document>> {
    self.fail()
  }
  async fn count(&self, _: &str, _: &Filter) -> StoreResult<u64> {
    self.fail()
  }
  async fn insert(&self, _: &str, _: Document) -> StoreResult<ObjectId> {
    self.fail()
  }
  async fn insert_if_absent(&self, _: &str, _: &Filter, _: Document) -> StoreResult<Option<ObjectId>> {
    self.fail()
  }
  async fn update_one(&self, _: &str, _: &Filter, _: &[Patch]) -> StoreResult<UpdateOutcome> {
    self.fail()
  }
  async fn find_one_and_update(&self, _: &str, _: &Filter, _: &[Patch]) -> StoreResult<Option<Document>> {
    self.fail()
  }
  async fn update_one_unless(&self, _: &str, _: &Filter, _: &Filter, _: &[Patch]) -> StoreResult<GuardedUpdate> {
    self.fail()
  }
  async fn delete_one(&self, _: &str, _: &Filter) -> StoreResult<DeleteOutcome> {
    self.fail()
  }
  async fn aggregate_sum(&self, _: &str, _: &SumExpr, _: &Filter) -> StoreResult<f64> {
    self.fail()
  }
}

pub fn failing_catalog() -> (Catalog, Arc<FailingStore>) {
  setup_tracing();
  let store = Arc::new(FailingStore::default());
  let catalog = Catalog::with_parts(store.clone(), Arc::new(ManualClock::new(start_time())), EngineConfig::default())
    .unwrap();
  (catalog, store)
}

// --- A store that suspends before every call ---

/// Wraps `MemoryStore` and yields to the scheduler before each call, the way a
/// networked backend would, so racing tasks interleave between store calls.
#[derive(Debug, Default)]
pub struct YieldingStore {
  pub inner: Arc<MemoryStore>,
}

#[async_trait]
impl DocumentStore for YieldingStore {
  async fn find_by_id(&self, collection: &str, id: &ObjectId) -> StoreResult<Option<Document>> {
    tokio::task::yield_now().await;
    self.inner.find_by_id(collection, id).await
  }
  async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
    tokio::task::yield_now().await;
    self.inner.find(collection, filter).await
  }
  async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
    tokio::task::yield_now().await;
    self.inner.count(collection, filter).await
  }
  async fn insert(&self, collection: &str, doc: Document) -> StoreResult<ObjectId> {
    tokio::task::yield_now().await;
    self.inner.insert(collection, doc).await
  }
  async fn insert_if_absent(&self, collection: &str, unless: &Filter, doc: Document) -> StoreResult<Option<ObjectId>> {
    tokio::task::yield_now().await;
    self.inner.insert_if_absent(collection, unless, doc).await
  }
  async fn update_one(&self, collection: &str, filter: &Filter, patches: &[Patch]) -> StoreResult<UpdateOutcome> {
    tokio::task::yield_now().await;
    self.inner.update_one(collection, filter, patches).await
  }
  async fn find_one_and_update(
    &self,
    collection: &str,
    filter: &Filter,
    patches: &[Patch],
  ) -> StoreResult<Option<Document>> {
    tokio::task::yield_now().await;
    self.inner.find_one_and_update(collection, filter, patches).await
  }
  async fn update_one_unless(
    &self,
    collection: &str,
    filter: &Filter,
    unless: &Filter,
    patches: &[Patch],
  ) -> StoreResult<GuardedUpdate> {
    tokio::task::yield_now().await;
    self.inner.update_one_unless(collection, filter, unless, patches).await
  }
  async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteOutcome> {
    tokio::task::yield_now().await;
    self.inner.delete_one(collection, filter).await
  }
  async fn aggregate_sum(&self, collection: &str, expr: &SumExpr, filter: &Filter) -> StoreResult<f64> {
    tokio::task::yield_now().await;
    self.inner.aggregate_sum(collection, expr, filter).await
  }
}

/// Like `harness`, but every store call suspends first. `store` is the
/// underlying `MemoryStore` for direct inspection.
pub fn yielding_harness() -> Harness {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let clock = Arc::new(ManualClock::new(start_time()));
  let yielding = Arc::new(YieldingStore { inner: store.clone() });
  let catalog = Catalog::with_parts(yielding, clock.clone(), EngineConfig::default()).unwrap();
  Harness { catalog, store, clock }
}

// --- Pipeline-level fixtures ---

#[derive(Clone, Debug, Default)]
pub struct FlowTestContext {
  pub counter: i32,
  pub trail: Vec<String>,
  pub halt_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<launchdeck::flow::FlowError> for TestError {
  fn from(fe: launchdeck::flow::FlowError) -> Self {
    TestError::Flow(fe.to_string())
  }
}
