// launchdeck/src/lib.rs

//! Launchdeck: the engagement and moderation core of a product-discovery
//! catalog.
//!
//! It decides how a product's votes, reports, status and featured flag evolve
//! under concurrent requests, when a coupon is still redeemable, and what the
//! admin dashboard counts. It runs after authentication and request parsing,
//! and talks to persistence only through the `DocumentStore` trait.
//!
//!  - Voting is idempotent per voter and race-free: one conditional update.
//!  - Reports are append-only and flip the `reported` flag.
//!  - Status accepts any of Pending/Accepted/Rejected; featuring is one-way.
//!  - Coupon validity is computed against the clock at call time.
//!  - Statistics are read-only, best-effort counts.

pub mod actions;
pub mod adapters;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod flow;
pub mod identifier;
pub mod models;
pub mod state;
pub mod store;

// --- Re-exports for the public API ---

pub use crate::catalog::Catalog;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{CollectionNames, EngineConfig};
pub use crate::engine::moderation::WorkflowChange;
pub use crate::errors::{EngineError, ErrorKind, ErrorResponse, Result};
pub use crate::identifier::ObjectId;
pub use crate::state::EngineState;
pub use crate::store::{DocumentStore, Filter, MemoryStore, Patch, StoreError};
