// launchdeck/src/engine/mod.rs

//! Domain rules. Each function takes the shared `EngineState` and performs
//! at most one invariant-bearing store mutation.

pub mod coupons;
pub mod moderation;
pub mod products;
pub mod reporting;
pub mod reviews;
pub mod statistics;
pub mod users;
pub mod voting;
