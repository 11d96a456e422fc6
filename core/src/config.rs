// launchdeck/src/config.rs

use crate::errors::{EngineError, Result};
use dotenvy::dotenv;
use std::env;

/// Collection names in the backing document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
  pub products: String,
  pub users: String,
  pub reviews: String,
  pub coupons: String,
}

impl Default for CollectionNames {
  fn default() -> Self {
    Self {
      products: "products".to_string(),
      users: "users".to_string(),
      reviews: "reviews".to_string(),
      coupons: "coupons".to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
  pub collections: CollectionNames,
  /// Upper bound on report reason length in characters. `None` accepts any reason.
  pub report_reason_max_len: Option<usize>,
}

impl EngineConfig {
  /// Loads configuration from the process environment, reading `.env` first if present.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());
    let defaults = CollectionNames::default();

    let collections = CollectionNames {
      products: get_env("PRODUCTS_COLLECTION").unwrap_or(defaults.products),
      users: get_env("USERS_COLLECTION").unwrap_or(defaults.users),
      reviews: get_env("REVIEWS_COLLECTION").unwrap_or(defaults.reviews),
      coupons: get_env("COUPONS_COLLECTION").unwrap_or(defaults.coupons),
    };

    let report_reason_max_len = get_env("REPORT_REASON_MAX_LEN")
      .map(|raw| {
        raw
          .trim()
          .parse::<usize>()
          .map_err(|e| EngineError::Config(format!("Invalid REPORT_REASON_MAX_LEN '{}': {}", raw, e)))
      })
      .transpose()?;

    tracing::info!(
      products = %collections.products,
      users = %collections.users,
      reviews = %collections.reviews,
      coupons = %collections.coupons,
      ?report_reason_max_len,
      "Engine configuration loaded."
    );

    Ok(Self {
      collections,
      report_reason_max_len,
    })
  }
}
