// launchdeck/src/errors.rs

use crate::flow::FlowError;
use crate::store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("Invalid identifier: '{0}'")]
  InvalidIdentifier(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Voter '{voter}' has already upvoted product {product_id}")]
  AlreadyVoted { product_id: String, voter: String },

  #[error("Missing required fields: {}", .0.join(", "))]
  MissingFields(Vec<&'static str>),

  #[error("Invalid value for '{field}': {reason}")]
  InvalidField { field: &'static str, reason: String },

  #[error("Invalid status: '{0}'")]
  InvalidStatus(String),

  #[error("Invalid role: '{0}'")]
  InvalidRole(String),

  #[error("Coupon '{0}' is invalid or expired")]
  InvalidOrExpiredCoupon(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Store Error: {0}")]
  Store(#[from] StoreError),

  #[error("Pipeline Error: {source}")]
  Flow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Error: {0}")]
  Internal(String),
}

/// Caller-visible classification of an `EngineError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  InvalidIdentifier,
  NotFound,
  AlreadyVoted,
  MissingFields,
  InvalidInput,
  InvalidOrExpiredCoupon,
  Conflict,
  InternalStoreError,
  Internal,
}

impl ErrorKind {
  /// Stable machine-readable code.
  pub fn code(&self) -> &'static str {
    match self {
      ErrorKind::InvalidIdentifier => "INVALID_IDENTIFIER",
      ErrorKind::NotFound => "NOT_FOUND",
      ErrorKind::AlreadyVoted => "ALREADY_VOTED",
      ErrorKind::MissingFields => "MISSING_FIELDS",
      ErrorKind::InvalidInput => "INVALID_INPUT",
      ErrorKind::InvalidOrExpiredCoupon => "INVALID_OR_EXPIRED_COUPON",
      ErrorKind::Conflict => "CONFLICT",
      ErrorKind::InternalStoreError => "INTERNAL_STORE_ERROR",
      ErrorKind::Internal => "INTERNAL_ERROR",
    }
  }

  /// HTTP status a transport layer should answer with.
  pub fn http_status(&self) -> u16 {
    match self {
      ErrorKind::InvalidIdentifier => 400,
      ErrorKind::NotFound => 404,
      ErrorKind::AlreadyVoted => 409,
      ErrorKind::MissingFields => 422,
      ErrorKind::InvalidInput => 400,
      ErrorKind::InvalidOrExpiredCoupon => 410,
      ErrorKind::Conflict => 409,
      ErrorKind::InternalStoreError => 503,
      ErrorKind::Internal => 500,
    }
  }
}

/// Body a transport layer can serialize for a failed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
  pub status: u16,
  pub error: &'static str,
  pub message: String,
}

impl EngineError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      EngineError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
      EngineError::NotFound(_) => ErrorKind::NotFound,
      EngineError::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
      EngineError::MissingFields(_) => ErrorKind::MissingFields,
      EngineError::InvalidField { .. } | EngineError::InvalidStatus(_) | EngineError::InvalidRole(_) => {
        ErrorKind::InvalidInput
      }
      EngineError::InvalidOrExpiredCoupon(_) => ErrorKind::InvalidOrExpiredCoupon,
      EngineError::Conflict(_) => ErrorKind::Conflict,
      EngineError::Store(_) => ErrorKind::InternalStoreError,
      EngineError::Config(_) | EngineError::Flow { .. } | EngineError::Internal(_) => ErrorKind::Internal,
    }
  }

  pub fn is_internal(&self) -> bool {
    matches!(self.kind(), ErrorKind::InternalStoreError | ErrorKind::Internal)
  }

  /// Converts the error into a caller-facing response.
  ///
  /// Internal failures are logged in full here and replaced by a generic message.
  pub fn to_response(&self) -> ErrorResponse {
    let kind = self.kind();
    let message = match kind {
      ErrorKind::InternalStoreError => {
        tracing::error!(engine_error = %self, "Store operation failed.");
        "The data store is unavailable. Please retry later.".to_string()
      }
      ErrorKind::Internal => {
        tracing::error!(engine_error = %self, "Internal engine failure.");
        "An internal error occurred.".to_string()
      }
      _ => {
        tracing::debug!(engine_error = %self, "Responding with error.");
        self.to_string()
      }
    };
    ErrorResponse {
      status: kind.http_status(),
      error: kind.code(),
      message,
    }
  }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
