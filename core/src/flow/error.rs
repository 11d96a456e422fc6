// launchdeck/src/flow/error.rs
use thiserror::Error;

/// Failures raised by the pipeline machinery itself, never by domain logic.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Step not found: {step_name}")]
  UnknownStep { step_name: String },

  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No pipeline registered for context type {context_type}")]
  NotRegistered { context_type: &'static str },

  #[error("Context type mismatch (expected {expected_type})")]
  ContextMismatch { expected_type: &'static str },
}
