// launchdeck/src/flow/mod.rs

//! Named-step async pipelines and the registry that dispatches them.
//!
//! Every inbound action is modelled as a small pipeline over its own context
//! struct: the first step validates input, later steps talk to the store.

pub mod context_data;
pub mod control;
pub mod dispatcher;
pub mod error;
mod execution;
pub mod pipeline;
pub mod step;

pub use context_data::ContextData;
pub use control::{FlowOutcome, StepControl};
pub use dispatcher::Dispatcher;
pub use error::FlowError;
pub use pipeline::{ActionPipeline, Handler, Phase};
pub use step::{SkipIf, Step};
