// launchdeck/src/flow/dispatcher.rs

//! A registry of action pipelines keyed by their context type.
//!
//! Each action (vote, report, status change, ...) owns a distinct context
//! struct, so the context type alone identifies which pipeline to run.

use super::context_data::ContextData;
use super::control::FlowOutcome;
use super::error::FlowError;
use super::pipeline::ActionPipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedPipeline<Err>: Send + Sync
where
  Err: std::error::Error + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, Err>;
}

#[async_trait]
impl<TData, Err> ErasedPipeline<Err> for ActionPipeline<TData, Err>
where
  TData: Send + Sync + 'static,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, Err> {
    let ctx_data = ctx.downcast::<ContextData<TData>>().map_err(|_| {
      Err::from(FlowError::ContextMismatch {
        expected_type: std::any::type_name::<ContextData<TData>>(),
      })
    })?;
    self.run(*ctx_data).await
  }
}

/// Type-keyed pipeline registry shared by every action entry point.
pub struct Dispatcher<Err>
where
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipelines: RwLock<HashMap<TypeId, Arc<dyn ErasedPipeline<Err>>>>,
}

impl<Err> Default for Dispatcher<Err>
where
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<Err> Dispatcher<Err>
where
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for context type `TData`, replacing any earlier one.
  pub fn register<TData>(&self, pipeline: ActionPipeline<TData, Err>)
  where
    TData: Send + Sync + 'static,
  {
    event!(
      Level::DEBUG,
      context_type = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    self
      .pipelines
      .write()
      .insert(TypeId::of::<TData>(), Arc::new(pipeline));
  }

  pub fn is_registered<TData: Send + Sync + 'static>(&self) -> bool {
    self.pipelines.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, Err>
  where
    TData: Send + Sync + 'static,
  {
    let pipeline = self
      .pipelines
      .read()
      .get(&TypeId::of::<TData>())
      .cloned()
      .ok_or_else(|| {
        let context_type = std::any::type_name::<TData>();
        event!(Level::ERROR, context_type, "No pipeline registered.");
        Err::from(FlowError::NotRegistered { context_type })
      })?;

    pipeline.run_erased(Box::new(ctx_data)).await
  }
}
