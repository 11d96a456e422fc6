// launchdeck/src/flow/pipeline.rs

//! The `ActionPipeline<TData, Err>` definition and its handler registration API.

use super::context_data::ContextData;
use super::control::StepControl;
use super::error::FlowError;
use super::step::{SkipIf, Step};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A boxed async step handler.
///
/// Handlers take a clone of the run's `ContextData<TData>`, lock it only
/// between awaits, and tell the pipeline whether to continue.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// Handler slots inside a step, run in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  pub(crate) const ORDER: [Phase; 3] = [Phase::Before, Phase::On, Phase::After];

  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

/// An ordered list of named steps, each with before/on/after handlers.
///
/// `Err` is the error type handlers fail with; it must absorb `FlowError` so
/// that wiring mistakes surface through the same channel.
pub struct ActionPipeline<TData, Err>
where
  TData: Send + Sync + 'static,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<Step<TData>>,
  pub(crate) handlers: HashMap<(&'static str, Phase), Vec<Handler<TData, Err>>>,
}

impl<TData, Err> ActionPipeline<TData, Err>
where
  TData: Send + Sync + 'static,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a pipeline whose steps are all required.
  pub fn new(step_names: &[&'static str]) -> Self {
    Self {
      steps: step_names.iter().copied().map(Step::required).collect(),
      handlers: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&'static str> {
    self.steps.iter().map(|s| s.name).collect()
  }

  fn step_mut(&mut self, step_name: &str) -> Result<&mut Step<TData>, FlowError> {
    self
      .steps
      .iter_mut()
      .find(|s| s.name == step_name)
      .ok_or_else(|| FlowError::UnknownStep {
        step_name: step_name.to_string(),
      })
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) -> Result<&mut Self, FlowError> {
    self.step_mut(step_name)?.optional = optional;
    Ok(self)
  }

  pub fn skip_if(&mut self, step_name: &str, condition: SkipIf<TData>) -> Result<&mut Self, FlowError> {
    self.step_mut(step_name)?.skip_if = Some(condition);
    Ok(self)
  }

  /// Attaches `handler_fn` to one phase of `step_name`.
  ///
  /// The handler may fail with any error convertible into the pipeline's `Err`.
  pub fn add_handler<F, HandlerErr>(
    &mut self,
    step_name: &str,
    phase: Phase,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    let name = self.step_mut(step_name)?.name;
    let handler: Handler<TData, Err> = Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.handlers.entry((name, phase)).or_default().push(handler);
    Ok(self)
  }

  pub fn before<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.add_handler(step_name, Phase::Before, handler_fn)
  }

  pub fn on<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.add_handler(step_name, Phase::On, handler_fn)
  }

  pub fn after<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.add_handler(step_name, Phase::After, handler_fn)
  }

  pub(crate) fn has_handlers(&self, step_name: &'static str) -> bool {
    Phase::ORDER
      .iter()
      .any(|phase| self.handlers.get(&(step_name, *phase)).is_some_and(|v| !v.is_empty()))
  }
}
