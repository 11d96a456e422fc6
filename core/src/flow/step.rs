// launchdeck/src/flow/step.rs

use super::ContextData;
use std::sync::Arc;

/// Predicate evaluated right before a step; `true` skips the step.
pub type SkipIf<TData> = Arc<dyn Fn(&ContextData<TData>) -> bool + Send + Sync + 'static>;

/// A named slot in a pipeline.
#[derive(Clone)]
pub struct Step<TData: Send + Sync + 'static> {
  pub name: &'static str,
  /// Optional steps may run without any handler attached.
  pub optional: bool,
  pub skip_if: Option<SkipIf<TData>>,
}

impl<TData: Send + Sync + 'static> Step<TData> {
  pub fn required(name: &'static str) -> Self {
    Self {
      name,
      optional: false,
      skip_if: None,
    }
  }
}

impl<TData: Send + Sync + 'static> std::fmt::Debug for Step<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Step")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("has_skip_if", &self.skip_if.is_some())
      .finish()
  }
}
