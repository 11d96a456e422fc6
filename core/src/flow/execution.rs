// launchdeck/src/flow/execution.rs

//! `ActionPipeline::run`: walks the steps in order and drives their handlers.

use super::context_data::ContextData;
use super::control::{FlowOutcome, StepControl};
use super::error::FlowError;
use super::pipeline::{ActionPipeline, Phase};
use tracing::{event, instrument, Instrument, Level};

impl<TData, Err> ActionPipeline<TData, Err>
where
  TData: Send + Sync + 'static,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// Stops at the first handler error (returned as-is) or the first
  /// `StepControl::Halt` (reported as `FlowOutcome::Halted`).
  #[instrument(
    name = "ActionPipeline::run",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>(), num_steps = self.steps.len()),
    err(level = "warn", Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, Err> {
    for (step_index, step) in self.steps.iter().enumerate() {
      let step_span = tracing::info_span!("pipeline_step", step_name = step.name, step_index);

      if let Some(skip_if) = &step.skip_if {
        if skip_if(&ctx_data) {
          event!(parent: &step_span, Level::DEBUG, "Step skipped.");
          continue;
        }
      }

      if !self.has_handlers(step.name) {
        if step.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step.name.to_string(),
        }));
      }

      for phase in Phase::ORDER {
        let Some(handlers) = self.handlers.get(&(step.name, phase)) else {
          continue;
        };
        for handler in handlers {
          let control = handler(ctx_data.clone()).instrument(step_span.clone()).await;
          match control {
            Ok(StepControl::Continue) => {}
            Ok(StepControl::Halt) => {
              event!(parent: &step_span, Level::INFO, phase = phase.as_str(), "Pipeline halted by handler.");
              return Ok(FlowOutcome::Halted);
            }
            Err(e) => {
              event!(parent: &step_span, Level::WARN, phase = phase.as_str(), error = %e, "Handler failed.");
              return Err(e);
            }
          }
        }
      }
    }

    event!(Level::DEBUG, "Pipeline completed.");
    Ok(FlowOutcome::Completed)
  }
}
