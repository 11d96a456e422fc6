// launchdeck/src/actions/report.rs

use super::common_steps::{validate_identifier, validated_id, VALIDATE_IDENTIFIER};
use super::contexts::ReportCtxData;
use crate::engine::reporting;
use crate::errors::{EngineError, Result};
use crate::flow::{ActionPipeline, ContextData, Dispatcher, FlowError, StepControl};

pub const APPEND_REPORT: &str = "append_report";

pub fn register_report_pipeline(dispatcher: &Dispatcher<EngineError>) -> Result<(), FlowError> {
  let mut p = ActionPipeline::<ReportCtxData, EngineError>::new(&[VALIDATE_IDENTIFIER, APPEND_REPORT]);

  p.on(VALIDATE_IDENTIFIER, validate_identifier::<ReportCtxData>)?;
  p.on(APPEND_REPORT, |ctx: ContextData<ReportCtxData>| async move {
    let product_id = validated_id(&ctx)?;
    let (state, reporter_id, reason) = {
      let guard = ctx.read();
      (guard.state.clone(), guard.reporter_id.clone(), guard.reason.clone())
    };

    let report = reporting::report(&state, &product_id, &reporter_id, &reason).await?;
    ctx.write().report = Some(report);
    Ok::<_, EngineError>(StepControl::Continue)
  })?;

  dispatcher.register(p);
  Ok(())
}
