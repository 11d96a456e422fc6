// launchdeck/src/actions/workflow.rs

//! Status change and featured promotion pipelines.

use super::common_steps::{validate_identifier, validated_id, VALIDATE_IDENTIFIER};
use super::contexts::{PromoteFeaturedCtxData, SetStatusCtxData};
use crate::engine::moderation;
use crate::errors::{EngineError, Result};
use crate::flow::{ActionPipeline, ContextData, Dispatcher, FlowError, StepControl};
use crate::models::ProductStatus;

pub const PARSE_STATUS: &str = "parse_status";
pub const APPLY_STATUS: &str = "apply_status";
pub const PROMOTE: &str = "promote";

pub fn register_set_status_pipeline(dispatcher: &Dispatcher<EngineError>) -> Result<(), FlowError> {
  let mut p = ActionPipeline::<SetStatusCtxData, EngineError>::new(&[VALIDATE_IDENTIFIER, PARSE_STATUS, APPLY_STATUS]);

  p.on(VALIDATE_IDENTIFIER, validate_identifier::<SetStatusCtxData>)?;
  p.on(PARSE_STATUS, |ctx: ContextData<SetStatusCtxData>| async move {
    let status = ProductStatus::parse(&ctx.read().raw_status)?;
    ctx.write().status = Some(status);
    Ok::<_, EngineError>(StepControl::Continue)
  })?;
  p.on(APPLY_STATUS, |ctx: ContextData<SetStatusCtxData>| async move {
    let product_id = validated_id(&ctx)?;
    let (state, status) = {
      let guard = ctx.read();
      (guard.state.clone(), guard.status)
    };
    let status = status.ok_or_else(|| EngineError::Internal(format!("{} step did not run", PARSE_STATUS)))?;

    let change = moderation::set_status(&state, &product_id, status).await?;
    ctx.write().change = Some(change);
    Ok::<_, EngineError>(StepControl::Continue)
  })?;

  dispatcher.register(p);
  Ok(())
}

pub fn register_promote_featured_pipeline(dispatcher: &Dispatcher<EngineError>) -> Result<(), FlowError> {
  let mut p = ActionPipeline::<PromoteFeaturedCtxData, EngineError>::new(&[VALIDATE_IDENTIFIER, PROMOTE]);

  p.on(VALIDATE_IDENTIFIER, validate_identifier::<PromoteFeaturedCtxData>)?;
  p.on(PROMOTE, |ctx: ContextData<PromoteFeaturedCtxData>| async move {
    let product_id = validated_id(&ctx)?;
    let state = ctx.read().state.clone();

    let change = moderation::promote_featured(&state, &product_id).await?;
    ctx.write().change = Some(change);
    Ok::<_, EngineError>(StepControl::Continue)
  })?;

  dispatcher.register(p);
  Ok(())
}
