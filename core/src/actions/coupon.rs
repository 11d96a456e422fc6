// launchdeck/src/actions/coupon.rs

use super::contexts::ValidateCouponCtxData;
use crate::engine::coupons;
use crate::errors::{EngineError, Result};
use crate::flow::{ActionPipeline, ContextData, Dispatcher, FlowError, StepControl};

pub const LOOKUP_COUPON: &str = "lookup_coupon";

pub fn register_validate_coupon_pipeline(dispatcher: &Dispatcher<EngineError>) -> Result<(), FlowError> {
  let mut p = ActionPipeline::<ValidateCouponCtxData, EngineError>::new(&[LOOKUP_COUPON]);

  p.on(LOOKUP_COUPON, |ctx: ContextData<ValidateCouponCtxData>| async move {
    let (state, code) = {
      let guard = ctx.read();
      (guard.state.clone(), guard.code.clone())
    };

    let redemption = coupons::validate(&state, &code).await?;
    ctx.write().redemption = Some(redemption);
    Ok::<_, EngineError>(StepControl::Continue)
  })?;

  dispatcher.register(p);
  Ok(())
}
