// launchdeck/src/actions/vote.rs

use super::common_steps::{validate_identifier, validated_id, VALIDATE_IDENTIFIER};
use super::contexts::UpvoteCtxData;
use crate::engine::voting;
use crate::errors::{EngineError, Result};
use crate::flow::{ActionPipeline, ContextData, Dispatcher, FlowError, StepControl};

pub const CAST_VOTE: &str = "cast_vote";

pub fn register_upvote_pipeline(dispatcher: &Dispatcher<EngineError>) -> Result<(), FlowError> {
  let mut p = ActionPipeline::<UpvoteCtxData, EngineError>::new(&[VALIDATE_IDENTIFIER, CAST_VOTE]);

  p.on(VALIDATE_IDENTIFIER, validate_identifier::<UpvoteCtxData>)?;
  p.on(CAST_VOTE, |ctx: ContextData<UpvoteCtxData>| async move {
    let product_id = validated_id(&ctx)?;
    let (state, voter_id) = {
      let guard = ctx.read();
      (guard.state.clone(), guard.voter_id.clone())
    };

    let votes = voting::upvote(&state, &product_id, &voter_id).await?;
    ctx.write().votes = Some(votes);
    Ok::<_, EngineError>(StepControl::Continue)
  })?;

  dispatcher.register(p);
  Ok(())
}
