// launchdeck/src/catalog.rs

//! `Catalog`: the entry point a transport layer calls once a request is
//! authenticated and parsed.
//!
//! Mutating engagement and moderation actions run through their registered
//! pipelines; plain reads and admin CRUD call the engines directly.

use crate::actions::contexts::{
  PromoteFeaturedCtxData, ReportCtxData, SetStatusCtxData, UpvoteCtxData, ValidateCouponCtxData,
};
use crate::actions::register_all_pipelines;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::engine::moderation::WorkflowChange;
use crate::engine::{coupons, products, reporting, reviews, statistics, users, voting};
use crate::errors::{EngineError, Result};
use crate::flow::{ContextData, Dispatcher, FlowOutcome};
use crate::identifier;
use crate::models::{
  Coupon, CouponDraft, CouponRedemption, NewReview, NewUser, Product, ProductEdit, ProductQuery, ProductSubmission,
  Report, Review, Role, Statistics, UserProfile,
};
use crate::state::EngineState;
use crate::store::{DocumentStore, MemoryStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct Catalog {
  state: EngineState,
  dispatcher: Arc<Dispatcher<EngineError>>,
}

impl Catalog {
  pub fn new(state: EngineState) -> Result<Self> {
    let dispatcher = Arc::new(Dispatcher::new());
    register_all_pipelines(&dispatcher)?;
    info!(
      products = %state.config.collections.products,
      "Catalog ready."
    );
    Ok(Self { state, dispatcher })
  }

  pub fn with_parts(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, config: EngineConfig) -> Result<Self> {
    Self::new(EngineState::new(store, clock, config))
  }

  /// A catalog over a fresh `MemoryStore` with the wall clock and default config.
  pub fn in_memory() -> Result<Self> {
    Self::new(EngineState::with_store(Arc::new(MemoryStore::new())))
  }

  pub fn state(&self) -> &EngineState {
    &self.state
  }

  /// Runs the pipeline registered for `T` and hands back the final context.
  async fn run_action<T>(&self, ctx: T) -> Result<T>
  where
    T: Clone + Send + Sync + 'static,
  {
    let ctx_data = ContextData::new(ctx);
    match self.dispatcher.run(ctx_data.clone()).await? {
      FlowOutcome::Completed => Ok(ctx_data.snapshot()),
      FlowOutcome::Halted => {
        warn!(action = %std::any::type_name::<T>(), "Action pipeline halted.");
        Err(EngineError::Internal(format!(
          "{} was halted before completing",
          std::any::type_name::<T>()
        )))
      }
    }
  }

  fn missing_result(step: &str) -> EngineError {
    EngineError::Internal(format!("pipeline completed without a result from '{}'", step))
  }

  // --- Engagement & moderation actions ---

  /// Upvotes a product once per voter; returns the new vote count.
  #[instrument(name = "catalog::upvote", skip(self), err(level = "warn", Display))]
  pub async fn upvote(&self, product_id: &str, voter_id: &str) -> Result<u64> {
    let ctx = self
      .run_action(UpvoteCtxData::new(self.state.clone(), product_id, voter_id))
      .await?;
    ctx.votes.ok_or_else(|| Self::missing_result(crate::actions::vote::CAST_VOTE))
  }

  #[instrument(name = "catalog::report", skip(self, reason), err(level = "warn", Display))]
  pub async fn report(&self, product_id: &str, reporter_id: &str, reason: &str) -> Result<Report> {
    let ctx = self
      .run_action(ReportCtxData::new(self.state.clone(), product_id, reporter_id, reason))
      .await?;
    ctx.report.ok_or_else(|| Self::missing_result(crate::actions::report::APPEND_REPORT))
  }

  #[instrument(name = "catalog::set_status", skip(self), err(level = "warn", Display))]
  pub async fn set_status(&self, product_id: &str, status: &str) -> Result<WorkflowChange> {
    let ctx = self
      .run_action(SetStatusCtxData::new(self.state.clone(), product_id, status))
      .await?;
    ctx.change.ok_or_else(|| Self::missing_result(crate::actions::workflow::APPLY_STATUS))
  }

  #[instrument(name = "catalog::promote_featured", skip(self), err(level = "warn", Display))]
  pub async fn promote_featured(&self, product_id: &str) -> Result<WorkflowChange> {
    let ctx = self
      .run_action(PromoteFeaturedCtxData::new(self.state.clone(), product_id))
      .await?;
    ctx.change.ok_or_else(|| Self::missing_result(crate::actions::workflow::PROMOTE))
  }

  /// Checks a coupon code against the clock; returns the discount to apply.
  #[instrument(name = "catalog::validate_coupon", skip(self), err(level = "warn", Display))]
  pub async fn validate_coupon(&self, code: &str) -> Result<CouponRedemption> {
    let ctx = self
      .run_action(ValidateCouponCtxData::new(self.state.clone(), code))
      .await?;
    ctx.redemption.ok_or_else(|| Self::missing_result(crate::actions::coupon::LOOKUP_COUPON))
  }

  // --- Products ---

  pub async fn submit_product(&self, submission: ProductSubmission) -> Result<Product> {
    products::submit(&self.state, submission).await
  }

  pub async fn get_product(&self, product_id: &str) -> Result<Product> {
    let id = identifier::validate(product_id)?;
    self.state.products().require(&id).await
  }

  pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    self.state.products().list(query).await
  }

  /// Moderation queue: every product with at least one report.
  pub async fn list_reported(&self) -> Result<Vec<Product>> {
    self
      .list_products(&ProductQuery {
        reported: Some(true),
        ..ProductQuery::default()
      })
      .await
  }

  pub async fn list_trending(&self, limit: Option<usize>) -> Result<Vec<Product>> {
    self.state.products().trending(limit).await
  }

  pub async fn update_product(&self, product_id: &str, edit: ProductEdit) -> Result<Product> {
    let id = identifier::validate(product_id)?;
    self.state.products().apply_edit(&id, edit, self.state.now()).await
  }

  pub async fn delete_product(&self, product_id: &str) -> Result<()> {
    let id = identifier::validate(product_id)?;
    products::delete(&self.state, &id).await
  }

  pub async fn has_voted(&self, product_id: &str, voter_id: &str) -> Result<bool> {
    let id = identifier::validate(product_id)?;
    voting::has_voted(&self.state, &id, voter_id).await
  }

  pub async fn reports_for(&self, product_id: &str) -> Result<Vec<Report>> {
    let id = identifier::validate(product_id)?;
    reporting::reports_for(&self.state, &id).await
  }

  // --- Reviews ---

  pub async fn add_review(&self, product_id: &str, review: NewReview) -> Result<Review> {
    let id = identifier::validate(product_id)?;
    reviews::add(&self.state, &id, review).await
  }

  pub async fn list_reviews(&self, product_id: &str) -> Result<Vec<Review>> {
    let id = identifier::validate(product_id)?;
    reviews::list_for_product(&self.state, &id).await
  }

  // --- Users ---

  pub async fn register_user(&self, new_user: NewUser) -> Result<UserProfile> {
    users::register(&self.state, new_user).await
  }

  pub async fn get_user_by_email(&self, email: &str) -> Result<UserProfile> {
    users::get_by_email(&self.state, email).await
  }

  pub async fn list_users(&self) -> Result<Vec<UserProfile>> {
    users::list(&self.state).await
  }

  pub async fn set_role(&self, user_id: &str, role: &str) -> Result<UserProfile> {
    let id = identifier::validate(user_id)?;
    let role = Role::parse(role)?;
    users::set_role(&self.state, &id, role).await
  }

  pub async fn verify_subscription(&self, email: &str) -> Result<UserProfile> {
    users::verify_subscription(&self.state, email).await
  }

  // --- Coupons ---

  pub async fn list_coupons(&self) -> Result<Vec<Coupon>> {
    coupons::list(&self.state).await
  }

  pub async fn list_valid_coupons(&self) -> Result<Vec<Coupon>> {
    coupons::list_valid(&self.state).await
  }

  pub async fn get_coupon(&self, coupon_id: &str) -> Result<Coupon> {
    let id = identifier::validate(coupon_id)?;
    coupons::get(&self.state, &id).await
  }

  pub async fn create_coupon(&self, draft: &CouponDraft) -> Result<Coupon> {
    coupons::create(&self.state, draft).await
  }

  pub async fn update_coupon(&self, coupon_id: &str, draft: &CouponDraft) -> Result<Coupon> {
    let id = identifier::validate(coupon_id)?;
    coupons::update(&self.state, &id, draft).await
  }

  pub async fn delete_coupon(&self, coupon_id: &str) -> Result<()> {
    let id = identifier::validate(coupon_id)?;
    coupons::delete(&self.state, &id).await
  }

  // --- Admin ---

  pub async fn statistics(&self) -> Result<Statistics> {
    statistics::compute_statistics(&self.state).await
  }
}
