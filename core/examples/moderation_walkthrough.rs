// launchdeck/examples/moderation_walkthrough.rs

use launchdeck::models::{CouponDraft, ProductSubmission};
use launchdeck::{Catalog, EngineError, ErrorKind};
use serde_json::json;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Launchdeck Moderation Walkthrough ---");

  // 1. An in-memory catalog with the wall clock.
  let catalog = Catalog::in_memory()?;

  // 2. A maker submits a product; it starts out pending.
  let product = catalog
    .submit_product(ProductSubmission {
      owner_email: "maker@example.com".to_string(),
      name: "Lintly".to_string(),
      description: "A linter that explains itself.".to_string(),
      tags: vec!["devtools".to_string()],
      ..ProductSubmission::default()
    })
    .await?;
  let id = product.id.to_hex();
  info!(product_id = %id, status = %product.status, "Product submitted.");

  // 3. Votes: the second vote from the same voter is refused.
  info!("\n--- Voting ---");
  for voter in ["alice", "bob", "alice"] {
    match catalog.upvote(&id, voter).await {
      Ok(votes) => info!(voter, votes, "Vote counted."),
      Err(e) if e.kind() == ErrorKind::AlreadyVoted => info!(voter, "Duplicate vote refused: {}", e),
      Err(e) => return Err(e.into()),
    }
  }

  // 4. A report lands it in the moderation queue.
  info!("\n--- Reporting ---");
  catalog.report(&id, "carol", "Broken download link").await?;
  let queue = catalog.list_reported().await?;
  info!(queued = queue.len(), "Moderation queue size.");

  // 5. A moderator accepts and features it. Repeating is a no-op.
  info!("\n--- Moderation ---");
  let accepted = catalog.set_status(&id, "Accepted").await?;
  let featured = catalog.promote_featured(&id).await?;
  let again = catalog.promote_featured(&id).await?;
  info!(accepted = accepted.modified, featured = featured.modified, repeat = again.modified, "Workflow applied.");

  match catalog.set_status(&id, "Archived").await {
    Err(EngineError::InvalidStatus(s)) => info!("Unknown status '{}' refused.", s),
    other => error!("Unexpected result: {:?}", other),
  }

  // 6. Coupons are checked against the clock when redeemed.
  info!("\n--- Coupons ---");
  catalog
    .create_coupon(&CouponDraft {
      code: Some("LAUNCH20".to_string()),
      expiry_date: Some("2099-12-31".to_string()),
      description: Some("Launch week".to_string()),
      discount_amount: Some(json!("20")),
    })
    .await?;
  let redemption = catalog.validate_coupon("LAUNCH20").await?;
  info!(discount = %redemption.discount_amount, "Coupon redeemed.");

  if let Err(e) = catalog.validate_coupon("EXPIRED").await {
    let response = e.to_response();
    info!(status = response.status, code = response.error, "Unknown coupon: {}", response.message);
  }

  // 7. Dashboard figures.
  info!("\n--- Statistics ---");
  let stats = catalog.statistics().await?;
  info!("{}", serde_json::to_string_pretty(&stats)?);

  Ok(())
}
