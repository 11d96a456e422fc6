// launchdeck/src/engine/products.rs

//! Product submission and removal.

use crate::errors::Result;
use crate::identifier::ObjectId;
use crate::models::{Product, ProductSubmission};
use crate::state::EngineState;
use tracing::{info, instrument};

#[instrument(name = "engine::submit_product", skip_all, fields(owner = %submission.owner_email), err(level = "warn", Display))]
pub async fn submit(state: &EngineState, submission: ProductSubmission) -> Result<Product> {
  let product = Product::from_submission(submission, state.now())?;
  state.products().insert(&product).await?;
  info!(product_id = %product.id, "Product submitted for review.");
  Ok(product)
}

/// Deletes a product. Reviews pointing at it are left in place.
#[instrument(name = "engine::delete_product", skip_all, fields(product_id = %product_id), err(level = "warn", Display))]
pub async fn delete(state: &EngineState, product_id: &ObjectId) -> Result<()> {
  let products = state.products();
  if !products.delete(product_id).await? {
    return Err(products.not_found(product_id));
  }
  info!("Product deleted.");
  Ok(())
}
