// tests/reporting_tests.rs
mod common;

use chrono::Duration;
use common::*;
use launchdeck::{EngineConfig, EngineError, ErrorKind, ObjectId};

#[tokio::test]
async fn test_report_appends_and_flags_product() {
  let h = harness();
  let product = seed_product(&h.catalog, "Spamly").await;
  let id = product.id.to_hex();
  assert!(!product.reported);

  let report = h.catalog.report(&id, "r1", "spam").await.unwrap();
  assert_eq!(report.reporter_id, "r1");
  assert_eq!(report.reason, "spam");
  assert_eq!(report.reported_at, start_time());

  let stored = h.catalog.get_product(&id).await.unwrap();
  assert!(stored.reported);
  assert_eq!(stored.reports, vec![report]);
}

#[tokio::test]
async fn test_repeat_reports_from_same_reporter_are_kept() {
  let h = harness();
  let product = seed_product(&h.catalog, "Spamly").await;
  let id = product.id.to_hex();

  h.catalog.report(&id, "r1", "spam").await.unwrap();
  h.clock.advance(Duration::minutes(5));
  h.catalog.report(&id, "r1", "still spam").await.unwrap();

  let reports = h.catalog.reports_for(&id).await.unwrap();
  assert_eq!(reports.len(), 2);
  assert!(reports.iter().all(|r| r.reporter_id == "r1"));
  assert!(reports[0].reported_at < reports[1].reported_at);
  assert!(h.catalog.get_product(&id).await.unwrap().reported);
}

#[tokio::test]
async fn test_empty_reason_is_accepted() {
  let h = harness();
  let product = seed_product(&h.catalog, "Spamly").await;

  let report = h.catalog.report(&product.id.to_hex(), "r1", "").await.unwrap();

  assert_eq!(report.reason, "");
}

#[tokio::test]
async fn test_report_missing_product_is_not_found() {
  let h = harness();

  let err = h
    .catalog
    .report(&ObjectId::new().to_hex(), "r1", "spam")
    .await
    .unwrap_err();

  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert!(h.store.is_empty("products"));
}

#[tokio::test]
async fn test_report_invalid_identifier() {
  let (catalog, store) = failing_catalog();

  let err = catalog.report("xyz", "r1", "spam").await.unwrap_err();

  assert!(matches!(err, EngineError::InvalidIdentifier(_)));
  assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_reason_length_limit_from_config() {
  let h = harness_with_config(EngineConfig {
    report_reason_max_len: Some(10),
    ..EngineConfig::default()
  });
  let product = seed_product(&h.catalog, "Spamly").await;
  let id = product.id.to_hex();

  let err = h.catalog.report(&id, "r1", "this reason is far too long").await.unwrap_err();
  assert!(matches!(err, EngineError::InvalidField { field: "reason", .. }));
  assert!(!h.catalog.get_product(&id).await.unwrap().reported);

  h.catalog.report(&id, "r1", "ten chars!").await.unwrap();
  assert_eq!(h.catalog.reports_for(&id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reported_products_form_the_moderation_queue() {
  let h = harness();
  let flagged = seed_product(&h.catalog, "Spamly").await;
  seed_product(&h.catalog, "Cleanly").await;

  h.catalog.report(&flagged.id.to_hex(), "r1", "spam").await.unwrap();

  let queue = h.catalog.list_reported().await.unwrap();
  assert_eq!(queue.len(), 1);
  assert_eq!(queue[0].id, flagged.id);
}
