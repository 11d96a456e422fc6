// tests/store_tests.rs
mod common;

use common::*;
use launchdeck::identifier::{self, IdentifierError};
use launchdeck::store::{Document, GuardedUpdate, SumExpr};
use launchdeck::{DocumentStore, EngineError, Filter, MemoryStore, ObjectId, Patch, StoreError};
use serde_json::{json, Value};

fn doc(value: Value) -> Document {
  match value {
    Value::Object(map) => map,
    other => panic!("not an object: {}", other),
  }
}

// --- Identifiers ---

#[test]
fn test_identifier_accepts_24_hex_characters() {
  let id = identifier::validate("64b7f0c2a1b2c3d4e5f60718").unwrap();
  assert_eq!(id.to_hex(), "64b7f0c2a1b2c3d4e5f60718");

  let upper = identifier::validate("64B7F0C2A1B2C3D4E5F60718").unwrap();
  assert_eq!(upper, id);
}

#[test]
fn test_identifier_rejects_malformed_input() {
  for raw in ["", "abc", "64b7f0c2a1b2c3d4e5f6071", "64b7f0c2a1b2c3d4e5f6071g", " 64b7f0c2a1b2c3d4e5f60718"] {
    match identifier::validate(raw) {
      Err(EngineError::InvalidIdentifier(echo)) => assert_eq!(echo, raw),
      other => panic!("{:?} should be rejected, got {:?}", raw, other),
    }
  }
  assert_eq!(ObjectId::parse_str("zz"), Err(IdentifierError::Length(2)));
  assert_eq!(
    ObjectId::parse_str("64b7f0c2a1b2c3d4e5f6071g"),
    Err(IdentifierError::NonHex(23))
  );
}

#[test]
fn test_generated_identifiers_are_unique_and_round_trip() {
  let a = ObjectId::new();
  let b = ObjectId::new();
  assert_ne!(a, b);
  assert_eq!(identifier::validate(&a.to_hex()).unwrap(), a);
  assert_eq!(serde_json::to_value(a).unwrap(), Value::String(a.to_hex()));
}

#[test]
fn test_identifier_debug_shows_hex() {
  let id = identifier::validate("64b7f0c2a1b2c3d4e5f60718").unwrap();
  assert_eq!(format!("{:?}", id), "ObjectId(\"64b7f0c2a1b2c3d4e5f60718\")");
}

// --- Filters ---

#[test]
fn test_filter_semantics() {
  let d = doc(json!({
    "_id": "64b7f0c2a1b2c3d4e5f60718",
    "status": "Pending",
    "role": "Creator",
    "votes": 3,
    "upvotedBy": ["u1", "u2"],
    "expiryDate": "2026-03-02T00:00:00Z",
  }));

  assert!(Filter::id(ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap()).matches(&d));
  assert!(Filter::equals("status", "Pending").matches(&d));
  assert!(!Filter::not_equals("status", "Pending").matches(&d));
  assert!(Filter::not_equals("featured", true).matches(&d));
  assert!(Filter::equals_ignore_case("role", "creator").matches(&d));
  assert!(!Filter::not_contains("upvotedBy", "u1").matches(&d));
  assert!(Filter::not_contains("upvotedBy", "u3").matches(&d));
  assert!(Filter::not_contains("reports", "anything").matches(&d));
  assert!(Filter::gte("votes", 3).matches(&d));
  assert!(!Filter::gte("votes", 4).matches(&d));
  assert!(Filter::lte("votes", 3).matches(&d));
  assert!(Filter::gte("expiryDate", "2026-03-01T23:59:59.999+00:00").matches(&d));
  assert!(!Filter::gte("expiryDate", "2026-03-02T00:00:00.001Z").matches(&d));
  assert!(!Filter::gte("missing", 0).matches(&d));

  let both = Filter::equals("status", "Pending").and(Filter::gte("votes", 1));
  assert!(both.matches(&d));
  assert!(!both.and(Filter::equals("role", "admin")).matches(&d));
}

#[test]
fn test_filter_and_flattens() {
  let f = Filter::All
    .and(Filter::equals("a", 1))
    .and(Filter::equals("b", 2).and(Filter::equals("c", 3)));
  match f {
    Filter::And(parts) => assert_eq!(parts.len(), 3),
    other => panic!("expected a flat conjunction, got {:?}", other),
  }
}

// --- Patches ---

#[test]
fn test_patch_operators() {
  let mut d = doc(json!({ "_id": "64b7f0c2a1b2c3d4e5f60718", "votes": 1, "upvotedBy": ["u1"] }));

  Patch::inc("votes", 1).apply(&mut d).unwrap();
  Patch::add_to_set("upvotedBy", "u1").apply(&mut d).unwrap();
  Patch::add_to_set("upvotedBy", "u2").apply(&mut d).unwrap();
  Patch::push("reports", json!({ "reason": "spam" })).apply(&mut d).unwrap();
  Patch::push("reports", json!({ "reason": "spam" })).apply(&mut d).unwrap();
  Patch::set("reported", true).apply(&mut d).unwrap();

  assert_eq!(d["votes"], json!(2));
  assert_eq!(d["upvotedBy"], json!(["u1", "u2"]));
  assert_eq!(d["reports"].as_array().map(Vec::len), Some(2));
  assert_eq!(d["reported"], json!(true));
}

#[test]
fn test_patch_rejects_bad_targets() {
  let mut d = doc(json!({ "_id": "64b7f0c2a1b2c3d4e5f60718", "name": "x", "votes": i64::MAX }));
  assert!(Patch::set("_id", "other").apply(&mut d).is_err());
  assert!(Patch::inc("name", 1).apply(&mut d).is_err());
  assert!(Patch::inc("votes", 1).apply(&mut d).is_err());
  assert!(Patch::push("name", "y").apply(&mut d).is_err());
}

// --- MemoryStore ---

#[tokio::test]
async fn test_memory_store_crud() {
  setup_tracing();
  let store = MemoryStore::new();

  let id = store.insert("things", doc(json!({ "name": "a", "n": 1 }))).await.unwrap();
  store.insert("things", doc(json!({ "name": "b", "n": 2 }))).await.unwrap();
  assert_eq!(store.len("things"), 2);
  assert!(store.is_empty("other"));

  let found = store.find_by_id("things", &id).await.unwrap().unwrap();
  assert_eq!(found["name"], json!("a"));
  assert_eq!(found["_id"], json!(id.to_hex()));

  assert_eq!(store.count("things", &Filter::gte("n", 2)).await.unwrap(), 1);
  let names: Vec<_> = store
    .find("things", &Filter::All)
    .await
    .unwrap()
    .into_iter()
    .map(|d| d["name"].clone())
    .collect();
  assert_eq!(names, vec![json!("a"), json!("b")]);

  assert!(store.delete_one("things", &Filter::id(id)).await.unwrap().deleted);
  assert!(!store.delete_one("things", &Filter::id(id)).await.unwrap().deleted);
  assert_eq!(store.len("things"), 1);
}

#[tokio::test]
async fn test_memory_store_rejects_duplicate_ids() {
  setup_tracing();
  let store = MemoryStore::new();
  let id = ObjectId::new();
  store
    .insert("things", doc(json!({ "_id": id.to_hex() })))
    .await
    .unwrap();

  let err = store
    .insert("things", doc(json!({ "_id": id.to_hex() })))
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::DuplicateId { .. }));

  let err = store.insert("things", doc(json!({ "_id": "nope" }))).await.unwrap_err();
  assert!(matches!(err, StoreError::Malformed { .. }));
}

#[tokio::test]
async fn test_memory_store_normalizes_uppercase_ids() {
  setup_tracing();
  let store = MemoryStore::new();
  let id = store
    .insert("things", doc(json!({ "_id": "64B7F0C2A1B2C3D4E5F60718", "n": 1 })))
    .await
    .unwrap();
  assert_eq!(id.to_hex(), "64b7f0c2a1b2c3d4e5f60718");

  let found = store.find_by_id("things", &id).await.unwrap().unwrap();
  assert_eq!(found["_id"], json!("64b7f0c2a1b2c3d4e5f60718"));

  let updated = store
    .update_one("things", &Filter::id(id), &[Patch::inc("n", 1)])
    .await
    .unwrap();
  assert!(updated.matched && updated.modified);

  let err = store
    .insert("things", doc(json!({ "_id": "64b7f0c2a1b2c3d4e5f60718" })))
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::DuplicateId { .. }));
  assert!(store.delete_one("things", &Filter::id(id)).await.unwrap().deleted);
}

#[tokio::test]
async fn test_memory_store_insert_if_absent() {
  setup_tracing();
  let store = MemoryStore::new();
  let unique = Filter::equals("code", "SAVE10");

  let first = store
    .insert_if_absent("coupons", &unique, doc(json!({ "code": "SAVE10" })))
    .await
    .unwrap();
  let second = store
    .insert_if_absent("coupons", &unique, doc(json!({ "code": "SAVE10" })))
    .await
    .unwrap();

  assert!(first.is_some());
  assert!(second.is_none());
  assert_eq!(store.len("coupons"), 1);
}

#[tokio::test]
async fn test_memory_store_update_reports_match_and_modification() {
  setup_tracing();
  let store = MemoryStore::new();
  let id = store
    .insert("products", doc(json!({ "status": "Pending" })))
    .await
    .unwrap();

  let changed = store
    .update_one("products", &Filter::id(id), &[Patch::set("status", "Accepted")])
    .await
    .unwrap();
  assert!(changed.matched && changed.modified);

  let same = store
    .update_one("products", &Filter::id(id), &[Patch::set("status", "Accepted")])
    .await
    .unwrap();
  assert!(same.matched && !same.modified);

  let none = store
    .update_one("products", &Filter::id(ObjectId::new()), &[Patch::set("status", "Accepted")])
    .await
    .unwrap();
  assert!(!none.matched);
}

#[tokio::test]
async fn test_memory_store_failed_patch_leaves_document_untouched() {
  setup_tracing();
  let store = MemoryStore::new();
  let id = store
    .insert("products", doc(json!({ "name": "x", "votes": 0 })))
    .await
    .unwrap();

  let err = store
    .update_one(
      "products",
      &Filter::id(id),
      &[Patch::inc("votes", 1), Patch::inc("name", 1)],
    )
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::Malformed { .. }));

  let stored = store.find_by_id("products", &id).await.unwrap().unwrap();
  assert_eq!(stored["votes"], json!(0));
}

#[tokio::test]
async fn test_memory_store_find_one_and_update_returns_post_image() {
  setup_tracing();
  let store = MemoryStore::new();
  let id = store.insert("products", doc(json!({ "votes": 4 }))).await.unwrap();

  let updated = store
    .find_one_and_update("products", &Filter::id(id), &[Patch::inc("votes", 1)])
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated["votes"], json!(5));

  let missing = store
    .find_one_and_update("products", &Filter::id(ObjectId::new()), &[Patch::inc("votes", 1)])
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn test_memory_store_update_unless_guards_unique_field() {
  setup_tracing();
  let store = MemoryStore::new();
  let a = store.insert("coupons", doc(json!({ "code": "A" }))).await.unwrap();
  let b = store.insert("coupons", doc(json!({ "code": "B" }))).await.unwrap();
  let taken = Filter::equals("code", "B");

  let blocked = store
    .update_one_unless("coupons", &Filter::id(a), &taken, &[Patch::set("code", "B")])
    .await
    .unwrap();
  assert_eq!(blocked, GuardedUpdate::Blocked);
  let stored = store.find_by_id("coupons", &a).await.unwrap().unwrap();
  assert_eq!(stored["code"], json!("A"));

  // A document matching its own guard is not a clash.
  let same = store
    .update_one_unless("coupons", &Filter::id(b), &taken, &[Patch::set("code", "B")])
    .await
    .unwrap();
  assert!(matches!(same, GuardedUpdate::Updated(ref d) if d["code"] == json!("B")));

  let renamed = store
    .update_one_unless("coupons", &Filter::id(a), &Filter::equals("code", "C"), &[Patch::set("code", "C")])
    .await
    .unwrap();
  assert!(matches!(renamed, GuardedUpdate::Updated(ref d) if d["code"] == json!("C")));

  let missing = store
    .update_one_unless("coupons", &Filter::id(ObjectId::new()), &taken, &[Patch::set("code", "B")])
    .await
    .unwrap();
  assert_eq!(missing, GuardedUpdate::NoMatch);
}

#[tokio::test]
async fn test_memory_store_aggregate_sum() {
  setup_tracing();
  let store = MemoryStore::new();
  for (votes, voters) in [(2, json!(["a", "b"])), (0, json!([])), (1, json!(["c"]))] {
    store
      .insert("products", doc(json!({ "votes": votes, "upvotedBy": voters })))
      .await
      .unwrap();
  }
  store.insert("products", doc(json!({ "name": "legacy" }))).await.unwrap();

  let sizes = store
    .aggregate_sum("products", &SumExpr::size("upvotedBy"), &Filter::All)
    .await
    .unwrap();
  let votes = store
    .aggregate_sum("products", &SumExpr::field("votes"), &Filter::gte("votes", 1))
    .await
    .unwrap();

  assert_eq!(sizes, 3.0);
  assert_eq!(votes, 3.0);
  assert_eq!(
    store.aggregate_sum("empty", &SumExpr::size("x"), &Filter::All).await.unwrap(),
    0.0
  );
}
