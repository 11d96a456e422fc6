// launchdeck/src/store/filter.rs

//! Document predicates understood by every `DocumentStore`.

use super::{Document, ID_FIELD};
use crate::identifier::ObjectId;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::cmp::Ordering;

/// A predicate over top-level document fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
  All,
  Id(ObjectId),
  Eq(String, Value),
  /// Missing fields count as "not equal".
  Ne(String, Value),
  /// String equality ignoring ASCII/Unicode case.
  EqIgnoreCase(String, String),
  /// The array field does not contain the value. A missing field is an empty array.
  NotContains(String, Value),
  Gte(String, Value),
  Lte(String, Value),
  And(Vec<Filter>),
}

impl Filter {
  pub fn id(id: ObjectId) -> Self {
    Filter::Id(id)
  }

  pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Filter::Eq(field.into(), value.into())
  }

  pub fn not_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Filter::Ne(field.into(), value.into())
  }

  pub fn equals_ignore_case(field: impl Into<String>, value: impl Into<String>) -> Self {
    Filter::EqIgnoreCase(field.into(), value.into())
  }

  pub fn not_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Filter::NotContains(field.into(), value.into())
  }

  pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Filter::Gte(field.into(), value.into())
  }

  pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Filter::Lte(field.into(), value.into())
  }

  /// Conjunction with `other`, flattening nested `And`s.
  pub fn and(self, other: Filter) -> Self {
    match (self, other) {
      (Filter::All, f) | (f, Filter::All) => f,
      (Filter::And(mut a), Filter::And(b)) => {
        a.extend(b);
        Filter::And(a)
      }
      (Filter::And(mut a), f) => {
        a.push(f);
        Filter::And(a)
      }
      (f, Filter::And(mut b)) => {
        b.insert(0, f);
        Filter::And(b)
      }
      (a, b) => Filter::And(vec![a, b]),
    }
  }

  pub fn matches(&self, doc: &Document) -> bool {
    match self {
      Filter::All => true,
      Filter::Id(id) => doc.get(ID_FIELD).and_then(Value::as_str) == Some(id.to_hex().as_str()),
      Filter::Eq(field, value) => doc.get(field) == Some(value),
      Filter::Ne(field, value) => doc.get(field) != Some(value),
      Filter::EqIgnoreCase(field, value) => doc
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| s.to_lowercase() == value.to_lowercase()),
      Filter::NotContains(field, value) => match doc.get(field) {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => !items.contains(value),
        Some(_) => false,
      },
      Filter::Gte(field, value) => doc
        .get(field)
        .and_then(|found| compare_values(found, value))
        .is_some_and(|ord| ord != Ordering::Less),
      Filter::Lte(field, value) => doc
        .get(field)
        .and_then(|found| compare_values(found, value))
        .is_some_and(|ord| ord != Ordering::Greater),
      Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
    }
  }
}

/// Orders two values of the same kind. Strings that both parse as RFC 3339
/// timestamps compare chronologically; mixed kinds are incomparable.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
  match (left, right) {
    (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
    (Value::String(a), Value::String(b)) => match (parse_timestamp(a), parse_timestamp(b)) {
      (Some(ta), Some(tb)) => Some(ta.cmp(&tb)),
      _ => Some(a.cmp(b)),
    },
    (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
    _ => None,
  }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(raw).ok()
}
