// launchdeck/src/store/patch.rs

//! Field-level update operators applied by `update_one`.

use super::{Document, ID_FIELD};
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
  Set(String, Value),
  /// Adds to an integer field; a missing field starts at zero.
  Inc(String, i64),
  /// Appends unless already present; a missing field starts empty.
  AddToSet(String, Value),
  /// Appends unconditionally; a missing field starts empty.
  Push(String, Value),
}

impl Patch {
  pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Patch::Set(field.into(), value.into())
  }

  pub fn inc(field: impl Into<String>, by: i64) -> Self {
    Patch::Inc(field.into(), by)
  }

  pub fn add_to_set(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Patch::AddToSet(field.into(), value.into())
  }

  pub fn push(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Patch::Push(field.into(), value.into())
  }

  pub fn field(&self) -> &str {
    match self {
      Patch::Set(f, _) | Patch::Inc(f, _) | Patch::AddToSet(f, _) | Patch::Push(f, _) => f,
    }
  }

  /// Applies the operator in place. On error `doc` may be partially modified,
  /// so callers apply patches to a scratch copy.
  pub fn apply(&self, doc: &mut Document) -> Result<(), String> {
    if self.field() == ID_FIELD {
      return Err("the identifier field is immutable".to_string());
    }

    match self {
      Patch::Set(field, value) => {
        doc.insert(field.clone(), value.clone());
      }
      Patch::Inc(field, by) => {
        let current = match doc.get(field) {
          None | Some(Value::Null) => 0,
          Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| format!("field '{}' is not an integer", field))?,
          Some(other) => return Err(format!("cannot increment non-numeric field '{}' ({})", field, other)),
        };
        let next = current
          .checked_add(*by)
          .ok_or_else(|| format!("increment overflows field '{}'", field))?;
        doc.insert(field.clone(), Value::Number(Number::from(next)));
      }
      Patch::AddToSet(field, value) | Patch::Push(field, value) => {
        let unique = matches!(self, Patch::AddToSet(..));
        let slot = doc.entry(field.clone()).or_insert_with(|| Value::Array(Vec::new()));
        if slot.is_null() {
          *slot = Value::Array(Vec::new());
        }
        let items = slot
          .as_array_mut()
          .ok_or_else(|| format!("field '{}' is not an array", field))?;
        if !(unique && items.contains(value)) {
          items.push(value.clone());
        }
      }
    }
    Ok(())
  }
}
