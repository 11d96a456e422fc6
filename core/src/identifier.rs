// launchdeck/src/identifier.rs

//! Store-native document identifiers and the validator every action runs
//! before touching the store.

use crate::errors::{EngineError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

/// Length of the hex form of an identifier.
pub const HEX_LEN: usize = 24;

/// Five random bytes fixed for the lifetime of the process.
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| {
  let random = uuid::Uuid::new_v4();
  let mut bytes = [0u8; 5];
  bytes.copy_from_slice(&random.as_bytes()[..5]);
  bytes
});

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| {
  let random = uuid::Uuid::new_v4();
  let b = random.as_bytes();
  AtomicU32::new(u32::from_be_bytes([0, b[5], b[6], b[7]]))
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
  #[error("expected 24 hex characters, got {0}")]
  Length(usize),
  #[error("non-hex character at position {0}")]
  NonHex(usize),
}

/// A 12-byte document identifier, rendered as 24 lowercase hex characters.
///
/// Layout follows the usual object-id scheme: 4 bytes of big-endian unix
/// seconds, 5 process-unique bytes, 3 bytes of a wrapping counter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId([u8; 12]);

impl ObjectId {
  /// Generates a fresh identifier.
  pub fn new() -> Self {
    let seconds = chrono::Utc::now().timestamp() as u32;
    let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&seconds.to_be_bytes());
    bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
    bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
    ObjectId(bytes)
  }

  /// Parses the 24-character hex form. Upper-case hex digits are accepted.
  pub fn parse_str(raw: &str) -> std::result::Result<Self, IdentifierError> {
    let raw = raw.as_bytes();
    if raw.len() != HEX_LEN {
      return Err(IdentifierError::Length(raw.len()));
    }

    let mut bytes = [0u8; 12];
    for (i, pair) in raw.chunks(2).enumerate() {
      let hi = hex_value(pair[0]).ok_or(IdentifierError::NonHex(i * 2))?;
      let lo = hex_value(pair[1]).ok_or(IdentifierError::NonHex(i * 2 + 1))?;
      bytes[i] = (hi << 4) | lo;
    }
    Ok(ObjectId(bytes))
  }

  pub fn to_hex(&self) -> String {
    self.to_string()
  }
}

impl Default for ObjectId {
  fn default() -> Self {
    Self::new()
  }
}

fn hex_value(c: u8) -> Option<u8> {
  match c {
    b'0'..=b'9' => Some(c - b'0'),
    b'a'..=b'f' => Some(c - b'a' + 10),
    b'A'..=b'F' => Some(c - b'A' + 10),
    _ => None,
  }
}

impl fmt::Debug for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
  }
}

impl fmt::Display for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for b in self.0 {
      write!(f, "{:02x}", b)?;
    }
    Ok(())
  }
}

impl FromStr for ObjectId {
  type Err = IdentifierError;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    ObjectId::parse_str(s)
  }
}

impl TryFrom<String> for ObjectId {
  type Error = IdentifierError;

  fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
    ObjectId::parse_str(&value)
  }
}

impl From<ObjectId> for String {
  fn from(id: ObjectId) -> Self {
    id.to_string()
  }
}

/// Validates an externally supplied identifier.
///
/// Pure: never touches the store. Callers must run this before using `raw`
/// as a lookup key.
pub fn validate(raw: &str) -> Result<ObjectId> {
  ObjectId::parse_str(raw).map_err(|e| {
    tracing::debug!(raw_id = %raw, reason = %e, "Rejected identifier.");
    EngineError::InvalidIdentifier(raw.to_string())
  })
}
