// launchdeck/src/models/user.rs

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod fields {
  pub const EMAIL: &str = "email";
  pub const ROLE: &str = "role";
  pub const SUBSCRIPTION_STATUS: &str = "subscriptionStatus";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  User,
  Creator,
  Admin,
  Moderator,
}

impl Role {
  pub const ALL: [Role; 4] = [Role::User, Role::Creator, Role::Admin, Role::Moderator];

  pub fn as_str(&self) -> &'static str {
    match self {
      Role::User => "user",
      Role::Creator => "creator",
      Role::Admin => "admin",
      Role::Moderator => "moderator",
    }
  }

  pub fn parse(raw: &str) -> Result<Self> {
    let wanted = raw.trim();
    Self::ALL
      .into_iter()
      .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| EngineError::InvalidRole(raw.to_string()))
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubscriptionStatus {
  #[default]
  #[serde(rename = "none")]
  NotSubscribed,
  #[serde(rename = "verified")]
  Verified,
}

impl SubscriptionStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      SubscriptionStatus::NotSubscribed => "none",
      SubscriptionStatus::Verified => "verified",
    }
  }
}

/// Stored user record. Use `profile()` for anything leaving the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  #[serde(rename = "_id")]
  pub id: ObjectId,
  pub email: String,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub password_hash: String,
  #[serde(default)]
  pub role: Role,
  #[serde(default)]
  pub subscription_status: SubscriptionStatus,
  pub created_at: DateTime<Utc>,
}

/// A user without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub id: ObjectId,
  pub email: String,
  pub name: Option<String>,
  pub role: Role,
  pub subscription_status: SubscriptionStatus,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn profile(&self) -> UserProfile {
    UserProfile {
      id: self.id,
      email: self.email.clone(),
      name: self.name.clone(),
      role: self.role,
      subscription_status: self.subscription_status,
      created_at: self.created_at,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub name: Option<String>,
  /// Already hashed by the authentication layer.
  #[serde(default)]
  pub password_hash: String,
}

impl NewUser {
  pub(crate) fn into_user(self, now: DateTime<Utc>) -> Result<User> {
    let missing = super::blank_fields(&[("email", Some(self.email.as_str()))]);
    if !missing.is_empty() {
      return Err(EngineError::MissingFields(missing));
    }
    Ok(User {
      id: ObjectId::new(),
      email: self.email.trim().to_lowercase(),
      name: self.name,
      password_hash: self.password_hash,
      role: Role::User,
      subscription_status: SubscriptionStatus::NotSubscribed,
      created_at: now,
    })
  }
}
