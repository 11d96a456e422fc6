// launchdeck/src/engine/users.rs

//! User registration and the role/subscription transitions.

use crate::errors::{EngineError, Result};
use crate::identifier::ObjectId;
use crate::models::user::fields;
use crate::models::{NewUser, Role, SubscriptionStatus, User, UserProfile};
use crate::state::EngineState;
use crate::store::{Filter, Patch};
use tracing::{info, instrument};

fn by_email(email: &str) -> Filter {
  Filter::equals(fields::EMAIL, email.trim().to_lowercase())
}

/// Creates a user; the email must not be taken.
#[instrument(name = "engine::register_user", skip_all, fields(email = %new_user.email), err(level = "warn", Display))]
pub async fn register(state: &EngineState, new_user: NewUser) -> Result<UserProfile> {
  let user = new_user.into_user(state.now())?;
  let inserted = state.users().insert_unless(&by_email(&user.email), &user).await?;
  if inserted.is_none() {
    return Err(EngineError::Conflict(format!("A user with email '{}' already exists.", user.email)));
  }
  info!(user_id = %user.id, "User registered.");
  Ok(user.profile())
}

pub async fn get_by_email(state: &EngineState, email: &str) -> Result<UserProfile> {
  state
    .users()
    .find_one(&by_email(email))
    .await?
    .map(|u| u.profile())
    .ok_or_else(|| EngineError::NotFound(format!("User with email {} not found.", email)))
}

pub async fn list(state: &EngineState) -> Result<Vec<UserProfile>> {
  Ok(state.users().find(&Filter::All).await?.iter().map(User::profile).collect())
}

#[instrument(name = "engine::set_role", skip_all, fields(user_id = %user_id, role = %role), err(level = "warn", Display))]
pub async fn set_role(state: &EngineState, user_id: &ObjectId, role: Role) -> Result<UserProfile> {
  let users = state.users();
  let user = users
    .update_returning(&Filter::Id(*user_id), &[Patch::set(fields::ROLE, role.as_str())])
    .await?
    .ok_or_else(|| users.not_found(user_id))?;
  info!("Role updated.");
  Ok(user.profile())
}

/// Marks the user's subscription as verified, e.g. after a completed payment.
#[instrument(name = "engine::verify_subscription", skip(state), err(level = "warn", Display))]
pub async fn verify_subscription(state: &EngineState, email: &str) -> Result<UserProfile> {
  let user = state
    .users()
    .update_returning(
      &by_email(email),
      &[Patch::set(fields::SUBSCRIPTION_STATUS, SubscriptionStatus::Verified.as_str())],
    )
    .await?
    .ok_or_else(|| EngineError::NotFound(format!("User with email {} not found.", email)))?;
  info!(user_id = %user.id, "Subscription verified.");
  Ok(user.profile())
}
