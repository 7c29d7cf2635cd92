//! User directory
//!
//! `email` is the lookup key for every operation. The two update operations
//! differ on purpose: the role update sets `isAdmin` and nothing else, while
//! the profile update overwrites `age`, `securityDeposit` and `idNumber`
//! together, writing `null` for any of them missing from the request.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::AppError;
use crate::infrastructure::store::{Collection, Filter, InsertAck};
use crate::models::*;
use crate::services::required_email;
use crate::state::AppState;

pub async fn create_user(app_state: &AppState, user: Record) -> Result<InsertAck, AppError> {
    if non_empty_str(&user, NAME).is_none() || non_empty_str(&user, EMAIL).is_none() {
        return Err(AppError::validation("Name and email are required"));
    }

    debug!(email = non_empty_str(&user, EMAIL), "Adding user");
    Ok(app_state
        .store
        .insert_one(Collection::Users, without_id(user))
        .await?)
}

pub async fn find_user_by_email(
    app_state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Record, AppError> {
    let email = required_email(params)?;

    app_state
        .store
        .find_one(Collection::Users, &Filter::field_equals(EMAIL, email))
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

pub async fn all_users(app_state: &AppState) -> Result<Vec<Record>, AppError> {
    Ok(app_state
        .store
        .find(Collection::Users, &Filter::All, None)
        .await?)
}

/// Sets `isAdmin` on the user with the given email.
pub async fn update_user_role(
    app_state: &AppState,
    body: Record,
) -> Result<SuccessMessage, AppError> {
    let email = non_empty_str(&body, EMAIL)
        .ok_or_else(|| AppError::validation("email is required"))?;
    let is_admin = body
        .get(IS_ADMIN)
        .and_then(Value::as_bool)
        .ok_or_else(|| AppError::validation("isAdmin must be a boolean"))?;

    let mut fields = Record::new();
    fields.insert(IS_ADMIN.to_string(), Value::Bool(is_admin));

    let outcome = app_state
        .store
        .update_one(Collection::Users, &Filter::field_equals(EMAIL, email), fields)
        .await?;

    if outcome.matched == 0 {
        return Err(AppError::not_found("User not found"));
    }

    info!(email, is_admin, "User role updated");
    Ok(SuccessMessage::new("User role updated successfully"))
}

/// Overwrites the profile fields of the user with the given email.
pub async fn update_user_info(
    app_state: &AppState,
    body: Record,
) -> Result<SuccessMessage, AppError> {
    let email = non_empty_str(&body, EMAIL)
        .ok_or_else(|| AppError::validation("email is required"))?;

    let fields: Record = PROFILE_FIELDS
        .iter()
        .map(|field| {
            let value = body.get(*field).cloned().unwrap_or(Value::Null);
            (field.to_string(), value)
        })
        .collect();

    let outcome = app_state
        .store
        .update_one(Collection::Users, &Filter::field_equals(EMAIL, email), fields)
        .await?;

    if outcome.matched == 0 {
        return Err(AppError::not_found("User not found"));
    }

    Ok(SuccessMessage::new("User info updated successfully"))
}
