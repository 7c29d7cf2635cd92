//! Business logic services
//!
//! One service per collection. Each operation validates the few fields it
//! names, makes one or two store calls and shapes the response.

use std::collections::HashMap;

use crate::error::AppError;
use crate::models::EMAIL;

pub mod booking_service;
pub mod payment_info_service;
pub mod resort_service;
pub mod user_service;

/// The `email` query parameter, required by every fetch-by-email route.
/// The value is matched exactly as sent; blank values are rejected.
pub(crate) fn required_email(params: &HashMap<String, String>) -> Result<&str, AppError> {
    params
        .get(EMAIL)
        .map(String::as_str)
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| AppError::validation("email query parameter is required"))
}
