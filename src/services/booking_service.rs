use std::collections::HashMap;

use tracing::debug;

use crate::error::AppError;
use crate::infrastructure::store::{Collection, Filter, InsertAck};
use crate::models::*;
use crate::services::required_email;
use crate::state::AppState;

pub async fn create_booking(app_state: &AppState, booking: Record) -> Result<InsertAck, AppError> {
    debug!(email = non_empty_str(&booking, EMAIL), "Adding booking");
    Ok(app_state
        .store
        .insert_one(Collection::Bookings, without_id(booking))
        .await?)
}

pub async fn find_booking_by_email(
    app_state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Record, AppError> {
    let email = required_email(params)?;

    app_state
        .store
        .find_one(Collection::Bookings, &Filter::field_equals(EMAIL, email))
        .await?
        .ok_or_else(|| AppError::not_found("Booking not found"))
}

pub async fn all_bookings(app_state: &AppState) -> Result<Vec<Record>, AppError> {
    Ok(app_state
        .store
        .find(Collection::Bookings, &Filter::All, None)
        .await?)
}
