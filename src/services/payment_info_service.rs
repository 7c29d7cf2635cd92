use std::collections::HashMap;

use tracing::debug;

use crate::error::AppError;
use crate::infrastructure::store::{Collection, Filter, InsertAck};
use crate::models::*;
use crate::services::required_email;
use crate::state::AppState;

pub async fn create_payment_info(
    app_state: &AppState,
    payment_info: Record,
) -> Result<InsertAck, AppError> {
    debug!(email = non_empty_str(&payment_info, EMAIL), "Adding payment info");
    Ok(app_state
        .store
        .insert_one(Collection::PaymentInfo, without_id(payment_info))
        .await?)
}

/// Every payment record stored for an email; an email may have several.
pub async fn find_payment_info_by_email(
    app_state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Vec<Record>, AppError> {
    let email = required_email(params)?;

    let records = app_state
        .store
        .find(
            Collection::PaymentInfo,
            &Filter::field_equals(EMAIL, email),
            None,
        )
        .await?;

    if records.is_empty() {
        return Err(AppError::not_found("No payment info found"));
    }

    Ok(records)
}
