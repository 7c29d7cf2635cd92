use std::collections::HashMap;

use tracing::{debug, error};

use crate::error::AppError;
use crate::infrastructure::store::{Collection, Filter, InsertAck, Window};
use crate::models::*;
use crate::state::AppState;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 15;

/// Validated pagination window for the resort catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Reads `page` and `limit`. Missing, non-numeric or zero values fall
    /// back to the defaults and `limit` is clamped to `max_limit`.
    pub fn from_params(params: &HashMap<String, String>, max_limit: u64) -> Self {
        let page = positive(params.get("page"), DEFAULT_PAGE);
        let limit = positive(params.get("limit"), DEFAULT_LIMIT).min(max_limit.max(1));
        Self { page, limit }
    }

    /// `skip` never exceeds `i64::MAX`, the largest value the driver accepts.
    pub fn window(&self) -> Window {
        Window {
            skip: (self.page - 1)
                .saturating_mul(self.limit)
                .min(i64::MAX as u64),
            limit: self.limit,
        }
    }

    pub fn total_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.limit)
    }
}

fn positive(value: Option<&String>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub async fn list_resorts(
    app_state: &AppState,
    params: &HashMap<String, String>,
) -> Result<ResortPage, AppError> {
    let request = PageRequest::from_params(params, app_state.max_page_limit);
    let store = &app_state.store;
    let filter = Filter::All;

    let (resorts, count) = tokio::try_join!(
        store.find(Collection::Resorts, &filter, Some(request.window())),
        store.count(Collection::Resorts),
    )?;

    Ok(ResortPage {
        resorts,
        total_pages: request.total_pages(count),
        current_page: request.page,
        total_resorts: count,
    })
}

pub async fn all_resorts(app_state: &AppState) -> Result<Vec<Record>, AppError> {
    Ok(app_state
        .store
        .find(Collection::Resorts, &Filter::All, None)
        .await?)
}

/// Case-insensitive substring search over location, resort id and place name
pub async fn search_resorts(
    app_state: &AppState,
    key: Option<&str>,
) -> Result<Vec<Record>, AppError> {
    let key = key.ok_or_else(|| AppError::validation("key query parameter is required"))?;

    let filter = Filter::AnyFieldContains {
        fields: RESORT_SEARCH_FIELDS,
        needle: key.to_string(),
    };

    app_state
        .store
        .find(Collection::Resorts, &filter, None)
        .await
        .map_err(|e| {
            error!("Error fetching search results: {e}");
            AppError::not_found("Search Not Found")
        })
}

pub async fn create_resort(app_state: &AppState, resort: Record) -> Result<InsertAck, AppError> {
    debug!(?resort, "Adding resort");
    Ok(app_state
        .store
        .insert_one(Collection::Resorts, without_id(resort))
        .await?)
}

/// Field-level merge: only the fields present in `fields` are overwritten
pub async fn update_resort(
    app_state: &AppState,
    resort_id: &str,
    fields: Record,
) -> Result<SuccessMessage, AppError> {
    let fields = without_id(fields);
    if fields.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    let outcome = app_state
        .store
        .update_one(
            Collection::Resorts,
            &Filter::Id(resort_id.to_string()),
            fields,
        )
        .await?;

    if outcome.matched == 0 || outcome.modified == 0 {
        return Err(AppError::not_found("Resort not found or no changes made"));
    }

    Ok(SuccessMessage::new("Resort updated successfully"))
}
