//! HTTP request handlers
//!
//! Each handler extracts the request parts, calls the matching service and
//! returns its result. Errors become responses through [`AppError`].

use axum::{
    Json,
    extract::{FromRequest, Path, Query, State},
};
use std::collections::HashMap;

use crate::error::AppError;
use crate::infrastructure::store::InsertAck;
use crate::models::*;
use crate::services::{booking_service, payment_info_service, resort_service, user_service};
use crate::state::AppState;

type Params = Query<HashMap<String, String>>;

/// JSON request body whose rejections are reported as 400 `{"error": ...}`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Root endpoint - plain-text status line
pub async fn root() -> &'static str {
    "RCI Last Call server is running"
}

/// Paginated resort catalog
///
/// Query parameters:
/// - `page`: 1-based page number (default 1)
/// - `limit`: page size (default 15, clamped to the configured maximum)
pub async fn list_resorts(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<ResortPage>, AppError> {
    resort_service::list_resorts(&state, &params).await.map(Json)
}

pub async fn all_resorts(State(state): State<AppState>) -> Result<Json<Vec<Record>>, AppError> {
    resort_service::all_resorts(&state).await.map(Json)
}

/// Search resorts by location, resort_ID, or place_name using `key`
pub async fn search_resorts(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<Vec<Record>>, AppError> {
    let key = params.get("key").map(String::as_str);
    resort_service::search_resorts(&state, key).await.map(Json)
}

pub async fn create_resort(
    State(state): State<AppState>,
    JsonBody(resort): JsonBody<Record>,
) -> Result<Json<InsertAck>, AppError> {
    resort_service::create_resort(&state, resort).await.map(Json)
}

pub async fn update_resort(
    State(state): State<AppState>,
    Path(resort_id): Path<String>,
    JsonBody(fields): JsonBody<Record>,
) -> Result<Json<SuccessMessage>, AppError> {
    resort_service::update_resort(&state, &resort_id, fields)
        .await
        .map(Json)
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(user): JsonBody<Record>,
) -> Result<Json<InsertAck>, AppError> {
    user_service::create_user(&state, user).await.map(Json)
}

pub async fn find_user(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<Record>, AppError> {
    user_service::find_user_by_email(&state, &params)
        .await
        .map(Json)
}

pub async fn all_users(State(state): State<AppState>) -> Result<Json<Vec<Record>>, AppError> {
    user_service::all_users(&state).await.map(Json)
}

/// Body: `{ "email": string, "isAdmin": bool }`
pub async fn update_user_role(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Record>,
) -> Result<Json<SuccessMessage>, AppError> {
    user_service::update_user_role(&state, body).await.map(Json)
}

/// Body: `{ "email": string, "age", "securityDeposit", "idNumber" }`
pub async fn update_user_info(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Record>,
) -> Result<Json<SuccessMessage>, AppError> {
    user_service::update_user_info(&state, body).await.map(Json)
}

pub async fn create_booking(
    State(state): State<AppState>,
    JsonBody(booking): JsonBody<Record>,
) -> Result<Json<InsertAck>, AppError> {
    booking_service::create_booking(&state, booking)
        .await
        .map(Json)
}

pub async fn find_booking(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<Record>, AppError> {
    booking_service::find_booking_by_email(&state, &params)
        .await
        .map(Json)
}

pub async fn all_bookings(State(state): State<AppState>) -> Result<Json<Vec<Record>>, AppError> {
    booking_service::all_bookings(&state).await.map(Json)
}

pub async fn create_payment_info(
    State(state): State<AppState>,
    JsonBody(payment_info): JsonBody<Record>,
) -> Result<Json<InsertAck>, AppError> {
    payment_info_service::create_payment_info(&state, payment_info)
        .await
        .map(Json)
}

pub async fn find_payment_info(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<Vec<Record>>, AppError> {
    payment_info_service::find_payment_info_by_email(&state, &params)
        .await
        .map(Json)
}
