//! Customer handlers.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use crate::api::AppState;
use crate::auth;
use crate::db::model;
use crate::error::{ApiError, ApiResult};
use crate::repr::{self, NewCustomer};

/// Lists customers. Token required; the collection is not public.
pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    auth::require_token(&state.conn, &headers).await?;

    let customers = model::list_customers(&state.conn).await?;

    Ok(Json(customers.iter().map(repr::customer_repr).collect()))
}

/// Creates a customer. Token required.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewCustomer>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth::require_token(&state.conn, &headers).await?;

    let customer = model::add_customer(&state.conn, &payload.name).await?;

    Ok((StatusCode::CREATED, Json(repr::customer_repr(&customer))))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let customer = model::get_customer(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", id))?;

    Ok(Json(repr::customer_repr(&customer)))
}

/// Edits a customer's name. Token required.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<NewCustomer>,
) -> ApiResult<Json<Value>> {
    auth::require_token(&state.conn, &headers).await?;

    if !model::update_customer(&state.conn, id, &payload.name).await? {
        return Err(ApiError::not_found("Customer", id));
    }

    let customer = model::get_customer(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", id))?;

    Ok(Json(repr::customer_repr(&customer)))
}

/// Deletes a customer and, through the schema, their completed surveys.
/// Token required.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    auth::require_token(&state.conn, &headers).await?;

    if !model::delete_customer(&state.conn, id).await? {
        return Err(ApiError::not_found("Customer", id));
    }

    Ok(StatusCode::NO_CONTENT)
}
