//! Credential exchange: username and password in, bearer token out.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::auth;
use crate::db::model;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub async fn obtain_token(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<Value>> {
    if credentials.username != state.config.admin_username
        || credentials.password != state.config.admin_password
    {
        return Err(ApiError::Unauthorized(
            "Unable to log in with provided credentials".to_owned(),
        ));
    }

    let token = auth::mint_token();
    model::add_token(&state.conn, &token).await?;

    tracing::info!(username = %credentials.username, "issued auth token");

    Ok(Json(json!({ "token": token })))
}
