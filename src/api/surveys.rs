//! Survey collection and detail handlers.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use crate::api::AppState;
use crate::auth;
use crate::db::model;
use crate::error::{ApiError, ApiResult};
use crate::repr::{self, NewSurvey};

/// Lists surveys, newest start date first. Anonymous callers only see surveys
/// whose window currently contains now; a valid token lifts the filter.
pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let authenticated = auth::has_valid_token(&state.conn, &headers).await?;
    let surveys = model::list_surveys(&state.conn, !authenticated).await?;

    Ok(Json(surveys.iter().map(repr::survey_repr).collect()))
}

/// Creates a survey. Token required.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewSurvey>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth::require_token(&state.conn, &headers).await?;

    let survey = model::add_survey(
        &state.conn,
        &payload.title,
        payload.start_date,
        payload.finish_date,
        &payload.description,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(repr::survey_repr(&survey))))
}

/// Survey detail: flat fields plus questions (and their predefined answers)
/// keyed by 1-based position.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let survey = model::get_survey(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Survey", id))?;

    let questions = model::list_questions(&state.conn, survey.id).await?;

    let mut with_answers = Vec::with_capacity(questions.len());
    for question in questions {
        let answers = model::list_answers(&state.conn, question.id).await?;
        with_answers.push((question, answers));
    }

    Ok(Json(repr::survey_detail_repr(&survey, &with_answers)))
}

/// Edits a survey. Token required.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<NewSurvey>,
) -> ApiResult<Json<Value>> {
    auth::require_token(&state.conn, &headers).await?;

    let updated = model::update_survey(
        &state.conn,
        id,
        &payload.title,
        payload.start_date,
        payload.finish_date,
        &payload.description,
    )
    .await?;

    if !updated {
        return Err(ApiError::not_found("Survey", id));
    }

    let survey = model::get_survey(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Survey", id))?;

    Ok(Json(repr::survey_repr(&survey)))
}

/// Deletes a survey and, through the schema, its questions and answers.
/// Token required.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    auth::require_token(&state.conn, &headers).await?;

    if !model::delete_survey(&state.conn, id).await? {
        return Err(ApiError::not_found("Survey", id));
    }

    Ok(StatusCode::NO_CONTENT)
}
