//! Question handlers, nested under a survey.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use crate::api::AppState;
use crate::auth;
use crate::db::model;
use crate::error::{ApiError, ApiResult};
use crate::repr::{self, NewQuestion, QuestionEdit};

/// Lists the questions belonging to a survey. The survey must exist.
pub async fn list(
    State(state): State<AppState>,
    Path(survey_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let survey = model::get_survey(&state.conn, survey_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Survey", survey_id))?;

    let questions = model::list_questions(&state.conn, survey.id).await?;

    Ok(Json(questions.iter().map(repr::question_repr).collect()))
}

/// Creates a question under a survey. Token required. The payload's survey
/// reference must match the survey in the path.
pub async fn create(
    State(state): State<AppState>,
    Path(survey_id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<NewQuestion>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth::require_token(&state.conn, &headers).await?;

    model::get_survey(&state.conn, survey_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Survey", survey_id))?;

    repr::validate_question_owner(survey_id, payload.survey)?;

    let question =
        model::add_question(&state.conn, survey_id, &payload.text, payload.answer_type).await?;

    Ok((StatusCode::CREATED, Json(repr::question_repr(&question))))
}

/// Question detail, including its predefined answers unless it is free-text.
pub async fn detail(
    State(state): State<AppState>,
    Path((_survey_id, id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    let question = model::get_question(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question", id))?;

    let answers = model::list_answers(&state.conn, question.id).await?;

    Ok(Json(repr::question_detail_repr(&question, &answers)))
}

/// Edits a question's text and answer type. The owning survey is read-only.
/// Token required.
pub async fn edit(
    State(state): State<AppState>,
    Path((_survey_id, id)): Path<(i32, i32)>,
    headers: HeaderMap,
    Json(payload): Json<QuestionEdit>,
) -> ApiResult<Json<Value>> {
    auth::require_token(&state.conn, &headers).await?;

    if !model::update_question(&state.conn, id, &payload.text, payload.answer_type).await? {
        return Err(ApiError::not_found("Question", id));
    }

    let question = model::get_question(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question", id))?;

    Ok(Json(repr::question_repr(&question)))
}

/// Deletes a question and its answers. Token required.
pub async fn delete(
    State(state): State<AppState>,
    Path((_survey_id, id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    auth::require_token(&state.conn, &headers).await?;

    if !model::delete_question(&state.conn, id).await? {
        return Err(ApiError::not_found("Question", id));
    }

    Ok(StatusCode::NO_CONTENT)
}
