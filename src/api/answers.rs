//! Predefined-answer handlers, nested under a question.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use crate::api::AppState;
use crate::auth;
use crate::db::model;
use crate::error::{ApiError, ApiResult};
use crate::repr::{self, AnswerEdit, NewAnswer};

/// Lists the predefined answers belonging to a question. The question must
/// exist.
pub async fn list(
    State(state): State<AppState>,
    Path((_survey_id, question_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    let question = model::get_question(&state.conn, question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question", question_id))?;

    let answers = model::list_answers(&state.conn, question.id).await?;

    Ok(Json(answers.iter().map(repr::answer_repr).collect()))
}

/// Creates a predefined answer under a question. Token required. The payload's
/// question reference must match the question in the path.
pub async fn create(
    State(state): State<AppState>,
    Path((_survey_id, question_id)): Path<(i32, i32)>,
    headers: HeaderMap,
    Json(payload): Json<NewAnswer>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth::require_token(&state.conn, &headers).await?;

    model::get_question(&state.conn, question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question", question_id))?;

    repr::validate_answer_owner(question_id, payload.question)?;

    let answer = model::add_answer(&state.conn, question_id, &payload.text).await?;

    Ok((StatusCode::CREATED, Json(repr::answer_repr(&answer))))
}

pub async fn detail(
    State(state): State<AppState>,
    Path((_survey_id, _question_id, id)): Path<(i32, i32, i32)>,
) -> ApiResult<Json<Value>> {
    let answer = model::get_answer(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Answer", id))?;

    Ok(Json(repr::answer_repr(&answer)))
}

/// Edits an answer's text. The owning question is read-only. Token required.
pub async fn edit(
    State(state): State<AppState>,
    Path((_survey_id, _question_id, id)): Path<(i32, i32, i32)>,
    headers: HeaderMap,
    Json(payload): Json<AnswerEdit>,
) -> ApiResult<Json<Value>> {
    auth::require_token(&state.conn, &headers).await?;

    if !model::update_answer(&state.conn, id, &payload.text).await? {
        return Err(ApiError::not_found("Answer", id));
    }

    let answer = model::get_answer(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Answer", id))?;

    Ok(Json(repr::answer_repr(&answer)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((_survey_id, _question_id, id)): Path<(i32, i32, i32)>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    auth::require_token(&state.conn, &headers).await?;

    if !model::delete_answer(&state.conn, id).await? {
        return Err(ApiError::not_found("Answer", id));
    }

    Ok(StatusCode::NO_CONTENT)
}
