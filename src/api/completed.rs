//! Completed-survey handlers: listing a customer's submissions, the commit
//! operation, and the detail view with given answers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::api::AppState;
use crate::db::model;
use crate::error::{ApiError, ApiResult};
use crate::repr::{self, SurveyCommit};

/// Lists a customer's completed surveys. The customer must exist.
pub async fn list(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let customer = model::get_customer(&state.conn, customer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", customer_id))?;

    let completed = model::list_completed_surveys(&state.conn, customer.id).await?;

    let mut result = Vec::with_capacity(completed.len());
    for each in completed {
        let survey = match each.survey_id {
            Some(survey_id) => model::get_survey(&state.conn, survey_id).await?,
            None => None,
        };
        result.push(repr::completed_survey_repr(&each, survey.as_ref()));
    }

    Ok(Json(Value::Array(result)))
}

/// Commits a completed survey: one submission record plus all its given
/// answers, atomically. Deliberately open to anonymous callers — submitting
/// answers requires no token.
pub async fn commit(
    State(state): State<AppState>,
    Path(_customer_id): Path<i32>,
    Json(payload): Json<SurveyCommit>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let pairs: Vec<(Option<i32>, String)> = payload
        .given_answers
        .into_iter()
        .map(|each| (each.question, each.answer))
        .collect();

    let (completed, _) =
        model::commit_survey(&state.conn, payload.customer, payload.survey, &pairs)
            .await
            .map_err(ApiError::from_commit_failure)?;

    let survey = model::get_survey(&state.conn, payload.survey).await?;
    let given = model::list_given_answers_resolved(&state.conn, completed.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(repr::completed_survey_detail_repr(
            completed.id,
            survey.as_ref().map(|s| s.title.as_str()),
            &given,
        )),
    ))
}

/// Completed-survey detail: resolved survey title plus the given answers keyed
/// by 1-based position, each with its question resolved to the question text.
pub async fn detail(
    State(state): State<AppState>,
    Path((_customer_id, id)): Path<(i32, i32)>,
) -> ApiResult<Json<Value>> {
    let completed = model::get_completed_survey(&state.conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Completed survey", id))?;

    let survey = match completed.survey_id {
        Some(survey_id) => model::get_survey(&state.conn, survey_id).await?,
        None => None,
    };
    let given = model::list_given_answers_resolved(&state.conn, completed.id).await?;

    Ok(Json(repr::completed_survey_detail_repr(
        completed.id,
        survey.as_ref().map(|s| s.title.as_str()),
        &given,
    )))
}
