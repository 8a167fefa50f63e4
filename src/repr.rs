//! Wire representations.
//!
//! Builders are pure: composed views take their already-fetched children as
//! parameters and never touch the database. Handlers assemble the context.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::db::schema::{Answer, AnswerType, CompletedSurvey, Customer, Question, Survey};
use crate::error::{ApiError, ApiResult};

// ---- write payloads ----

#[derive(Debug, Deserialize)]
pub struct NewSurvey {
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub finish_date: Option<DateTime<Utc>>,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct NewQuestion {
    pub survey: i32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub answer_type: AnswerType,
}

#[derive(Debug, Deserialize)]
pub struct QuestionEdit {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub answer_type: AnswerType,
}

#[derive(Debug, Deserialize)]
pub struct NewAnswer {
    pub question: i32,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerEdit {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct NewCustomer {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GivenAnswerInput {
    pub question: Option<i32>,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SurveyCommit {
    pub customer: i32,
    pub survey: i32,
    pub given_answers: Vec<GivenAnswerInput>,
}

// ---- write-side validation ----

/// A new question must reference the survey it is being created under.
pub fn validate_question_owner(path_survey_id: i32, payload_survey_id: i32) -> ApiResult<()> {
    if payload_survey_id != path_survey_id {
        return Err(ApiError::Validation {
            field: "survey".to_owned(),
            message: format!("The question should belong to the {} survey", path_survey_id),
        });
    }

    Ok(())
}

/// A new answer must reference the question it is being created under.
pub fn validate_answer_owner(path_question_id: i32, payload_question_id: i32) -> ApiResult<()> {
    if payload_question_id != path_question_id {
        return Err(ApiError::Validation {
            field: "question".to_owned(),
            message: format!("The answer should belong to the {} question", path_question_id),
        });
    }

    Ok(())
}

// ---- read representations ----

pub fn survey_repr(survey: &Survey) -> Value {
    json!({
        "id": survey.id,
        "title": survey.title,
        "start_date": survey.start_date,
        "finish_date": survey.finish_date,
        "description": survey.description,
    })
}

pub fn question_repr(question: &Question) -> Value {
    json!({
        "id": question.id,
        "survey": question.survey_id,
        "text": question.text,
        "answer_type": question.answer_type,
    })
}

pub fn answer_repr(answer: &Answer) -> Value {
    json!({
        "id": answer.id,
        "question": answer.question_id,
        "text": answer.text,
    })
}

pub fn customer_repr(customer: &Customer) -> Value {
    json!({
        "id": customer.id,
        "name": customer.name,
    })
}

/// Question with its predefined answers attached. Free-text questions have no
/// selectable options, so the answers key is omitted entirely.
pub fn question_detail_repr(question: &Question, answers: &[Answer]) -> Value {
    let mut repr = question_repr(question);

    if question.answer_type != AnswerType::FreeText {
        repr["answers"] = answers.iter().map(answer_repr).collect();
    }

    repr
}

/// Survey with its questions keyed by 1-based position in the supplied order.
pub fn survey_detail_repr(survey: &Survey, questions: &[(Question, Vec<Answer>)]) -> Value {
    let mut repr = survey_repr(survey);

    let mut nested = Map::new();
    for (count, (question, answers)) in questions.iter().enumerate() {
        nested.insert(
            (count + 1).to_string(),
            question_detail_repr(question, answers),
        );
    }
    repr["questions"] = Value::Object(nested);

    repr
}

/// Completed survey as a list entry: the survey resolved to its flat
/// representation, or null once the survey has been deleted.
pub fn completed_survey_repr(completed: &CompletedSurvey, survey: Option<&Survey>) -> Value {
    json!({
        "id": completed.id,
        "survey": survey.map(survey_repr),
    })
}

/// Completed survey with its given answers keyed by 1-based position. The
/// survey resolves to its title and each answer's question to the question
/// text; both render as null when the referenced row is gone.
pub fn completed_survey_detail_repr(
    id: i32,
    survey_title: Option<&str>,
    given_answers: &[(Option<String>, String)],
) -> Value {
    let mut nested = Map::new();
    for (count, (question_text, answer)) in given_answers.iter().enumerate() {
        nested.insert(
            (count + 1).to_string(),
            json!({ "question": question_text, "answer": answer }),
        );
    }

    json!({
        "id": id,
        "survey": survey_title,
        "given_answers": nested,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_survey() -> Survey {
        Survey {
            id: 7,
            title: "Breakfast habits".to_owned(),
            start_date: Utc.with_ymd_and_hms(2021, 9, 19, 0, 0, 0).unwrap(),
            finish_date: Some(Utc.with_ymd_and_hms(2021, 10, 30, 0, 0, 0).unwrap()),
            description: "What do you eat in the morning?".to_owned(),
        }
    }

    fn question(id: i32, answer_type: AnswerType) -> Question {
        Question {
            id,
            survey_id: 7,
            text: format!("Question {}", id),
            answer_type,
        }
    }

    #[test]
    fn survey_round_trips_flat_fields() {
        let survey = sample_survey();
        let repr = survey_repr(&survey);

        assert_eq!(repr["id"], 7);
        assert_eq!(repr["title"], "Breakfast habits");
        assert_eq!(repr["start_date"], "2021-09-19T00:00:00Z");
        assert_eq!(repr["finish_date"], "2021-10-30T00:00:00Z");
        assert_eq!(repr["description"], "What do you eat in the morning?");
    }

    #[test]
    fn null_finish_date_serializes_as_null() {
        let mut survey = sample_survey();
        survey.finish_date = None;

        assert_eq!(survey_repr(&survey)["finish_date"], Value::Null);
    }

    #[test]
    fn detail_keys_questions_by_position_in_order() {
        let survey = sample_survey();
        let questions: Vec<(Question, Vec<Answer>)> = (0..12)
            .map(|i| (question(100 - i, AnswerType::FreeText), Vec::new()))
            .collect();

        let repr = survey_detail_repr(&survey, &questions);
        let nested = repr["questions"].as_object().unwrap();

        assert_eq!(nested.len(), 12);
        // Insertion order, not lexicographic: "10" comes after "9".
        let keys: Vec<&str> = nested.keys().map(String::as_str).collect();
        assert_eq!(keys[0], "1");
        assert_eq!(keys[9], "10");
        assert_eq!(keys[11], "12");
        assert_eq!(nested["1"]["id"], 100);
        assert_eq!(nested["12"]["id"], 89);
    }

    #[test]
    fn free_text_question_has_no_answers_key() {
        let q = question(1, AnswerType::FreeText);
        let answers = vec![Answer {
            id: 5,
            question_id: 1,
            text: "ignored".to_owned(),
        }];

        let repr = question_detail_repr(&q, &answers);

        assert!(repr.get("answers").is_none());
    }

    #[test]
    fn choice_question_carries_its_answers() {
        let q = question(1, AnswerType::SingleChoice);
        let answers = vec![
            Answer {
                id: 5,
                question_id: 1,
                text: "Toast".to_owned(),
            },
            Answer {
                id: 6,
                question_id: 1,
                text: "Cereal".to_owned(),
            },
        ];

        let repr = question_detail_repr(&q, &answers);
        let listed = repr["answers"].as_array().unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["text"], "Toast");
        assert_eq!(listed[1]["question"], 1);
        assert_eq!(repr["answer_type"], "single_choice");
    }

    #[test]
    fn question_owner_mismatch_names_expected_survey() {
        let err = validate_question_owner(3, 4).unwrap_err();

        match err {
            ApiError::Validation { field, message } => {
                assert_eq!(field, "survey");
                assert_eq!(message, "The question should belong to the 3 survey");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn question_owner_match_passes() {
        assert!(validate_question_owner(3, 3).is_ok());
    }

    #[test]
    fn answer_owner_mismatch_names_expected_question() {
        let err = validate_answer_owner(9, 2).unwrap_err();

        match err {
            ApiError::Validation { field, message } => {
                assert_eq!(field, "question");
                assert_eq!(message, "The answer should belong to the 9 question");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn answer_owner_match_passes() {
        assert!(validate_answer_owner(9, 9).is_ok());
    }

    #[test]
    fn completed_detail_resolves_titles_and_question_text() {
        let repr = completed_survey_detail_repr(
            11,
            Some("Breakfast habits"),
            &[
                (Some("Question 1".to_owned()), "Answer".to_owned()),
                (None, "orphaned".to_owned()),
            ],
        );

        assert_eq!(repr["id"], 11);
        assert_eq!(repr["survey"], "Breakfast habits");
        assert_eq!(repr["given_answers"]["1"]["question"], "Question 1");
        assert_eq!(repr["given_answers"]["1"]["answer"], "Answer");
        assert_eq!(repr["given_answers"]["2"]["question"], Value::Null);
    }

    #[test]
    fn completed_detail_with_deleted_survey_is_null() {
        let repr = completed_survey_detail_repr(11, None, &[]);

        assert_eq!(repr["survey"], Value::Null);
        assert_eq!(repr["given_answers"].as_object().unwrap().len(), 0);
    }

    #[test]
    fn completed_list_entry_nests_flat_survey() {
        let survey = sample_survey();
        let completed = CompletedSurvey {
            id: 2,
            survey_id: Some(7),
            customer_id: 1,
        };

        let repr = completed_survey_repr(&completed, Some(&survey));
        assert_eq!(repr["survey"]["title"], "Breakfast habits");

        let orphan = completed_survey_repr(&completed, None);
        assert_eq!(orphan["survey"], Value::Null);
    }

    #[test]
    fn commit_payload_deserializes() {
        let payload: SurveyCommit = serde_json::from_value(json!({
            "customer": 1,
            "survey": 7,
            "given_answers": [{"question": 3, "answer": "Answer"}],
        }))
        .unwrap();

        assert_eq!(payload.customer, 1);
        assert_eq!(payload.survey, 7);
        assert_eq!(payload.given_answers.len(), 1);
        assert_eq!(payload.given_answers[0].question, Some(3));
        assert_eq!(payload.given_answers[0].answer, "Answer");
    }

    #[test]
    fn new_question_defaults_to_free_text() {
        let payload: NewQuestion =
            serde_json::from_value(json!({ "survey": 7, "text": "Coffee?" })).unwrap();

        assert_eq!(payload.answer_type, AnswerType::FreeText);
    }
}
