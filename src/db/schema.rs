use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of answer a question expects. Stored as its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    #[default]
    FreeText,
    SingleChoice,
    MultiChoice,
}

impl AnswerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerType::FreeText => "free_text",
            AnswerType::SingleChoice => "single_choice",
            AnswerType::MultiChoice => "multi_choice",
        }
    }

    pub fn parse(s: &str) -> Option<AnswerType> {
        match s {
            "free_text" => Some(AnswerType::FreeText),
            "single_choice" => Some(AnswerType::SingleChoice),
            "multi_choice" => Some(AnswerType::MultiChoice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Survey {
    pub id: i32,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub finish_date: Option<DateTime<Utc>>,
    pub description: String,
}

impl Survey {
    /// A survey is visible to anonymous callers while its window contains `now`.
    /// A survey with no finish date is never open.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && self.finish_date.map_or(false, |finish| now < finish)
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: i32,
    pub survey_id: i32,
    pub text: String,
    pub answer_type: AnswerType,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub id: i32,
    pub question_id: i32,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CompletedSurvey {
    pub id: i32,
    // Null once the survey has been deleted; the submission record outlives it.
    pub survey_id: Option<i32>,
    pub customer_id: i32,
}

#[derive(Debug, Clone)]
pub struct GivenAnswer {
    pub id: i32,
    pub completed_survey_id: i32,
    pub question_id: Option<i32>,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn survey(start_offset: i64, finish_offset: Option<i64>) -> Survey {
        let now = Utc::now();
        Survey {
            id: 1,
            title: "t".to_owned(),
            start_date: now + Duration::hours(start_offset),
            finish_date: finish_offset.map(|h| now + Duration::hours(h)),
            description: String::new(),
        }
    }

    #[test]
    fn open_within_window() {
        assert!(survey(-1, Some(1)).is_open(Utc::now()));
    }

    #[test]
    fn closed_before_start() {
        assert!(!survey(1, Some(2)).is_open(Utc::now()));
    }

    #[test]
    fn closed_after_finish() {
        assert!(!survey(-2, Some(-1)).is_open(Utc::now()));
    }

    #[test]
    fn closed_without_finish_date() {
        assert!(!survey(-1, None).is_open(Utc::now()));
    }

    #[test]
    fn boundary_is_inclusive_start_exclusive_finish() {
        let s = survey(0, Some(1));
        assert!(s.is_open(s.start_date));
        assert!(!s.is_open(s.finish_date.unwrap()));
    }

    #[test]
    fn answer_type_round_trips_through_names() {
        for at in [
            AnswerType::FreeText,
            AnswerType::SingleChoice,
            AnswerType::MultiChoice,
        ] {
            assert_eq!(AnswerType::parse(at.as_str()), Some(at));
        }
        assert_eq!(AnswerType::parse("ta"), None);
    }
}
