use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{query, PgPool, Row};
use tokio_stream::StreamExt;

use crate::db::schema::{Answer, AnswerType, CompletedSurvey, Customer, GivenAnswer, Question, Survey};

fn map_survey(row: PgRow) -> Survey {
    Survey {
        id: row.get("id"),
        title: row.get("title"),
        start_date: row.get("start_date"),
        finish_date: row.get("finish_date"),
        description: row.get("description"),
    }
}

fn map_question(row: PgRow) -> Question {
    Question {
        id: row.get("id"),
        survey_id: row.get("survey_id"),
        text: row.get("text"),
        answer_type: AnswerType::parse(&row.get::<String, _>("answer_type")).unwrap_or_default(),
    }
}

fn map_answer(row: PgRow) -> Answer {
    Answer {
        id: row.get("id"),
        question_id: row.get("question_id"),
        text: row.get("text"),
    }
}

fn map_customer(row: PgRow) -> Customer {
    Customer {
        id: row.get("id"),
        name: row.get("name"),
    }
}

fn map_completed_survey(row: PgRow) -> CompletedSurvey {
    CompletedSurvey {
        id: row.get("id"),
        survey_id: row.get("survey_id"),
        customer_id: row.get("customer_id"),
    }
}

pub async fn list_surveys(conn: &PgPool, open_only: bool) -> anyhow::Result<Vec<Survey>> {
    let sql = if open_only {
        "SELECT * FROM survey
         WHERE start_date <= NOW() AND finish_date > NOW()
         ORDER BY start_date DESC;"
    } else {
        "SELECT * FROM survey ORDER BY start_date DESC;"
    };

    let mut stream = query(sql).map(map_survey).fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}

pub async fn get_survey(conn: &PgPool, id: i32) -> anyhow::Result<Option<Survey>> {
    let r = query("SELECT * FROM survey WHERE id=$1;")
        .bind(id)
        .map(map_survey)
        .fetch_optional(conn)
        .await?;

    Ok(r)
}

pub async fn add_survey(
    conn: &PgPool,
    title: &str,
    start_date: DateTime<Utc>,
    finish_date: Option<DateTime<Utc>>,
    description: &str,
) -> anyhow::Result<Survey> {
    let r = query(
        "INSERT INTO survey (title, start_date, finish_date, description)
         VALUES ($1, $2, $3, $4)
         RETURNING id;",
    )
    .bind(title)
    .bind(start_date)
    .bind(finish_date)
    .bind(description)
    .fetch_one(conn)
    .await?;

    Ok(Survey {
        id: r.get("id"),
        title: title.to_owned(),
        start_date,
        finish_date,
        description: description.to_owned(),
    })
}

pub async fn update_survey(
    conn: &PgPool,
    id: i32,
    title: &str,
    start_date: DateTime<Utc>,
    finish_date: Option<DateTime<Utc>>,
    description: &str,
) -> anyhow::Result<bool> {
    let r = query(
        "UPDATE survey SET title=$2, start_date=$3, finish_date=$4, description=$5 WHERE id=$1;",
    )
    .bind(id)
    .bind(title)
    .bind(start_date)
    .bind(finish_date)
    .bind(description)
    .execute(conn)
    .await?;

    Ok(r.rows_affected() > 0)
}

pub async fn delete_survey(conn: &PgPool, id: i32) -> anyhow::Result<bool> {
    let r = query("DELETE FROM survey WHERE id=$1;").bind(id).execute(conn).await?;

    Ok(r.rows_affected() > 0)
}

pub async fn list_questions(conn: &PgPool, survey_id: i32) -> anyhow::Result<Vec<Question>> {
    let mut stream = query("SELECT * FROM question WHERE survey_id=$1 ORDER BY id;")
        .bind(survey_id)
        .map(map_question)
        .fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}

pub async fn get_question(conn: &PgPool, id: i32) -> anyhow::Result<Option<Question>> {
    let r = query("SELECT * FROM question WHERE id=$1;")
        .bind(id)
        .map(map_question)
        .fetch_optional(conn)
        .await?;

    Ok(r)
}

pub async fn add_question(
    conn: &PgPool,
    survey_id: i32,
    text: &str,
    answer_type: AnswerType,
) -> anyhow::Result<Question> {
    let r = query(
        "INSERT INTO question (survey_id, text, answer_type)
         VALUES ($1, $2, $3)
         RETURNING id;",
    )
    .bind(survey_id)
    .bind(text)
    .bind(answer_type.as_str())
    .fetch_one(conn)
    .await?;

    Ok(Question {
        id: r.get("id"),
        survey_id,
        text: text.to_owned(),
        answer_type,
    })
}

pub async fn update_question(
    conn: &PgPool,
    id: i32,
    text: &str,
    answer_type: AnswerType,
) -> anyhow::Result<bool> {
    let r = query("UPDATE question SET text=$2, answer_type=$3 WHERE id=$1;")
        .bind(id)
        .bind(text)
        .bind(answer_type.as_str())
        .execute(conn)
        .await?;

    Ok(r.rows_affected() > 0)
}

pub async fn delete_question(conn: &PgPool, id: i32) -> anyhow::Result<bool> {
    let r = query("DELETE FROM question WHERE id=$1;").bind(id).execute(conn).await?;

    Ok(r.rows_affected() > 0)
}

pub async fn list_answers(conn: &PgPool, question_id: i32) -> anyhow::Result<Vec<Answer>> {
    let mut stream = query("SELECT * FROM answer WHERE question_id=$1 ORDER BY id;")
        .bind(question_id)
        .map(map_answer)
        .fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}

pub async fn get_answer(conn: &PgPool, id: i32) -> anyhow::Result<Option<Answer>> {
    let r = query("SELECT * FROM answer WHERE id=$1;")
        .bind(id)
        .map(map_answer)
        .fetch_optional(conn)
        .await?;

    Ok(r)
}

pub async fn add_answer(conn: &PgPool, question_id: i32, text: &str) -> anyhow::Result<Answer> {
    let r = query(
        "INSERT INTO answer (question_id, text)
         VALUES ($1, $2)
         RETURNING id;",
    )
    .bind(question_id)
    .bind(text)
    .fetch_one(conn)
    .await?;

    Ok(Answer {
        id: r.get("id"),
        question_id,
        text: text.to_owned(),
    })
}

pub async fn update_answer(conn: &PgPool, id: i32, text: &str) -> anyhow::Result<bool> {
    let r = query("UPDATE answer SET text=$2 WHERE id=$1;")
        .bind(id)
        .bind(text)
        .execute(conn)
        .await?;

    Ok(r.rows_affected() > 0)
}

pub async fn delete_answer(conn: &PgPool, id: i32) -> anyhow::Result<bool> {
    let r = query("DELETE FROM answer WHERE id=$1;").bind(id).execute(conn).await?;

    Ok(r.rows_affected() > 0)
}

pub async fn list_customers(conn: &PgPool) -> anyhow::Result<Vec<Customer>> {
    let mut stream = query("SELECT * FROM customer ORDER BY id;").map(map_customer).fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}

pub async fn get_customer(conn: &PgPool, id: i32) -> anyhow::Result<Option<Customer>> {
    let r = query("SELECT * FROM customer WHERE id=$1;")
        .bind(id)
        .map(map_customer)
        .fetch_optional(conn)
        .await?;

    Ok(r)
}

pub async fn add_customer(conn: &PgPool, name: &str) -> anyhow::Result<Customer> {
    let r = query("INSERT INTO customer (name) VALUES ($1) RETURNING id;")
        .bind(name)
        .fetch_one(conn)
        .await?;

    Ok(Customer {
        id: r.get("id"),
        name: name.to_owned(),
    })
}

pub async fn update_customer(conn: &PgPool, id: i32, name: &str) -> anyhow::Result<bool> {
    let r = query("UPDATE customer SET name=$2 WHERE id=$1;")
        .bind(id)
        .bind(name)
        .execute(conn)
        .await?;

    Ok(r.rows_affected() > 0)
}

pub async fn delete_customer(conn: &PgPool, id: i32) -> anyhow::Result<bool> {
    let r = query("DELETE FROM customer WHERE id=$1;").bind(id).execute(conn).await?;

    Ok(r.rows_affected() > 0)
}

pub async fn list_completed_surveys(
    conn: &PgPool,
    customer_id: i32,
) -> anyhow::Result<Vec<CompletedSurvey>> {
    let mut stream = query("SELECT * FROM completed_survey WHERE customer_id=$1 ORDER BY id;")
        .bind(customer_id)
        .map(map_completed_survey)
        .fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}

pub async fn get_completed_survey(
    conn: &PgPool,
    id: i32,
) -> anyhow::Result<Option<CompletedSurvey>> {
    let r = query("SELECT * FROM completed_survey WHERE id=$1;")
        .bind(id)
        .map(map_completed_survey)
        .fetch_optional(conn)
        .await?;

    Ok(r)
}

/// Given answers for a completed survey, with each question reference already
/// resolved to the question's text. Deleted questions resolve to null.
pub async fn list_given_answers_resolved(
    conn: &PgPool,
    completed_survey_id: i32,
) -> anyhow::Result<Vec<(Option<String>, String)>> {
    let mut stream = query(
        "SELECT q.text AS question_text, g.answer
         FROM given_answer g
         LEFT JOIN question q ON q.id = g.question_id
         WHERE g.completed_survey_id=$1
         ORDER BY g.id;",
    )
    .bind(completed_survey_id)
    .map(|row: PgRow| (row.get("question_text"), row.get("answer")))
    .fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}

/// Commits a completed survey: one completed_survey row plus one given_answer
/// row per supplied (question, answer) pair, all inside a single transaction.
/// Any insert failure rolls the whole submission back.
///
/// The answer text is stored verbatim so the submission survives later edits
/// or deletions of the predefined answer options.
pub async fn commit_survey(
    conn: &PgPool,
    customer_id: i32,
    survey_id: i32,
    given_answers: &[(Option<i32>, String)],
) -> anyhow::Result<(CompletedSurvey, Vec<GivenAnswer>)> {
    let mut tx = conn.begin().await?;

    let r = query(
        "INSERT INTO completed_survey (survey_id, customer_id)
         VALUES ($1, $2)
         RETURNING id;",
    )
    .bind(survey_id)
    .bind(customer_id)
    .fetch_one(&mut *tx)
    .await?;

    let completed = CompletedSurvey {
        id: r.get("id"),
        survey_id: Some(survey_id),
        customer_id,
    };

    let mut answers = Vec::new();

    for (question_id, answer) in given_answers {
        let answer_r = query(
            "INSERT INTO given_answer (completed_survey_id, question_id, answer)
             VALUES ($1, $2, $3)
             RETURNING id;",
        )
        .bind(completed.id)
        .bind(question_id)
        .bind(answer)
        .fetch_one(&mut *tx)
        .await?;

        answers.push(GivenAnswer {
            id: answer_r.get("id"),
            completed_survey_id: completed.id,
            question_id: *question_id,
            answer: answer.clone(),
        });
    }

    tx.commit().await?;

    Ok((completed, answers))
}

pub async fn add_token(conn: &PgPool, token: &str) -> anyhow::Result<()> {
    query("INSERT INTO auth_token (token, created) VALUES ($1, NOW());")
        .bind(token)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn token_exists(conn: &PgPool, token: &str) -> anyhow::Result<bool> {
    let r = query("SELECT EXISTS(SELECT 1 FROM auth_token WHERE token=$1) AS known;")
        .bind(token)
        .fetch_one(conn)
        .await?;

    Ok(r.get("known"))
}
