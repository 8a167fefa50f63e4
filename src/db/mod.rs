pub mod model;
pub mod schema;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

// Bootstrap DDL, applied at startup. Deletion policy is deliberately
// asymmetric on completed_survey: the survey reference is nulled out so a
// submission record outlives its survey, while deleting a customer removes
// their submissions entirely.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS survey (
        id          SERIAL PRIMARY KEY,
        title       TEXT NOT NULL,
        start_date  TIMESTAMPTZ NOT NULL,
        finish_date TIMESTAMPTZ,
        description TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS question (
        id          SERIAL PRIMARY KEY,
        survey_id   INT NOT NULL REFERENCES survey(id) ON DELETE CASCADE,
        text        TEXT NOT NULL,
        answer_type TEXT NOT NULL DEFAULT 'free_text'
    );",
    "CREATE TABLE IF NOT EXISTS answer (
        id          SERIAL PRIMARY KEY,
        question_id INT NOT NULL REFERENCES question(id) ON DELETE CASCADE,
        text        TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS customer (
        id   SERIAL PRIMARY KEY,
        name TEXT NOT NULL DEFAULT ''
    );",
    "CREATE TABLE IF NOT EXISTS completed_survey (
        id          SERIAL PRIMARY KEY,
        survey_id   INT REFERENCES survey(id) ON DELETE SET NULL,
        customer_id INT NOT NULL REFERENCES customer(id) ON DELETE CASCADE
    );",
    "CREATE TABLE IF NOT EXISTS given_answer (
        id                  SERIAL PRIMARY KEY,
        completed_survey_id INT NOT NULL REFERENCES completed_survey(id) ON DELETE CASCADE,
        question_id         INT REFERENCES question(id) ON DELETE CASCADE,
        answer              TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS auth_token (
        token   TEXT PRIMARY KEY,
        created TIMESTAMPTZ NOT NULL
    );",
];

pub async fn connect(url: &str) -> anyhow::Result<PgPool> {
    let conn = PgPoolOptions::new().max_connections(5).connect(url).await?;

    Ok(conn)
}

pub async fn init_schema(conn: &PgPool) -> anyhow::Result<()> {
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(conn).await?;
    }

    Ok(())
}
