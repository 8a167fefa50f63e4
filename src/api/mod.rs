//! Resource handlers and router assembly.
//!
//! URLs name resources (plural for collections, plural/id for one instance);
//! the HTTP method is the verb. Nested resources live under their parent.

pub mod answers;
pub mod authentication;
pub mod completed;
pub mod customers;
pub mod questions;
pub mod surveys;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub conn: PgPool,
    pub config: Arc<Config>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/authentication/", post(authentication::obtain_token))
        .route("/surveys/", get(surveys::list).post(surveys::create))
        .route(
            "/surveys/:survey_id/",
            get(surveys::detail).put(surveys::edit).delete(surveys::delete),
        )
        .route(
            "/surveys/:survey_id/questions/",
            get(questions::list).post(questions::create),
        )
        .route(
            "/surveys/:survey_id/questions/:question_id/",
            get(questions::detail)
                .put(questions::edit)
                .delete(questions::delete),
        )
        .route(
            "/surveys/:survey_id/questions/:question_id/answers/",
            get(answers::list).post(answers::create),
        )
        .route(
            "/surveys/:survey_id/questions/:question_id/answers/:answer_id/",
            get(answers::detail).put(answers::edit).delete(answers::delete),
        )
        .route("/customers/", get(customers::list).post(customers::create))
        .route(
            "/customers/:customer_id/",
            get(customers::detail)
                .put(customers::edit)
                .delete(customers::delete),
        )
        .route(
            "/customers/:customer_id/surveys/",
            get(completed::list).post(completed::commit),
        )
        .route(
            "/customers/:customer_id/surveys/:completed_id/",
            get(completed::detail),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Route registration panics on malformed or conflicting paths, so simply
    // building the router validates the whole table.
    #[tokio::test]
    async fn router_builds() {
        let state = AppState {
            conn: PgPool::connect_lazy("postgres://localhost/survey").unwrap(),
            config: Arc::new(Config {
                database_url: "postgres://localhost/survey".to_owned(),
                bind_addr: "127.0.0.1:0".to_owned(),
                admin_username: "admin".to_owned(),
                admin_password: "secret".to_owned(),
            }),
        };

        let _router = create_router(state);
    }
}
