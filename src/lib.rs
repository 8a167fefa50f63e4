//! Survey-management REST API.
//!
//! Administrators create surveys with questions and predefined answer
//! choices; customers submit completed surveys with their answers. Backed by
//! Postgres; the only multi-row write (the survey commit) runs inside a
//! single transaction.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repr;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::api::AppState;
use crate::config::Config;

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let conn = db::connect(&config.database_url).await?;
    db::init_schema(&conn).await?;

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        conn,
        config: Arc::new(config),
    };

    let router = api::create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("survey API listening on {}", bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
