use std::env;

use anyhow::Context;

/// Environment-driven configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Config> {
        Ok(Config {
            database_url: env::var("SURVEY_DATABASE_URL")
                .context("expected SURVEY_DATABASE_URL")?,
            bind_addr: env::var("SURVEY_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_owned()),
            admin_username: env::var("SURVEY_ADMIN_USERNAME")
                .context("expected SURVEY_ADMIN_USERNAME")?,
            admin_password: env::var("SURVEY_ADMIN_PASSWORD")
                .context("expected SURVEY_ADMIN_PASSWORD")?,
        })
    }
}
