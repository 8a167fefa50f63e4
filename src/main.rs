use survey_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survey_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::load()?;

    survey_api::start_server(config).await
}
