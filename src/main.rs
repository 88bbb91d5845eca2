use anyhow::Context;
use bankapi::{
    account::generators::RandomBankNumberGenerator,
    auth::TokenService,
    create_router, AccountRepository, AppConfig, AppState, InMemoryAccountRepository,
    PostgresAccountRepository,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set variables directly
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bankapi=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting bank account API");

    let config = AppConfig::from_env().context("loading configuration")?;

    let account_repository: Arc<dyn AccountRepository + Send + Sync> = match &config.database_url
    {
        Some(database_url) => {
            let repository =
                PostgresAccountRepository::connect(database_url, config.database_max_connections)
                    .await
                    .context("connecting to postgres")?;
            repository
                .create_account_table()
                .await
                .context("creating account table")?;
            Arc::new(repository)
        }
        None => {
            warn!("DATABASE_URL not set, accounts are kept in memory only");
            Arc::new(InMemoryAccountRepository::new())
        }
    };

    let app_state = AppState::new(
        account_repository,
        TokenService::new(config.token.clone()),
        Arc::new(RandomBankNumberGenerator::new()),
        config.bank_number_attempts,
    );

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!(listen_addr = %config.listen_addr, "Server listening");
    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
