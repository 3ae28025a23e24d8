use auth_service::{
    create_router, AppConfig, AppState, InMemoryUserRepository, PostgresUserRepository,
    UserRepository,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting authentication service");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    let user_repository: Arc<dyn UserRepository + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new().connect(database_url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Connected to PostgreSQL and applied migrations");
            Arc::new(PostgresUserRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, users are kept in memory and lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let app = create_router(AppState::from_config(&config, user_repository));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
