//! Teamboard reference service
//!
//! Serves the groups, members and tasks REST contract from SQLite.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use teamboard::config::ServiceConfig;
use teamboard::db::{self, Repository};
use teamboard::notify::Notifier;
use teamboard::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServiceConfig::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Teamboard service");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("UI origin: {}", config.ui_origin);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let groups = repo.list_groups().await?;
    tracing::info!("Database holds {} groups", groups.len());

    let notifier = Notifier::from_config(&config.smtp)?;
    if notifier.is_enabled() {
        tracing::info!("Assignment e-mails via {}:{}", config.smtp.host, config.smtp.port);
    }

    let app = create_router(AppState { repo, notifier }, &config.ui_origin);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
