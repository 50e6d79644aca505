//! Agora API Server
//!
//! Main entry point for the Agora backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agora_api::{AppState, RouterOptions, create_router};
use agora_core::auth::PasswordHasher;
use agora_core::health::HealthCheck;
use agora_core::storage::{StorageConfig, StorageService};
use agora_db::migration::{Migrator, MigratorTrait};
use agora_db::{DatabaseHealth, PostRepository, UserRepository, connect};
use agora_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!("Connected to database");

    if config.database.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("Failed to run migrations")?;
        info!("Migrations applied");
    }

    let jwt_service = Arc::new(JwtService::new(JwtConfig::from(&config.jwt)));
    let hasher = PasswordHasher::from_config(&config.password)?;

    let storage = Arc::new(StorageService::from_config(StorageConfig::from(
        &config.storage,
    ))?);
    info!(provider = storage.provider_name(), "Object storage configured");

    let database_check: Arc<dyn HealthCheck> = Arc::new(DatabaseHealth::new(db.clone()));
    let storage_check: Arc<dyn HealthCheck> = storage.clone();

    let state = AppState::new(
        Arc::new(UserRepository::new(db.clone())),
        Arc::new(PostRepository::new(db.clone())),
        storage,
        jwt_service,
        hasher,
    )
    .with_health_checks(vec![database_check, storage_check]);
    let app = create_router(state, &RouterOptions::from_config(&config));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
