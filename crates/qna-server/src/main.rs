mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qna_api::{AppStateInner, router};
use qna_core::ProvisionUsers;
use qna_db::{Database, SqliteUsers};

use crate::config::{Config, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env.local wins over .env; neither is required
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logging(&config)?;

    let db = Arc::new(
        Database::open(&config.db_path)
            .with_context(|| format!("opening database {}", config.db_path.display()))?,
    );
    info!(path = %config.db_path.display(), "Database ready");

    if !config.seed_users.is_empty() {
        let provision = ProvisionUsers::new(db.clone(), Arc::new(SqliteUsers), config.hash_passwords);
        let seeds = config.seed_users.clone();
        let created = tokio::task::spawn_blocking(move || {
            provision.execute(&CancellationToken::new(), &seeds)
        })
        .await??;
        info!(created, requested = config.seed_users.len(), "Provisioned users");
    }

    let app = router(Arc::new(AppStateInner::new(db)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Q&A server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = &config.log_level;
            EnvFilter::try_new(format!("qna={level},tower_http={level}"))
                .with_context(|| format!("QNA_LOG_LEVEL: invalid level {level}"))?
        }
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await;
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("Received Ctrl+C, shutting down...");
    }
}
