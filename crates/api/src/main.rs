use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use musiclib_api::config::ServerConfig;
use musiclib_api::router::build_app_router;
use musiclib_api::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    load_env_file();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            // Tracing is not initialised yet; the level lives in this config.
            eprintln!("Invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Server failed");
            ExitCode::FAILURE
        }
    }
}

/// Load `.env`, or the file named by `ENV_FILE`. A missing file is not an error.
fn load_env_file() {
    match std::env::var("ENV_FILE") {
        Ok(path) => {
            if let Err(err) = dotenvy::from_path(&path) {
                eprintln!("Could not load env file {path}: {err}");
            }
        }
        Err(_) => {
            dotenvy::dotenv().ok();
        }
    }
}

/// Startup errors that abort the process.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] musiclib_api::config::ConfigError),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

async fn run(config: ServerConfig) -> Result<(), StartupError> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        app_env = ?config.app_env,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool =
        musiclib_db::create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connection pool created"
    );

    musiclib_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    musiclib_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- App state ---
    let addr = config.bind_addr()?;
    let shutdown_grace = Duration::from_secs(config.shutdown_timeout_secs);
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    });
    let mut server = tokio::spawn(async move { server.await });

    let finished = tokio::select! {
        joined = &mut server => Some(flatten_join(joined)),
        _ = signalled_rx => None,
    };

    // After the signal, in-flight requests get `shutdown_grace` to finish.
    let result = match finished {
        Some(result) => result,
        None => match tokio::time::timeout(shutdown_grace, &mut server).await {
            Ok(joined) => flatten_join(joined),
            Err(_) => {
                tracing::warn!(?shutdown_grace, "Grace period elapsed, aborting open requests");
                server.abort();
                Ok(())
            }
        },
    };

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, closing database pool");
    pool.close().await;

    tracing::info!("Graceful shutdown complete");
    result
}

fn flatten_join(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), StartupError> {
    match joined {
        Ok(result) => result.map_err(StartupError::from),
        Err(join_err) => Err(StartupError::Io(std::io::Error::other(join_err))),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
