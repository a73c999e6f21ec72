//! Photo-sharing API server.
//!
//! Serves the authentication, profile, and post endpoints backed by
//! PostgreSQL, with JWT access tokens and server-side refresh sessions.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use chrono::Duration;
use pico_args::Arguments;
use snapfeed::{
    auth::{AuthManager, RefreshTokenStore, TokenSigner},
    db::repository::{PgPostRepository, PgRefreshTokenRepository, PgUserRepository},
    db::Database,
    posts::PostManager,
    users::UserManager,
};
use tracing::{error, info};

use sf_server::api;
use sf_server::config::ServerConfig;
use sf_server::logging;
use sf_server::metrics;

const HELP: &str = "\
Run the photo-sharing API server

USAGE:
  sf_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:3001]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:3001)
  DATABASE_URL             PostgreSQL connection string (required)
  JWT_SECRET               Access token signing secret, 32+ chars (required)
  ACCESS_TOKEN_TTL_MINS    Access token lifetime in minutes [default: 15]
  REFRESH_TOKEN_TTL_DAYS   Refresh token lifetime in days [default: 7]
  CORS_ORIGIN              Allowed browser origin [default: permissive]
  METRICS_BIND             Prometheus exporter bind address [default: disabled]
  (See .env.example for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url).map_err(|e| {
        error!("Configuration error: {e}");
        anyhow::anyhow!("{e}")
    })?;

    info!("Starting API server at {}", config.bind);

    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;

    info!("Database connected successfully");

    let user_repository = Arc::new(PgUserRepository::new(db.pool().clone()));
    let refresh_repository = Arc::new(PgRefreshTokenRepository::new(db.pool().clone()));
    let post_repository = Arc::new(PgPostRepository::new(db.pool().clone()));

    let signer = TokenSigner::with_ttl(
        &config.security.jwt_secret,
        Duration::minutes(config.security.access_token_ttl_mins),
    );
    let refresh_store = RefreshTokenStore::with_ttl(
        refresh_repository,
        Duration::days(config.security.refresh_token_ttl_days),
    );

    let auth_manager = Arc::new(AuthManager::with_refresh_store(
        user_repository.clone(),
        refresh_store,
        signer,
    ));
    let user_manager = Arc::new(UserManager::new(user_repository));
    let post_manager = Arc::new(PostManager::new(post_repository));

    if let Some(metrics_bind) = config.metrics_bind {
        match metrics::init_metrics(metrics_bind) {
            Ok(()) => info!("Metrics exporter listening on {metrics_bind}"),
            Err(e) => error!("Failed to start metrics exporter: {e}"),
        }
    }

    let state = api::AppState {
        auth_manager,
        user_manager,
        post_manager,
        database: db,
    };

    let app = api::create_router(state, config.cors_origin.as_deref());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {e}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
