//! Quillspace Playbooks Server
//!
//! An async Rust server that runs document-workflow automation playbooks:
//! managing definitions, dispatching application events to matching
//! playbooks, and recording run audit trails.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quillspace_playbooks::{
    config::{AppConfig, DatabaseConfig},
    db::create_pool,
    handlers,
    services::{DispatchService, PlaybookService, RunService},
    state::AppState,
};

/// Initialize tracing/logging.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quillspace_playbooks=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application router with all routes.
fn build_router(
    state: AppState,
    playbook_service: PlaybookService,
    run_service: RunService,
    dispatch_service: DispatchService,
) -> Router {
    // CORS configuration - the gateway terminates real origins, allow all here
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Health check routes (no org context required)
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .with_state(state);

    // Playbook management routes
    let playbook_routes = Router::new()
        .route("/api/playbooks", post(handlers::playbooks::create))
        .route("/api/playbooks", get(handlers::playbooks::list))
        .route(
            "/api/playbooks/templates",
            get(handlers::playbooks::templates),
        )
        .route("/api/playbooks/{id}", get(handlers::playbooks::get))
        .route("/api/playbooks/{id}", put(handlers::playbooks::update))
        .route(
            "/api/playbooks/{id}/status",
            post(handlers::playbooks::set_status),
        )
        .with_state(playbook_service);

    // Run routes
    let run_routes = Router::new()
        .route("/api/playbooks/run", post(handlers::runs::run))
        .route(
            "/api/playbooks/{id}/dry-run",
            get(handlers::runs::dry_run_preview),
        )
        .route("/api/playbooks/{id}/runs", get(handlers::runs::history))
        .route("/api/runs/{id}", get(handlers::runs::detail))
        .with_state(run_service);

    // Event dispatch routes
    let event_routes = Router::new()
        .route("/api/events", post(handlers::handle_event))
        .with_state(dispatch_service);

    // Combine all routes
    Router::new()
        .merge(health_routes)
        .merge(playbook_routes)
        .merge(run_routes)
        .merge(event_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Quillspace Playbooks"
    );

    // Load configuration
    let app_config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load app config, using defaults");
        AppConfig::default()
    });

    let db_config = DatabaseConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load database config, using defaults");
        DatabaseConfig::default()
    });

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        debug = app_config.debug,
        "Configuration loaded"
    );

    // Create the database connection pool. It connects lazily, so the
    // service comes up before PostgreSQL does; /api/health reports readiness.
    let db_pool = create_pool(&db_config);

    // Create services
    let playbook_service = PlaybookService::new(db_pool.clone());
    let run_service = RunService::new(db_pool.clone());
    let dispatch_service = DispatchService::new(db_pool.clone());

    // Create application state
    let state = AppState::new(db_pool, app_config.clone());

    // Build the router
    let app = build_router(state, playbook_service, run_service, dispatch_service);

    // Bind to address
    let addr: SocketAddr = app_config.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
