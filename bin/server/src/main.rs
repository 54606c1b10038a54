use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypost_server::{
    auth::{self, AppState, OidcClient, db::SessionRepository},
    config::ServerConfig,
    routes,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("failed to run migrations");

    // Cleanup expired sessions on startup
    let session_repo = SessionRepository::new(db_pool.clone());
    match session_repo.delete_expired().await {
        Ok(count) if count > 0 => {
            tracing::info!(
                deleted_sessions = count,
                "Cleaned up expired sessions on startup"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Failed to cleanup expired sessions on startup");
        }
    }

    // Spawn periodic session cleanup task
    let cleanup_pool = db_pool.clone();
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            let repo = SessionRepository::new(cleanup_pool.clone());
            match repo.delete_expired().await {
                Ok(count) if count > 0 => {
                    tracing::debug!(deleted_sessions = count, "Periodic session cleanup");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to cleanup expired sessions");
                }
            }
        }
    });

    // Initialize OIDC client
    tracing::info!("Discovering OIDC provider...");
    let oidc_client = OidcClient::discover(config.oidc)
        .await
        .expect("failed to discover OIDC provider");

    // Create application state
    let app_state = Arc::new(AppState::new(db_pool, oidc_client, config.session));

    let app = Router::new()
        // Auth routes
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", get(auth::logout))
        // API routes
        .nest("/api", routes::api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal"),
    }
}
