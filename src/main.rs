//! IncidentDesk Backend Server
//!
//! Incident tracking service with background auto-classification.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      INCIDENTDESK                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  Auth     │  │  Classification Worker  │ │
//! │  │  Gateway  │  │  Service  │  │  (Background Jobs)      │ │
//! │  │  (Axum)   │  │  (JWT)    │  │                         │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │                ┌─────────────┐                             │
//! │                │   SQLite    │                             │
//! │                └─────────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod classify;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classify::{Classifier, ClassifyQueue};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incidentdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("IncidentDesk server starting...");
    tracing::info!("Database: {}", config.database_url);

    if config.is_production() && config.jwt_secret.contains("change-in-production") {
        tracing::warn!("JWT_SECRET still has its development default; set a real secret");
    }

    // Initialize database pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Ensure the admin account exists
    db::seed_admin(&pool, &config.admin_email, &config.admin_password)
        .await
        .expect("Failed to seed admin user");

    // Start the classification worker
    let classifier = Arc::new(Classifier::from_config(&config));
    tracing::info!("Classification backend: {}", classifier.name());
    let classify_queue = classify::spawn_worker(
        pool.clone(),
        classifier,
        config.classify_queue_size,
        config.classify_concurrency,
    );

    // Build application state
    let state = AppState {
        pool,
        config: config.clone(),
        classify_queue,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub config: config::Config,
    pub classify_queue: ClassifyQueue,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/register", post(handlers::auth::register));

    // Incident and user routes (user JWT auth)
    let protected_routes = Router::new()
        // Incidents
        .route("/api/v1/incidents", post(handlers::incidents::create))
        .route("/api/v1/incidents", get(handlers::incidents::list))
        .route("/api/v1/incidents/:id", get(handlers::incidents::get))
        .route("/api/v1/incidents/:id", put(handlers::incidents::update))
        .route("/api/v1/incidents/:id", delete(handlers::incidents::delete))
        .route("/api/v1/incidents/:id/classify", post(handlers::incidents::classify))
        // Users
        .route("/api/v1/users", get(handlers::users::list))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
