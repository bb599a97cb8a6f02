//! Barbershop Server
//!
//! Booking and back-office REST API for a single-chair barbershop.

use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barbershop_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("barbershop_server={},tower_http=debug", config.logging.level).into());

    let json_logs = config.logging.format == "json";
    tracing_subscriber::registry()
        .with(filter)
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting Barbershop Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Shop hours and timezone offset are validated here, before any request is served
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config)
        .map_err(|e| anyhow::anyhow!("Failed to create services: {}", e))?;

    tracing::info!(
        "Shop hours {}-{}, {} minute units",
        config.shop.opening_time,
        config.shop.closing_time,
        config.shop.slot_granularity_minutes
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Catalog
        .route("/services", get(api::catalog::list_services))
        .route("/products", get(api::catalog::list_products))
        // Availability
        .route("/availability/days", get(api::availability::month_days))
        .route("/availability/slots", get(api::availability::day_slots))
        // Appointments
        .route(
            "/appointments",
            get(api::appointments::list_appointments).post(api::appointments::create_appointment),
        )
        .route("/appointments/:id/confirm", post(api::appointments::confirm_appointment))
        .route("/appointments/:id/cancel", post(api::appointments::cancel_appointment))
        // Profile
        .route("/me", get(api::clients::get_me).put(api::clients::update_me))
        .route("/me/appointments", get(api::appointments::my_appointments))
        .route("/clients", get(api::clients::list_clients))
        // Time blocks
        .route(
            "/time-blocks",
            get(api::time_blocks::list_time_blocks).post(api::time_blocks::create_time_block),
        )
        .route("/time-blocks/:id", delete(api::time_blocks::delete_time_block))
        // Reports
        .route("/reports/revenue", get(api::reports::revenue_report))
        .route("/reports/dashboard", get(api::reports::dashboard))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
