use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayplan::config::Config;
use wayplan::db::{ItineraryRepository, PgItineraryRepository};
use wayplan::services::activity_service::ActivityService;
use wayplan::services::directions::{GoogleDirectionsClient, RoutePlanner};
use wayplan::services::geocoding::{Geocoder, GoogleGeocoder};
use wayplan::services::recalculation::RecalculationEngine;
use wayplan::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayplan=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting wayplan API server");
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = wayplan::db::create_pool(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize collaborators and services
    let geocoder: Arc<dyn Geocoder> =
        Arc::new(GoogleGeocoder::new(config.google_maps_api_key.clone()));
    let planner: Arc<dyn RoutePlanner> = Arc::new(GoogleDirectionsClient::new(
        config.google_maps_api_key.clone(),
    ));
    let repo: Arc<dyn ItineraryRepository> = Arc::new(PgItineraryRepository::new(db_pool.clone()));

    let recalc = RecalculationEngine::new(repo.clone(), planner);
    let activities = ActivityService::new(
        repo,
        geocoder.clone(),
        recalc.clone(),
        config.recompute_on_delete,
    );

    // Create application state
    let state = Arc::new(AppState {
        db_pool,
        geocoder,
        activities,
        recalc,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", wayplan::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
