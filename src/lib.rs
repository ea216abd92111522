// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

// App state for sharing across the application
use services::activity_service::ActivityService;
use services::geocoding::Geocoder;
use services::recalculation::RecalculationEngine;
use sqlx::PgPool;
use std::sync::Arc;

pub struct AppState {
    pub db_pool: PgPool,
    pub geocoder: Arc<dyn Geocoder>,
    pub activities: ActivityService,
    pub recalc: RecalculationEngine,
}
