use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

mod activity_queries;
mod backfill_queries;
mod checklist_queries;
pub mod itinerary_repository;
mod trip_queries;

/// Re-export all query functions under `queries`
pub mod queries {
    pub use super::activity_queries::*;
    pub use super::backfill_queries::*;
    pub use super::checklist_queries::*;
    pub use super::trip_queries::*;
}

pub use itinerary_repository::{ItineraryRepository, PgItineraryRepository, TravelWrite};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
