//! Maintenance tool that geocodes records created before coordinates were
//! captured: activities and trips carrying location text but no latitude.
//!
//! ```text
//! GOOGLE_MAPS_API_KEY=... DATABASE_URL=... cargo run --bin geocode_backfill
//! ```
//!
//! Requests are spaced out by a fixed delay to respect the geocoding
//! service's rate limit.

use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayplan::config::Config;
use wayplan::db::queries;
use wayplan::services::geocoding::{Geocoder, GoogleGeocoder};

struct BackfillTally {
    geocoded: usize,
    failed: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayplan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;
    let pool = wayplan::db::create_pool(&config.database_url).await?;
    let geocoder = GoogleGeocoder::new(config.google_maps_api_key.clone());
    let delay = Duration::from_millis(config.geocode_backfill_delay_ms);

    tracing::info!("Starting geocoding backfill");

    let activities = queries::activities_missing_coordinates(&pool).await?;
    tracing::info!("Found {} activities to geocode", activities.len());

    let mut activity_tally = BackfillTally {
        geocoded: 0,
        failed: 0,
    };
    for (id, location) in &activities {
        match geocoder.geocode(location).await {
            Some(coords) => {
                queries::set_activity_coordinates(&pool, *id, coords.lat, coords.lng).await?;
                tracing::info!(activity = %id, "Geocoded \"{}\" -> {}", location, coords);
                activity_tally.geocoded += 1;
            }
            None => {
                tracing::warn!(activity = %id, "Failed to geocode \"{}\"", location);
                activity_tally.failed += 1;
            }
        }
        tokio::time::sleep(delay).await;
    }

    let trips = queries::trips_missing_coordinates(&pool).await?;
    tracing::info!("Found {} trips to geocode", trips.len());

    let mut trip_tally = BackfillTally {
        geocoded: 0,
        failed: 0,
    };
    for (id, location) in &trips {
        match geocoder.geocode(location).await {
            Some(coords) => {
                queries::set_trip_coordinates(&pool, *id, coords.lat, coords.lng).await?;
                tracing::info!(trip = %id, "Geocoded \"{}\" -> {}", location, coords);
                trip_tally.geocoded += 1;
            }
            None => {
                tracing::warn!(trip = %id, "Failed to geocode \"{}\"", location);
                trip_tally.failed += 1;
            }
        }
        tokio::time::sleep(delay).await;
    }

    tracing::info!(
        "Backfill complete: activities {}/{} geocoded, trips {}/{} geocoded",
        activity_tally.geocoded,
        activities.len(),
        trip_tally.geocoded,
        trips.len()
    );
    if activity_tally.failed + trip_tally.failed > 0 {
        tracing::warn!(
            "{} lookup(s) failed; re-run after fixing the addresses",
            activity_tally.failed + trip_tally.failed
        );
    }

    Ok(())
}
