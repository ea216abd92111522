//! Queries for the geocoding backfill: records that carry location text but
//! were never geocoded.

use sqlx::PgPool;
use uuid::Uuid;

pub async fn activities_missing_coordinates(
    pool: &PgPool,
) -> Result<Vec<(Uuid, String)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, location FROM activities \
         WHERE location IS NOT NULL AND location <> '' AND latitude IS NULL \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn trips_missing_coordinates(pool: &PgPool) -> Result<Vec<(Uuid, String)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, location FROM trips \
         WHERE location IS NOT NULL AND location <> '' AND latitude IS NULL \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn set_activity_coordinates(
    pool: &PgPool,
    id: Uuid,
    lat: f64,
    lng: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE activities SET latitude = $2, longitude = $3 WHERE id = $1")
        .bind(id)
        .bind(lat)
        .bind(lng)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_trip_coordinates(
    pool: &PgPool,
    id: Uuid,
    lat: f64,
    lng: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE trips SET latitude = $2, longitude = $3 WHERE id = $1")
        .bind(id)
        .bind(lat)
        .bind(lng)
        .execute(pool)
        .await?;
    Ok(())
}
