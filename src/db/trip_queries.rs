use crate::models::{Checklist, Day, Trip, TravelTimeSource};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    location: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    start_date: Date,
    end_date: Date,
    budget: f64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TripRow {
    fn into_trip(self) -> Trip {
        Trip {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DayRow {
    id: Uuid,
    trip_id: Uuid,
    day_number: i32,
    date: Date,
    start_location: Option<String>,
    start_latitude: Option<f64>,
    start_longitude: Option<f64>,
    start_transport: Option<String>,
    start_travel_distance_km: Option<f64>,
    start_travel_time_minutes: Option<i32>,
    start_travel_time_source: String,
}

impl DayRow {
    fn into_day(self) -> Day {
        let start_travel_time_source =
            self.start_travel_time_source.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Invalid travel time source '{}' on day {}, treating as unset",
                    self.start_travel_time_source,
                    self.id
                );
                TravelTimeSource::Unset
            });

        Day {
            id: self.id,
            trip_id: self.trip_id,
            day_number: self.day_number,
            date: self.date,
            start_location: self.start_location,
            start_latitude: self.start_latitude,
            start_longitude: self.start_longitude,
            start_transport: self.start_transport,
            start_travel_distance_km: self.start_travel_distance_km,
            start_travel_time_minutes: self.start_travel_time_minutes,
            start_travel_time_source,
        }
    }
}

const TRIP_COLUMNS: &str = "id, owner_id, title, location, latitude, longitude, \
                            start_date, end_date, budget, created_at, updated_at";

const DAY_COLUMNS: &str = "id, trip_id, day_number, date, start_location, start_latitude, \
                           start_longitude, start_transport, start_travel_distance_km, \
                           start_travel_time_minutes, start_travel_time_source";

/// Insert a trip, its pre-populated days, and its seed checklist in one
/// transaction.
pub async fn create_trip(
    pool: &PgPool,
    trip: &Trip,
    days: &[Day],
    checklist: &Checklist,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO trips (id, owner_id, title, location, latitude, longitude, \
         start_date, end_date, budget, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(trip.id)
    .bind(trip.owner_id)
    .bind(&trip.title)
    .bind(&trip.location)
    .bind(trip.latitude)
    .bind(trip.longitude)
    .bind(trip.start_date)
    .bind(trip.end_date)
    .bind(trip.budget)
    .bind(trip.created_at)
    .bind(trip.updated_at)
    .execute(&mut *tx)
    .await?;

    for day in days {
        sqlx::query("INSERT INTO days (id, trip_id, day_number, date) VALUES ($1, $2, $3, $4)")
            .bind(day.id)
            .bind(day.trip_id)
            .bind(day.day_number)
            .bind(day.date)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("INSERT INTO checklists (id, trip_id, title, shared) VALUES ($1, $2, $3, $4)")
        .bind(checklist.id)
        .bind(checklist.trip_id)
        .bind(&checklist.title)
        .bind(checklist.shared)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

pub async fn list_trips(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Trip>, sqlx::Error> {
    let sql = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE owner_id = $1 ORDER BY updated_at DESC");
    let rows = sqlx::query_as::<_, TripRow>(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.into_trip()).collect())
}

pub async fn get_trip(pool: &PgPool, id: Uuid) -> Result<Option<Trip>, sqlx::Error> {
    let sql = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1");
    let row = sqlx::query_as::<_, TripRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.into_trip()))
}

pub async fn trip_owner(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT owner_id FROM trips WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_trip(pool: &PgPool, trip: &Trip) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE trips SET title = $2, location = $3, latitude = $4, longitude = $5, \
         budget = $6, updated_at = now() WHERE id = $1",
    )
    .bind(trip.id)
    .bind(&trip.title)
    .bind(&trip.location)
    .bind(trip.latitude)
    .bind(trip.longitude)
    .bind(trip.budget)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_trip(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM trips WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn days_for_trip(pool: &PgPool, trip_id: Uuid) -> Result<Vec<Day>, sqlx::Error> {
    let sql = format!("SELECT {DAY_COLUMNS} FROM days WHERE trip_id = $1 ORDER BY day_number");
    let rows = sqlx::query_as::<_, DayRow>(&sql)
        .bind(trip_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.into_day()).collect())
}

pub async fn get_day(pool: &PgPool, id: Uuid) -> Result<Option<Day>, sqlx::Error> {
    let sql = format!("SELECT {DAY_COLUMNS} FROM days WHERE id = $1");
    let row = sqlx::query_as::<_, DayRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.into_day()))
}

pub async fn day_owner(pool: &PgPool, day_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT t.owner_id FROM days d JOIN trips t ON t.id = d.trip_id WHERE d.id = $1",
    )
    .bind(day_id)
    .fetch_optional(pool)
    .await
}

/// Append a day and move the trip's end date with it.
pub async fn append_day(pool: &PgPool, day: &Day, new_end_date: Date) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO days (id, trip_id, day_number, date) VALUES ($1, $2, $3, $4)")
        .bind(day.id)
        .bind(day.trip_id)
        .bind(day.day_number)
        .bind(day.date)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE trips SET end_date = $2, updated_at = now() WHERE id = $1")
        .bind(day.trip_id)
        .bind(new_end_date)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

/// Delete a day, shift the following day numbers down, and move the trip's
/// end date to the last remaining day. One transaction; the deferred unique
/// constraint tolerates the transient number collisions.
pub async fn delete_day_and_renumber(
    pool: &PgPool,
    day_id: Uuid,
    trip_id: Uuid,
    renumbering: &[(Uuid, i32)],
    new_end_date: Date,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM days WHERE id = $1")
        .bind(day_id)
        .execute(&mut *tx)
        .await?;

    for (id, number) in renumbering {
        sqlx::query("UPDATE days SET day_number = $2 WHERE id = $1")
            .bind(id)
            .bind(number)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("UPDATE trips SET end_date = $2, updated_at = now() WHERE id = $1")
        .bind(trip_id)
        .bind(new_end_date)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

/// Persist a day's starting-location fields (not the derived travel fields).
pub async fn update_day_start(pool: &PgPool, day: &Day) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE days SET start_location = $2, start_latitude = $3, start_longitude = $4, \
         start_transport = $5 WHERE id = $1",
    )
    .bind(day.id)
    .bind(&day.start_location)
    .bind(day.start_latitude)
    .bind(day.start_longitude)
    .bind(&day.start_transport)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_day_start_travel(
    pool: &PgPool,
    day_id: Uuid,
    distance_km: f64,
    time: Option<(i32, TravelTimeSource)>,
) -> Result<(), sqlx::Error> {
    match time {
        Some((minutes, source)) => {
            sqlx::query(
                "UPDATE days SET start_travel_distance_km = $2, start_travel_time_minutes = $3, \
                 start_travel_time_source = $4 WHERE id = $1",
            )
            .bind(day_id)
            .bind(distance_km)
            .bind(minutes)
            .bind(source.to_string())
            .execute(pool)
            .await?;
        }
        None => {
            sqlx::query("UPDATE days SET start_travel_distance_km = $2 WHERE id = $1")
                .bind(day_id)
                .bind(distance_km)
                .execute(pool)
                .await?;
        }
    }
    Ok(())
}
