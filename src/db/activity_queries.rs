use crate::models::{Activity, TravelTimeSource};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    day_id: Uuid,
    position: i32,
    title: String,
    description: Option<String>,
    location: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    scheduled_time: Option<String>,
    duration_minutes: i32,
    cost: f64,
    icon: String,
    color: String,
    transport: Option<String>,
    travel_distance_km: Option<f64>,
    travel_time_minutes: Option<i32>,
    travel_time_source: String,
}

impl ActivityRow {
    fn into_activity(self) -> Activity {
        let travel_time_source = self.travel_time_source.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid travel time source '{}' on activity {}, treating as unset",
                self.travel_time_source,
                self.id
            );
            TravelTimeSource::Unset
        });

        Activity {
            id: self.id,
            day_id: self.day_id,
            position: self.position,
            title: self.title,
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            scheduled_time: self.scheduled_time,
            duration_minutes: self.duration_minutes,
            cost: self.cost,
            icon: self.icon,
            color: self.color,
            transport: self.transport,
            travel_distance_km: self.travel_distance_km,
            travel_time_minutes: self.travel_time_minutes,
            travel_time_source,
        }
    }
}

const ACTIVITY_COLUMNS: &str = "id, day_id, position, title, description, location, latitude, \
                                longitude, scheduled_time, duration_minutes, cost, icon, color, \
                                transport, travel_distance_km, travel_time_minutes, travel_time_source";

pub async fn activities_for_day(pool: &PgPool, day_id: Uuid) -> Result<Vec<Activity>, sqlx::Error> {
    let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE day_id = $1 ORDER BY position");
    let rows = sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(day_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.into_activity()).collect())
}

pub async fn get_activity(pool: &PgPool, id: Uuid) -> Result<Option<Activity>, sqlx::Error> {
    let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1");
    let row = sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.into_activity()))
}

pub async fn activity_owner(pool: &PgPool, activity_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT t.owner_id FROM activities a \
         JOIN days d ON d.id = a.day_id \
         JOIN trips t ON t.id = d.trip_id \
         WHERE a.id = $1",
    )
    .bind(activity_id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_activity(pool: &PgPool, activity: &Activity) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO activities (id, day_id, position, title, description, location, latitude, \
         longitude, scheduled_time, duration_minutes, cost, icon, color, transport, \
         travel_distance_km, travel_time_minutes, travel_time_source) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
    )
    .bind(activity.id)
    .bind(activity.day_id)
    .bind(activity.position)
    .bind(&activity.title)
    .bind(&activity.description)
    .bind(&activity.location)
    .bind(activity.latitude)
    .bind(activity.longitude)
    .bind(&activity.scheduled_time)
    .bind(activity.duration_minutes)
    .bind(activity.cost)
    .bind(&activity.icon)
    .bind(&activity.color)
    .bind(&activity.transport)
    .bind(activity.travel_distance_km)
    .bind(activity.travel_time_minutes)
    .bind(activity.travel_time_source.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

/// Persist every editable field of an activity (position is append-only and
/// never rewritten).
pub async fn update_activity(pool: &PgPool, activity: &Activity) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE activities SET title = $2, description = $3, location = $4, latitude = $5, \
         longitude = $6, scheduled_time = $7, duration_minutes = $8, cost = $9, icon = $10, \
         color = $11, transport = $12, travel_distance_km = $13, travel_time_minutes = $14, \
         travel_time_source = $15 WHERE id = $1",
    )
    .bind(activity.id)
    .bind(&activity.title)
    .bind(&activity.description)
    .bind(&activity.location)
    .bind(activity.latitude)
    .bind(activity.longitude)
    .bind(&activity.scheduled_time)
    .bind(activity.duration_minutes)
    .bind(activity.cost)
    .bind(&activity.icon)
    .bind(&activity.color)
    .bind(&activity.transport)
    .bind(activity.travel_distance_km)
    .bind(activity.travel_time_minutes)
    .bind(activity.travel_time_source.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_activity(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM activities WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn set_activity_travel(
    pool: &PgPool,
    id: Uuid,
    distance_km: f64,
    time: Option<(i32, TravelTimeSource)>,
) -> Result<(), sqlx::Error> {
    match time {
        Some((minutes, source)) => {
            sqlx::query(
                "UPDATE activities SET travel_distance_km = $2, travel_time_minutes = $3, \
                 travel_time_source = $4 WHERE id = $1",
            )
            .bind(id)
            .bind(distance_km)
            .bind(minutes)
            .bind(source.to_string())
            .execute(pool)
            .await?;
        }
        None => {
            sqlx::query("UPDATE activities SET travel_distance_km = $2 WHERE id = $1")
                .bind(id)
                .bind(distance_km)
                .execute(pool)
                .await?;
        }
    }
    Ok(())
}
