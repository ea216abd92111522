use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::{renumbering_updates, Day, StartingLocationRequest};
use crate::routes::CurrentUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use time::Duration;
use uuid::Uuid;

/// POST /trips/{id}/days
///
/// Append a day after the current last one; the trip's end date follows.
pub async fn add_day(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(trip_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Day>)> {
    let trip = super::trips::load_owned_trip(&state, trip_id, user_id).await?;

    let days = queries::days_for_trip(&state.db_pool, trip_id).await?;
    let (day_number, date) = match days.last() {
        Some(last) => (last.day_number + 1, last.date.saturating_add(Duration::days(1))),
        None => (1, trip.start_date),
    };

    let day = Day {
        id: Uuid::new_v4(),
        trip_id,
        day_number,
        date,
        start_location: None,
        start_latitude: None,
        start_longitude: None,
        start_transport: None,
        start_travel_distance_km: None,
        start_travel_time_minutes: None,
        start_travel_time_source: Default::default(),
    };

    queries::append_day(&state.db_pool, &day, date).await?;
    tracing::info!(trip = %trip_id, day_number, "Added day");

    Ok((StatusCode::CREATED, Json(day)))
}

/// DELETE /days/{id}
///
/// Removing a day renumbers all later days down by one and moves the trip's
/// end date to the last remaining day. A trip always keeps at least one day.
pub async fn delete_day(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(day_id): Path<Uuid>,
) -> Result<StatusCode> {
    let day = queries::get_day(&state.db_pool, day_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Day not found".to_string()))?;
    super::trips::load_owned_trip(&state, day.trip_id, user_id).await?;

    let days = queries::days_for_trip(&state.db_pool, day.trip_id).await?;
    if days.len() <= 1 {
        return Err(AppError::Conflict(
            "Cannot delete a trip's only day".to_string(),
        ));
    }

    let remaining: Vec<Day> = days.into_iter().filter(|d| d.id != day_id).collect();
    let updates = renumbering_updates(&remaining, day.day_number);
    let new_end_date = remaining
        .last()
        .map(|d| d.date)
        .ok_or_else(|| AppError::Internal("Trip has no remaining days".to_string()))?;

    queries::delete_day_and_renumber(&state.db_pool, day_id, day.trip_id, &updates, new_end_date)
        .await?;
    tracing::info!(day = %day_id, trip = %day.trip_id, "Deleted day and renumbered");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /days/{id}/start
pub async fn set_starting_location(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(day_id): Path<Uuid>,
    Json(request): Json<StartingLocationRequest>,
) -> Result<Json<Day>> {
    let day = state
        .activities
        .set_starting_location(user_id, day_id, request)
        .await?;
    Ok(Json(day))
}

/// POST /days/{id}/recalculate
///
/// Full-day sweep over the starting-location edge and every consecutive
/// activity pair. Per-edge failures are tallied, not fatal.
pub async fn recalculate_day(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(day_id): Path<Uuid>,
) -> Result<Json<Value>> {
    let summary = state.recalc.recompute_day(user_id, day_id).await?;
    Ok(Json(json!({
        "updated": summary.updated,
        "failed": summary.failed,
        "summary": summary.describe(),
    })))
}
