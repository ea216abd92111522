use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::{
    day_dates, Checklist, ChecklistWithItems, Day, DayWithActivities, NewTripRequest, Trip,
    TripDetails, TripUpdateRequest,
};
use crate::routes::CurrentUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// POST /trips
///
/// Create a trip with one pre-populated day per date in the inclusive
/// start-to-end span and a seed packing checklist. The trip location is
/// geocoded best-effort; a failed lookup leaves the coordinates empty.
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<NewTripRequest>,
) -> Result<(StatusCode, Json<Trip>)> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let coordinates = match request.location.as_deref() {
        Some(location) if !location.trim().is_empty() => state.geocoder.geocode(location).await,
        _ => None,
    };

    let now = OffsetDateTime::now_utc();
    let trip = Trip {
        id: Uuid::new_v4(),
        owner_id: user_id,
        title: request.title,
        location: request.location.filter(|l| !l.trim().is_empty()),
        latitude: coordinates.map(|c| c.lat),
        longitude: coordinates.map(|c| c.lng),
        start_date: request.start_date,
        end_date: request.end_date,
        budget: request.budget.unwrap_or(0.0),
        created_at: now,
        updated_at: now,
    };

    let days: Vec<Day> = day_dates(trip.start_date, trip.end_date)
        .into_iter()
        .enumerate()
        .map(|(i, date)| Day {
            id: Uuid::new_v4(),
            trip_id: trip.id,
            day_number: i as i32 + 1,
            date,
            start_location: None,
            start_latitude: None,
            start_longitude: None,
            start_transport: None,
            start_travel_distance_km: None,
            start_travel_time_minutes: None,
            start_travel_time_source: Default::default(),
        })
        .collect();

    let checklist = Checklist {
        id: Uuid::new_v4(),
        trip_id: trip.id,
        title: "Packing List".to_string(),
        shared: true,
    };

    queries::create_trip(&state.db_pool, &trip, &days, &checklist).await?;
    tracing::info!(trip = %trip.id, days = days.len(), "Created trip");

    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /trips
pub async fn list_trips(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Trip>>> {
    let trips = queries::list_trips(&state.db_pool, user_id).await?;
    Ok(Json(trips))
}

/// GET /trips/{id}
///
/// The full trip: days with their ordered activities, checklists with
/// their items.
pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripDetails>> {
    let trip = load_owned_trip(&state, trip_id, user_id).await?;

    let mut days = Vec::new();
    for day in queries::days_for_trip(&state.db_pool, trip_id).await? {
        let activities = queries::activities_for_day(&state.db_pool, day.id).await?;
        days.push(DayWithActivities { day, activities });
    }

    let mut checklists = Vec::new();
    for checklist in queries::checklists_for_trip(&state.db_pool, trip_id).await? {
        let items = queries::items_for_checklist(&state.db_pool, checklist.id).await?;
        checklists.push(ChecklistWithItems { checklist, items });
    }

    Ok(Json(TripDetails {
        trip,
        days,
        checklists,
    }))
}

/// PATCH /trips/{id}
///
/// A changed location text is re-geocoded; a failed lookup or an emptied
/// location clears the trip coordinates.
pub async fn update_trip(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(trip_id): Path<Uuid>,
    Json(request): Json<TripUpdateRequest>,
) -> Result<Json<Trip>> {
    let mut trip = load_owned_trip(&state, trip_id, user_id).await?;

    if let Some(title) = request.title {
        if title.trim().is_empty() {
            return Err(AppError::InvalidRequest("title must not be empty".to_string()));
        }
        trip.title = title;
    }
    if let Some(budget) = request.budget {
        trip.budget = budget;
    }

    if let Some(location) = request.location {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            trip.location = None;
            trip.latitude = None;
            trip.longitude = None;
        } else if trip.location.as_deref() != Some(trimmed) {
            let coordinates = state.geocoder.geocode(trimmed).await;
            trip.location = Some(trimmed.to_string());
            trip.latitude = coordinates.map(|c| c.lat);
            trip.longitude = coordinates.map(|c| c.lng);
        }
    }

    queries::update_trip(&state.db_pool, &trip).await?;
    Ok(Json(trip))
}

/// DELETE /trips/{id} - cascades to days, activities, and checklists
pub async fn delete_trip(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(trip_id): Path<Uuid>,
) -> Result<StatusCode> {
    load_owned_trip(&state, trip_id, user_id).await?;
    queries::delete_trip(&state.db_pool, trip_id).await?;
    tracing::info!(trip = %trip_id, "Deleted trip");
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a trip, presenting foreign trips as absent rather than forbidden.
pub(super) async fn load_owned_trip(
    state: &AppState,
    trip_id: Uuid,
    user_id: Uuid,
) -> Result<Trip> {
    let trip = queries::get_trip(&state.db_pool, trip_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;
    if trip.owner_id != user_id {
        return Err(AppError::NotFound("Trip not found".to_string()));
    }
    Ok(trip)
}
