use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityUpdateRequest, NewActivityRequest, RouteSelectionRequest,
};
use crate::routes::CurrentUser;
use crate::services::recalculation::RouteChoices;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// POST /days/{id}/activities
pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(day_id): Path<Uuid>,
    Json(request): Json<NewActivityRequest>,
) -> Result<(StatusCode, Json<Activity>)> {
    request.validate().map_err(AppError::InvalidRequest)?;
    let activity = state.activities.append(user_id, day_id, request).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

/// PATCH /activities/{id}
pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<ActivityUpdateRequest>,
) -> Result<Json<Activity>> {
    let activity = state
        .activities
        .update(user_id, activity_id, request)
        .await?;
    Ok(Json(activity))
}

/// DELETE /activities/{id}
pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(activity_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.activities.remove(user_id, activity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /activities/{id}/route-alternatives
///
/// The currently applied route plus the alternatives the directions service
/// offers for this edge.
pub async fn route_alternatives(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<RouteChoices>> {
    let choices = state.recalc.list_alternatives(user_id, activity_id).await?;
    Ok(Json(choices))
}

/// PUT /activities/{id}/route
///
/// Apply a route picked from the alternatives; pins the travel time.
pub async fn select_route(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<RouteSelectionRequest>,
) -> Result<StatusCode> {
    request.validate().map_err(AppError::InvalidRequest)?;
    state
        .recalc
        .select_alternative(
            user_id,
            activity_id,
            request.distance_km,
            request.duration_minutes,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
