pub mod activities;
pub mod checklists;
pub mod days;
pub mod debug;
pub mod trips;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// Caller identity, resolved upstream by the session layer and forwarded as
/// the `X-User-Id` header. A missing or malformed header rejects the request
/// before any handler runs.
pub struct CurrentUser(pub Uuid);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .ok_or(AppError::Unauthenticated)?;
        let value = header.to_str().map_err(|_| AppError::Unauthenticated)?;
        let user_id = Uuid::parse_str(value).map_err(|_| AppError::Unauthenticated)?;
        Ok(CurrentUser(user_id))
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/trips", post(trips::create_trip).get(trips::list_trips))
        .route(
            "/trips/{id}",
            get(trips::get_trip)
                .patch(trips::update_trip)
                .delete(trips::delete_trip),
        )
        .route("/trips/{id}/days", post(days::add_day))
        .route("/trips/{id}/checklists", post(checklists::create_checklist))
        .route("/days/{id}", delete(days::delete_day))
        .route("/days/{id}/start", put(days::set_starting_location))
        .route("/days/{id}/recalculate", post(days::recalculate_day))
        .route("/days/{id}/activities", post(activities::create_activity))
        .route(
            "/activities/{id}",
            patch(activities::update_activity).delete(activities::delete_activity),
        )
        .route(
            "/activities/{id}/route-alternatives",
            get(activities::route_alternatives),
        )
        .route("/activities/{id}/route", put(activities::select_route))
        .route(
            "/checklists/{id}",
            delete(checklists::delete_checklist),
        )
        .route("/checklists/{id}/items", post(checklists::add_item))
        .route(
            "/checklist-items/{id}",
            patch(checklists::update_item).delete(checklists::delete_item),
        )
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
