pub mod activity_service;
pub mod directions;
pub mod geocoding;
pub mod recalculation;

use crate::db::ItineraryRepository;
use crate::error::{AppError, Result};
use uuid::Uuid;

/// Reject the call unless `user_id` owns the trip the day belongs to.
/// Runs before any side effect of a mutating operation.
pub(crate) async fn require_day_owner(
    repo: &dyn ItineraryRepository,
    user_id: Uuid,
    day_id: Uuid,
) -> Result<()> {
    match repo.day_owner(day_id).await? {
        Some(owner) if owner == user_id => Ok(()),
        Some(_) => Err(AppError::Forbidden(
            "Day belongs to another user".to_string(),
        )),
        None => Err(AppError::NotFound("Day not found".to_string())),
    }
}

pub(crate) async fn require_activity_owner(
    repo: &dyn ItineraryRepository,
    user_id: Uuid,
    activity_id: Uuid,
) -> Result<()> {
    match repo.activity_owner(activity_id).await? {
        Some(owner) if owner == user_id => Ok(()),
        Some(_) => Err(AppError::Forbidden(
            "Activity belongs to another user".to_string(),
        )),
        None => Err(AppError::NotFound("Activity not found".to_string())),
    }
}
