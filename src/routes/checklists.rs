use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::{
    Checklist, ChecklistItem, ChecklistItemUpdateRequest, NewChecklistItemRequest,
    NewChecklistRequest,
};
use crate::routes::CurrentUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// POST /trips/{id}/checklists
pub async fn create_checklist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(trip_id): Path<Uuid>,
    Json(request): Json<NewChecklistRequest>,
) -> Result<(StatusCode, Json<Checklist>)> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("title must not be empty".to_string()));
    }
    super::trips::load_owned_trip(&state, trip_id, user_id).await?;

    let checklist = Checklist {
        id: Uuid::new_v4(),
        trip_id,
        title: request.title,
        shared: request.shared,
    };
    queries::insert_checklist(&state.db_pool, &checklist).await?;

    Ok((StatusCode::CREATED, Json(checklist)))
}

/// DELETE /checklists/{id}
pub async fn delete_checklist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(checklist_id): Path<Uuid>,
) -> Result<StatusCode> {
    require_checklist_owner(&state, checklist_id, user_id).await?;
    queries::delete_checklist(&state.db_pool, checklist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /checklists/{id}/items
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(checklist_id): Path<Uuid>,
    Json(request): Json<NewChecklistItemRequest>,
) -> Result<(StatusCode, Json<ChecklistItem>)> {
    if request.label.trim().is_empty() {
        return Err(AppError::InvalidRequest("label must not be empty".to_string()));
    }
    require_checklist_owner(&state, checklist_id, user_id).await?;

    let item = ChecklistItem {
        id: Uuid::new_v4(),
        checklist_id,
        label: request.label,
        done: false,
        position: 0, // assigned by the append query
    };
    queries::append_item(&state.db_pool, &item).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /checklist-items/{id}
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(request): Json<ChecklistItemUpdateRequest>,
) -> Result<StatusCode> {
    require_item_owner(&state, item_id, user_id).await?;
    let updated = queries::update_item(
        &state.db_pool,
        item_id,
        request.label.as_deref(),
        request.done,
    )
    .await?;
    if updated == 0 {
        return Err(AppError::NotFound("Checklist item not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /checklist-items/{id}
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode> {
    require_item_owner(&state, item_id, user_id).await?;
    queries::delete_item(&state.db_pool, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_checklist_owner(state: &AppState, checklist_id: Uuid, user_id: Uuid) -> Result<()> {
    match queries::checklist_owner(&state.db_pool, checklist_id).await? {
        Some(owner) if owner == user_id => Ok(()),
        Some(_) => Err(AppError::Forbidden(
            "Checklist belongs to another user".to_string(),
        )),
        None => Err(AppError::NotFound("Checklist not found".to_string())),
    }
}

async fn require_item_owner(state: &AppState, item_id: Uuid, user_id: Uuid) -> Result<()> {
    match queries::item_owner(&state.db_pool, item_id).await? {
        Some(owner) if owner == user_id => Ok(()),
        Some(_) => Err(AppError::Forbidden(
            "Checklist item belongs to another user".to_string(),
        )),
        None => Err(AppError::NotFound("Checklist item not found".to_string())),
    }
}
