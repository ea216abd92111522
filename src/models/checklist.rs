use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub title: String,
    pub shared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub checklist_id: Uuid,
    pub label: String,
    pub done: bool,
    pub position: i32,
}

#[derive(Debug, Serialize)]
pub struct ChecklistWithItems {
    #[serde(flatten)]
    pub checklist: Checklist,
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Deserialize)]
pub struct NewChecklistRequest {
    pub title: String,
    #[serde(default)]
    pub shared: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewChecklistItemRequest {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistItemUpdateRequest {
    pub label: Option<String>,
    pub done: Option<bool>,
}
