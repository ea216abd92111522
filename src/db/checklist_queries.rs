use crate::models::{Checklist, ChecklistItem};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ChecklistRow {
    id: Uuid,
    trip_id: Uuid,
    title: String,
    shared: bool,
}

#[derive(sqlx::FromRow)]
struct ChecklistItemRow {
    id: Uuid,
    checklist_id: Uuid,
    label: String,
    done: bool,
    position: i32,
}

pub async fn checklists_for_trip(pool: &PgPool, trip_id: Uuid) -> Result<Vec<Checklist>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ChecklistRow>(
        "SELECT id, trip_id, title, shared FROM checklists WHERE trip_id = $1 ORDER BY title",
    )
    .bind(trip_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| Checklist {
            id: r.id,
            trip_id: r.trip_id,
            title: r.title,
            shared: r.shared,
        })
        .collect())
}

pub async fn items_for_checklist(
    pool: &PgPool,
    checklist_id: Uuid,
) -> Result<Vec<ChecklistItem>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ChecklistItemRow>(
        "SELECT id, checklist_id, label, done, position FROM checklist_items \
         WHERE checklist_id = $1 ORDER BY position",
    )
    .bind(checklist_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| ChecklistItem {
            id: r.id,
            checklist_id: r.checklist_id,
            label: r.label,
            done: r.done,
            position: r.position,
        })
        .collect())
}

pub async fn insert_checklist(pool: &PgPool, checklist: &Checklist) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO checklists (id, trip_id, title, shared) VALUES ($1, $2, $3, $4)")
        .bind(checklist.id)
        .bind(checklist.trip_id)
        .bind(&checklist.title)
        .bind(checklist.shared)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn checklist_owner(pool: &PgPool, checklist_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT t.owner_id FROM checklists c JOIN trips t ON t.id = c.trip_id WHERE c.id = $1",
    )
    .bind(checklist_id)
    .fetch_optional(pool)
    .await
}

pub async fn item_owner(pool: &PgPool, item_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT t.owner_id FROM checklist_items i \
         JOIN checklists c ON c.id = i.checklist_id \
         JOIN trips t ON t.id = c.trip_id \
         WHERE i.id = $1",
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await
}

/// Insert an item at the end of the checklist (append-ordered, like
/// activities within a day).
pub async fn append_item(pool: &PgPool, item: &ChecklistItem) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO checklist_items (id, checklist_id, label, done, position) \
         VALUES ($1, $2, $3, $4, \
                 (SELECT COALESCE(MAX(position) + 1, 0) FROM checklist_items WHERE checklist_id = $2))",
    )
    .bind(item.id)
    .bind(item.checklist_id)
    .bind(&item.label)
    .bind(item.done)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_item(
    pool: &PgPool,
    item_id: Uuid,
    label: Option<&str>,
    done: Option<bool>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE checklist_items SET label = COALESCE($2, label), done = COALESCE($3, done) \
         WHERE id = $1",
    )
    .bind(item_id)
    .bind(label)
    .bind(done)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_item(pool: &PgPool, item_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM checklist_items WHERE id = $1")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_checklist(pool: &PgPool, checklist_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM checklists WHERE id = $1")
        .bind(checklist_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
