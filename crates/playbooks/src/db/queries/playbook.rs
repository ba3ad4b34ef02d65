//! Playbook database queries.

use chrono::Utc;
use uuid::Uuid;

use crate::db::models::Playbook;
use crate::db::DbPool;
use crate::error::AppResult;

/// Insert a new playbook.
#[allow(clippy::too_many_arguments)]
pub async fn insert_playbook(
    pool: &DbPool,
    id: Uuid,
    org_id: Uuid,
    owner_id: Uuid,
    name: &str,
    status: &str,
    trigger_kind: &str,
    definition: &serde_json::Value,
) -> AppResult<Playbook> {
    let now = Utc::now();
    let playbook = sqlx::query_as::<_, Playbook>(
        r#"
        INSERT INTO quillspace.playbook (
            id, org_id, owner_id, name, status, trigger_kind, definition,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING id, org_id, owner_id, name, status, trigger_kind, definition,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(org_id)
    .bind(owner_id)
    .bind(name)
    .bind(status)
    .bind(trigger_kind)
    .bind(definition)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(playbook)
}

/// Get a playbook by id, scoped to an org.
pub async fn get_playbook(pool: &DbPool, id: Uuid, org_id: Uuid) -> AppResult<Option<Playbook>> {
    let playbook = sqlx::query_as::<_, Playbook>(
        r#"
        SELECT id, org_id, owner_id, name, status, trigger_kind, definition,
               created_at, updated_at
        FROM quillspace.playbook
        WHERE id = $1 AND org_id = $2
        "#,
    )
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await?;

    Ok(playbook)
}

/// List playbooks for an org, optionally filtered by status.
pub async fn list_playbooks(
    pool: &DbPool,
    org_id: Uuid,
    status: Option<&str>,
) -> AppResult<Vec<Playbook>> {
    let playbooks = if let Some(s) = status {
        sqlx::query_as::<_, Playbook>(
            r#"
            SELECT id, org_id, owner_id, name, status, trigger_kind, definition,
                   created_at, updated_at
            FROM quillspace.playbook
            WHERE org_id = $1 AND status = $2
            ORDER BY updated_at DESC
            "#,
        )
        .bind(org_id)
        .bind(s)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, Playbook>(
            r#"
            SELECT id, org_id, owner_id, name, status, trigger_kind, definition,
                   created_at, updated_at
            FROM quillspace.playbook
            WHERE org_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(org_id)
        .fetch_all(pool)
        .await?
    };

    Ok(playbooks)
}

/// List active playbooks for an org matching a trigger kind.
///
/// Candidates come back in creation order so dispatch runs them oldest first.
pub async fn list_dispatch_candidates(
    pool: &DbPool,
    org_id: Uuid,
    trigger_kind: &str,
) -> AppResult<Vec<Playbook>> {
    let playbooks = sqlx::query_as::<_, Playbook>(
        r#"
        SELECT id, org_id, owner_id, name, status, trigger_kind, definition,
               created_at, updated_at
        FROM quillspace.playbook
        WHERE org_id = $1 AND status = 'active' AND trigger_kind = $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(org_id)
    .bind(trigger_kind)
    .fetch_all(pool)
    .await?;

    Ok(playbooks)
}

/// Update a playbook's name and/or definition.
///
/// `trigger_kind` travels with `definition`: the caller re-derives it when the
/// definition is replaced. Returns `None` when the playbook does not exist in
/// the org.
pub async fn update_playbook(
    pool: &DbPool,
    id: Uuid,
    org_id: Uuid,
    name: Option<&str>,
    definition: Option<&serde_json::Value>,
    trigger_kind: Option<&str>,
) -> AppResult<Option<Playbook>> {
    let playbook = sqlx::query_as::<_, Playbook>(
        r#"
        UPDATE quillspace.playbook
        SET name = COALESCE($3, name),
            definition = COALESCE($4, definition),
            trigger_kind = COALESCE($5, trigger_kind),
            updated_at = $6
        WHERE id = $1 AND org_id = $2
        RETURNING id, org_id, owner_id, name, status, trigger_kind, definition,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(org_id)
    .bind(name)
    .bind(definition)
    .bind(trigger_kind)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(playbook)
}

/// Set a playbook's status. Returns `None` when the playbook does not exist
/// in the org.
pub async fn update_playbook_status(
    pool: &DbPool,
    id: Uuid,
    org_id: Uuid,
    status: &str,
) -> AppResult<Option<Playbook>> {
    let playbook = sqlx::query_as::<_, Playbook>(
        r#"
        UPDATE quillspace.playbook
        SET status = $3, updated_at = $4
        WHERE id = $1 AND org_id = $2
        RETURNING id, org_id, owner_id, name, status, trigger_kind, definition,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(org_id)
    .bind(status)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(playbook)
}
