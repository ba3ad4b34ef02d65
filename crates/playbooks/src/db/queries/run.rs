//! Run and run step database queries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::models::{Run, RunStep};
use crate::db::DbPool;
use crate::error::AppResult;

/// Insert a run header row.
pub async fn insert_run(
    pool: &DbPool,
    id: Uuid,
    playbook_id: Uuid,
    status: &str,
    started_at: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO quillspace.run (id, playbook_id, status, started_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(playbook_id)
    .bind(status)
    .bind(started_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a single run step row.
pub async fn insert_run_step(
    pool: &DbPool,
    run_id: Uuid,
    step_idx: i32,
    step_type: &str,
    input: &serde_json::Value,
    output: &serde_json::Value,
    status: &str,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO quillspace.run_step (
            run_id, step_idx, step_type, input, output, status, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(run_id)
    .bind(step_idx)
    .bind(step_type)
    .bind(input)
    .bind(output)
    .bind(status)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Write a run's terminal status, stats, and completion time.
pub async fn finalize_run(
    pool: &DbPool,
    run_id: Uuid,
    status: &str,
    stats: &serde_json::Value,
    completed_at: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE quillspace.run
        SET status = $2, stats = $3, completed_at = $4
        WHERE id = $1
        "#,
    )
    .bind(run_id)
    .bind(status)
    .bind(stats)
    .bind(completed_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a run by id, scoped to an org through its playbook.
pub async fn get_run(pool: &DbPool, run_id: Uuid, org_id: Uuid) -> AppResult<Option<Run>> {
    let run = sqlx::query_as::<_, Run>(
        r#"
        SELECT r.id, r.playbook_id, r.status, r.stats, r.started_at, r.completed_at
        FROM quillspace.run r
        JOIN quillspace.playbook p ON p.id = r.playbook_id
        WHERE r.id = $1 AND p.org_id = $2
        "#,
    )
    .bind(run_id)
    .bind(org_id)
    .fetch_optional(pool)
    .await?;

    Ok(run)
}

/// List runs for a playbook, most recent first.
pub async fn list_runs_for_playbook(
    pool: &DbPool,
    playbook_id: Uuid,
    limit: i64,
) -> AppResult<Vec<Run>> {
    let runs = sqlx::query_as::<_, Run>(
        r#"
        SELECT id, playbook_id, status, stats, started_at, completed_at
        FROM quillspace.run
        WHERE playbook_id = $1
        ORDER BY started_at DESC
        LIMIT $2
        "#,
    )
    .bind(playbook_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(runs)
}

/// Count all runs recorded for a playbook.
pub async fn count_runs_for_playbook(pool: &DbPool, playbook_id: Uuid) -> AppResult<i64> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM quillspace.run
        WHERE playbook_id = $1
        "#,
    )
    .bind(playbook_id)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

/// List the step records of a run in step order.
pub async fn list_run_steps(pool: &DbPool, run_id: Uuid) -> AppResult<Vec<RunStep>> {
    let steps = sqlx::query_as::<_, RunStep>(
        r#"
        SELECT run_id, step_idx, step_type, input, output, status, created_at
        FROM quillspace.run_step
        WHERE run_id = $1
        ORDER BY step_idx ASC
        "#,
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(steps)
}
