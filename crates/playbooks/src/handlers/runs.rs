//! Run API handlers.
//!
//! Endpoints for executing playbooks, previewing what they would do, and
//! reading the audit trail.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::models::{RunDetailResponse, RunListResponse};
use crate::engine::interpreter::RunMode;
use crate::engine::simulator::DryRunPreview;
use crate::error::AppResult;
use crate::services::{RunOutcome, RunService, DEFAULT_HISTORY_LIMIT};
use crate::tenant::OrgContext;

/// Body for running a playbook by id.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    /// Playbook to run.
    pub playbook_id: Uuid,

    /// `dry_run` or `live`.
    pub mode: RunMode,
}

/// Query parameters for run history.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Page size, default 50, capped at 100.
    pub limit: Option<i64>,
}

/// Run a playbook.
///
/// `POST /api/playbooks/run`
///
/// # Request Body
///
/// ```json
/// { "playbook_id": "7c0e...", "mode": "live" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "playbook_id": "7c0e...",
///   "mode": "live",
///   "run_id": "91ab...",
///   "stats": { "total_steps": 3, "completed_steps": 3, "failed_steps": 0, "time_saved_seconds": 60 },
///   "steps": [ ... ]
/// }
/// ```
///
/// This is the manual trigger path: the status gate does not apply, so
/// draft and disabled playbooks can be run directly. `run_id` is present
/// only for live runs whose audit header was written.
pub async fn run(
    State(service): State<RunService>,
    context: OrgContext,
    Json(request): Json<RunRequest>,
) -> AppResult<Json<RunOutcome>> {
    let outcome = service
        .execute(request.playbook_id, context.org_id, request.mode)
        .await?;
    Ok(Json(outcome))
}

/// Preview what a playbook would do.
///
/// `GET /api/playbooks/{id}/dry-run`
///
/// # Response
///
/// ```json
/// {
///   "playbook_id": "7c0e...",
///   "sample_event": { "event_type": "share_link_created", ... },
///   "conditions": [ { "idx": 1, "kind": "document_kind_matches", "input": { ... } } ],
///   "will_run_actions": true,
///   "actions": [ { "idx": 2, "kind": "notify_owner", "note": "..." } ]
/// }
/// ```
///
/// Pure projection: nothing is written and no run id is allocated.
pub async fn dry_run_preview(
    State(service): State<RunService>,
    context: OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DryRunPreview>> {
    let preview = service.preview(id, context.org_id).await?;
    Ok(Json(preview))
}

/// Run history for a playbook.
///
/// `GET /api/playbooks/{id}/runs?limit=20`
///
/// Most recent first. `total` counts all recorded runs, not just the page.
pub async fn history(
    State(service): State<RunService>,
    context: OrgContext,
    Path(id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<RunListResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let response = service.history(id, context.org_id, limit).await?;
    Ok(Json(response))
}

/// Run detail.
///
/// `GET /api/runs/{id}`
///
/// Returns the run header plus its step records in step order. Step records
/// are written best-effort, so a run can legitimately have fewer step rows
/// than its stats report.
pub async fn detail(
    State(service): State<RunService>,
    context: OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RunDetailResponse>> {
    let response = service.detail(id, context.org_id).await?;
    Ok(Json(response))
}
