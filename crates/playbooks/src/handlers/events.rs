//! Event ingestion handler.
//!
//! Application services (documents, share links, e-signature) post their
//! events here; the dispatcher fans them out to matching active playbooks.

use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::services::{DispatchService, DispatchSummary, EventRequest};
use crate::tenant::OrgContext;

/// Dispatch an application event.
///
/// `POST /api/events`
///
/// # Request Body
///
/// ```json
/// {
///   "event_type": "document_created",
///   "payload": { "document": { "id": "...", "kind": "contract" } }
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "event_type": "document_created",
///   "matched_count": 2,
///   "results": [
///     { "playbook_id": "...", "name": "Contract intake", "status": "completed", "run_id": "...", "stats": { ... } }
///   ]
/// }
/// ```
///
/// Unknown event types, and `manual`, are rejected with a validation error.
/// Zero matches is a normal response, not an error.
pub async fn handle_event(
    State(service): State<DispatchService>,
    context: OrgContext,
    Json(request): Json<EventRequest>,
) -> AppResult<Json<DispatchSummary>> {
    let summary = service
        .dispatch(context.org_id, &request.event_type, &request.payload)
        .await?;
    Ok(Json(summary))
}
