//! Playbook API handlers.
//!
//! Endpoints for creating, inspecting, and managing playbooks. Every route
//! requires the org context headers (see [`crate::tenant::OrgContext`]).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{
    PlaybookCreateRequest, PlaybookDetail, PlaybookListResponse, PlaybookSummary,
    PlaybookUpdateRequest, StatusUpdateRequest,
};
use crate::error::AppResult;
use crate::playbook::templates::{builtin_templates, PlaybookTemplate};
use crate::services::PlaybookService;
use crate::tenant::OrgContext;

/// Query parameters for listing playbooks.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Optional status filter (canonical values or legacy aliases).
    pub status: Option<String>,
}

/// Built-in template catalog response.
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// Available templates.
    pub templates: Vec<PlaybookTemplate>,
}

/// Create a playbook.
///
/// `POST /api/playbooks`
///
/// # Request Body
///
/// From an inline definition:
/// ```json
/// {
///   "name": "Contract intake",
///   "definition": { "trigger": { "kind": "document_created" }, "steps": [...] }
/// }
/// ```
///
/// Or from a built-in template:
/// ```json
/// {
///   "name": "Contract intake",
///   "template": "contract-intake"
/// }
/// ```
///
/// New playbooks start in `draft`.
pub async fn create(
    State(service): State<PlaybookService>,
    context: OrgContext,
    Json(request): Json<PlaybookCreateRequest>,
) -> AppResult<Json<PlaybookDetail>> {
    let playbook = service
        .create(context.org_id, context.user_id, request)
        .await?;
    Ok(Json(playbook.into()))
}

/// List the org's playbooks.
///
/// `GET /api/playbooks?status=active`
///
/// Newest first. The status filter accepts canonical values plus the legacy
/// aliases `enabled` and `inactive`.
pub async fn list(
    State(service): State<PlaybookService>,
    context: OrgContext,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PlaybookListResponse>> {
    let playbooks = service
        .list(context.org_id, params.status.as_deref())
        .await?;
    let total = playbooks.len() as i64;

    Ok(Json(PlaybookListResponse {
        playbooks: playbooks.into_iter().map(PlaybookSummary::from).collect(),
        total,
    }))
}

/// Get a playbook with its full definition.
///
/// `GET /api/playbooks/{id}`
pub async fn get(
    State(service): State<PlaybookService>,
    context: OrgContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PlaybookDetail>> {
    let playbook = service.get(id, context.org_id).await?;
    Ok(Json(playbook.into()))
}

/// Update a playbook's name and/or definition.
///
/// `PUT /api/playbooks/{id}`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Contract intake v2",
///   "definition": { "trigger": { "kind": "document_created" }, "steps": [...] }
/// }
/// ```
///
/// A definition always replaces the stored object whole.
pub async fn update(
    State(service): State<PlaybookService>,
    context: OrgContext,
    Path(id): Path<Uuid>,
    Json(request): Json<PlaybookUpdateRequest>,
) -> AppResult<Json<PlaybookDetail>> {
    let playbook = service.update(id, context.org_id, request).await?;
    Ok(Json(playbook.into()))
}

/// Set a playbook's status.
///
/// `POST /api/playbooks/{id}/status`
///
/// # Request Body
///
/// ```json
/// { "status": "active" }
/// ```
///
/// Accepts `draft`, `active`, `disabled` plus the legacy aliases `enabled`
/// and `inactive`. Returns the updated playbook.
pub async fn set_status(
    State(service): State<PlaybookService>,
    context: OrgContext,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> AppResult<Json<PlaybookDetail>> {
    let playbook = service
        .set_status(id, context.org_id, &request.status)
        .await?;
    Ok(Json(playbook.into()))
}

/// List the built-in playbook templates.
///
/// `GET /api/playbooks/templates`
pub async fn templates(_context: OrgContext) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        templates: builtin_templates(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_templates_lists_builtins() {
        let org = OrgContext {
            org_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        };
        let Json(response) = templates(org).await;
        assert_eq!(response.templates.len(), 3);
    }
}
