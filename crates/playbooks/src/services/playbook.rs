//! Playbook management service.
//!
//! Create, list, fetch, and update playbook definitions for an org. All
//! reads and writes are org-scoped; a playbook in another org is
//! indistinguishable from one that does not exist.

use tracing::info;
use uuid::Uuid;

use crate::db::models::{Playbook, PlaybookCreateRequest, PlaybookStatus, PlaybookUpdateRequest};
use crate::db::{queries, DbPool};
use crate::error::{AppError, AppResult};
use crate::playbook::parser::parse_definition;
use crate::playbook::templates::template_by_slug;
use crate::playbook::types::PlaybookDefinition;

/// Manages playbook definitions.
#[derive(Clone)]
pub struct PlaybookService {
    pool: DbPool,
}

impl PlaybookService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a playbook from an inline definition or a built-in template.
    ///
    /// New playbooks start in `draft` so they never dispatch before someone
    /// looked at them.
    pub async fn create(
        &self,
        org_id: Uuid,
        owner_id: Uuid,
        request: PlaybookCreateRequest,
    ) -> AppResult<Playbook> {
        request.validate().map_err(AppError::Validation)?;

        let definition: PlaybookDefinition = if let Some(value) = request.definition {
            parse_definition(value)?
        } else if let Some(slug) = request.template.as_deref() {
            template_by_slug(slug)
                .ok_or_else(|| AppError::Validation(format!("Unknown template '{}'", slug)))?
                .definition
        } else {
            return Err(AppError::Validation(
                "Either a definition or a template is required".to_string(),
            ));
        };

        let definition_json = serde_json::to_value(&definition)?;
        let playbook = queries::playbook::insert_playbook(
            &self.pool,
            Uuid::new_v4(),
            org_id,
            owner_id,
            &request.name,
            &PlaybookStatus::Draft.to_string(),
            &definition.trigger.kind.to_string(),
            &definition_json,
        )
        .await?;

        info!(
            playbook_id = %playbook.id,
            org_id = %org_id,
            trigger_kind = %playbook.trigger_kind,
            "Playbook created"
        );

        Ok(playbook)
    }

    /// List the org's playbooks, newest first, optionally filtered by status.
    pub async fn list(&self, org_id: Uuid, status: Option<&str>) -> AppResult<Vec<Playbook>> {
        let canonical = match status {
            Some(s) => Some(
                PlaybookStatus::parse(s)
                    .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", s)))?
                    .to_string(),
            ),
            None => None,
        };

        queries::playbook::list_playbooks(&self.pool, org_id, canonical.as_deref()).await
    }

    /// Get a playbook by id.
    pub async fn get(&self, id: Uuid, org_id: Uuid) -> AppResult<Playbook> {
        queries::playbook::get_playbook(&self.pool, id, org_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Playbook {} not found", id)))
    }

    /// Update a playbook's name and/or definition.
    ///
    /// A new definition replaces the stored object whole and re-derives the
    /// trigger kind; definitions are never patched in place.
    pub async fn update(
        &self,
        id: Uuid,
        org_id: Uuid,
        request: PlaybookUpdateRequest,
    ) -> AppResult<Playbook> {
        if request.name.is_none() && request.definition.is_none() {
            return Err(AppError::Validation(
                "Update requires a name or a definition".to_string(),
            ));
        }
        if let Some(name) = request.name.as_deref() {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Name must not be blank".to_string()));
            }
        }

        let parsed = match request.definition {
            Some(value) => Some(parse_definition(value)?),
            None => None,
        };
        let definition_json = match &parsed {
            Some(d) => Some(serde_json::to_value(d)?),
            None => None,
        };
        let trigger_kind = parsed.as_ref().map(|d| d.trigger.kind.to_string());

        queries::playbook::update_playbook(
            &self.pool,
            id,
            org_id,
            request.name.as_deref(),
            definition_json.as_ref(),
            trigger_kind.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Playbook {} not found", id)))
    }

    /// Set a playbook's status.
    ///
    /// Accepts canonical `draft`, `active`, `disabled` plus the legacy
    /// aliases `enabled` and `inactive`. Anything else is a validation error.
    pub async fn set_status(&self, id: Uuid, org_id: Uuid, raw_status: &str) -> AppResult<Playbook> {
        let status = PlaybookStatus::parse(raw_status).ok_or_else(|| {
            AppError::Validation(format!(
                "Unknown status '{}': expected draft, active, or disabled",
                raw_status
            ))
        })?;

        let playbook =
            queries::playbook::update_playbook_status(&self.pool, id, org_id, &status.to_string())
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Playbook {} not found", id)))?;

        info!(
            playbook_id = %playbook.id,
            status = %playbook.status,
            "Playbook status changed"
        );

        Ok(playbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    fn unreachable_pool() -> DbPool {
        let config = crate::config::DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: "1".to_string(),
            ..Default::default()
        };
        PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy_with(config.connect_options())
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_template() {
        let service = PlaybookService::new(unreachable_pool());
        let request = PlaybookCreateRequest {
            name: "From template".to_string(),
            definition: None,
            template: Some("no-such-template".to_string()),
        };

        let err = service
            .create(Uuid::new_v4(), Uuid::new_v4(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_definition_and_template_together() {
        let service = PlaybookService::new(unreachable_pool());
        let request = PlaybookCreateRequest {
            name: "Ambiguous".to_string(),
            definition: Some(json!({ "trigger": { "kind": "manual" }, "steps": [] })),
            template: Some("share-link-follow-up".to_string()),
        };

        let err = service
            .create(Uuid::new_v4(), Uuid::new_v4(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_definition() {
        let service = PlaybookService::new(unreachable_pool());
        let request = PlaybookCreateRequest {
            name: "Bad indexes".to_string(),
            definition: Some(json!({
                "trigger": { "kind": "manual" },
                "steps": [
                    { "idx": 1, "type": "trigger", "kind": "manual", "input": {} }
                ]
            })),
            template: None,
        };

        let err = service
            .create(Uuid::new_v4(), Uuid::new_v4(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_requires_some_field() {
        let service = PlaybookService::new(unreachable_pool());
        let request = PlaybookUpdateRequest {
            name: None,
            definition: None,
        };

        let err = service
            .update(Uuid::new_v4(), Uuid::new_v4(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_set_status_rejects_unknown_value() {
        let service = PlaybookService::new(unreachable_pool());

        let err = service
            .set_status(Uuid::new_v4(), Uuid::new_v4(), "archived")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_status_filter() {
        let service = PlaybookService::new(unreachable_pool());

        let err = service
            .list(Uuid::new_v4(), Some("archived"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
