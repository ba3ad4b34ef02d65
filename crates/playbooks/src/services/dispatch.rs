//! Event-to-playbook dispatcher.
//!
//! Takes an application event (a document was created, a share link was
//! opened for a document, a signature envelope completed), finds the org's
//! active playbooks triggered by that event kind, and runs each one live.
//! One playbook's failure never stops the others.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::models::Playbook;
use crate::db::{queries, DbPool};
use crate::engine::interpreter::{RunMode, RunStats};
use crate::error::{AppError, AppResult};
use crate::playbook::types::TriggerKind;
use crate::services::run::RunService;

/// Inbound application event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRequest {
    /// Event kind, matched against playbook trigger kinds.
    pub event_type: String,

    /// Event payload. Logged and carried for future condition evaluation,
    /// not consumed by interpretation today.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Outcome of dispatching to one playbook.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    /// Playbook that was dispatched.
    pub playbook_id: Uuid,

    /// Playbook name at dispatch time.
    pub name: String,

    /// `completed` or `failed`.
    pub status: String,

    /// Audit trail id, when the live run recorded one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,

    /// Run statistics, when the run completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<RunStats>,

    /// Failure description, when the run failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary returned to the event producer.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    /// Event kind that was dispatched.
    pub event_type: String,

    /// Number of playbooks that matched.
    pub matched_count: usize,

    /// Per-playbook results, in candidate order.
    pub results: Vec<DispatchResult>,
}

/// Dispatches application events to matching active playbooks.
#[derive(Clone)]
pub struct DispatchService {
    pool: DbPool,
    runs: RunService,
}

impl DispatchService {
    pub fn new(pool: DbPool) -> Self {
        let runs = RunService::new(pool.clone());
        Self { pool, runs }
    }

    /// Dispatch an event to every matching active playbook in the org.
    ///
    /// The event type must be a dispatchable trigger kind; unknown kinds and
    /// `manual` are validation errors, not silent no-ops. Zero matches is a
    /// normal outcome.
    pub async fn dispatch(
        &self,
        org_id: Uuid,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> AppResult<DispatchSummary> {
        let kind = TriggerKind::parse(event_type)
            .ok_or_else(|| AppError::Validation(format!("Unknown event type '{}'", event_type)))?;
        if !kind.is_dispatchable() {
            return Err(AppError::Validation(format!(
                "Event type '{}' cannot be dispatched",
                event_type
            )));
        }

        debug!(org_id = %org_id, event_type = %event_type, payload = %payload, "Event received");

        let candidates =
            queries::playbook::list_dispatch_candidates(&self.pool, org_id, &kind.to_string())
                .await?;

        info!(
            org_id = %org_id,
            event_type = %event_type,
            matched_count = candidates.len(),
            "Dispatching event to matching playbooks"
        );

        Ok(self.run_matches(event_type, &candidates).await)
    }

    /// Run every candidate, isolating failures per playbook.
    ///
    /// A corrupt stored definition (or any other per-playbook error) is
    /// caught, logged, and reported in that playbook's result slot while the
    /// remaining candidates still run.
    pub async fn run_matches(
        &self,
        event_type: &str,
        candidates: &[Playbook],
    ) -> DispatchSummary {
        let mut results = Vec::with_capacity(candidates.len());

        for playbook in candidates {
            match self.runs.execute_playbook(playbook, RunMode::Live).await {
                Ok(outcome) => results.push(DispatchResult {
                    playbook_id: playbook.id,
                    name: playbook.name.clone(),
                    status: "completed".to_string(),
                    run_id: outcome.run_id,
                    stats: Some(outcome.stats),
                    error: None,
                }),
                Err(e) => {
                    warn!(
                        playbook_id = %playbook.id,
                        error = %e,
                        "Playbook failed during dispatch"
                    );
                    results.push(DispatchResult {
                        playbook_id: playbook.id,
                        name: playbook.name.clone(),
                        status: "failed".to_string(),
                        run_id: None,
                        stats: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        DispatchSummary {
            event_type: event_type.to_string(),
            matched_count: candidates.len(),
            results,
        }
    }
}
