//! Playbook run service.
//!
//! Runs a playbook through the interpreter and, for live runs, records the
//! audit trail. Recording is best-effort: a broken database degrades the
//! audit trail, never the run itself.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{
    Playbook, RunDetailResponse, RunListResponse, RunResponse, RunStepResponse,
};
use crate::db::{queries, DbPool};
use crate::engine::interpreter::{
    Interpretation, RunMode, RunStats, StepInterpreter, StepOutcome,
};
use crate::engine::simulator::{DryRunPreview, DryRunSimulator};
use crate::error::{AppError, AppResult};
use crate::playbook::parser::parse_definition;
use crate::playbook::types::PlaybookDefinition;
use crate::result_ext::ResultExt;
use crate::services::recorder::RunRecorder;

/// History page size when the client does not ask for one.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Largest history page a client can request.
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Result of running a playbook.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Playbook that ran.
    pub playbook_id: Uuid,

    /// Mode the run executed under.
    pub mode: RunMode,

    /// Audit trail id. Present only for live runs whose header row was
    /// written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,

    /// Aggregate statistics.
    pub stats: RunStats,

    /// Per-step outcomes in definition order.
    pub steps: Vec<StepOutcome>,
}

/// Runs playbooks and records their audit trails.
#[derive(Clone)]
pub struct RunService {
    pool: DbPool,
    recorder: RunRecorder,
}

impl RunService {
    pub fn new(pool: DbPool) -> Self {
        let recorder = RunRecorder::new(pool.clone());
        Self { pool, recorder }
    }

    /// Run a playbook by id.
    ///
    /// The status gate does not apply here: draft and disabled playbooks can
    /// be run directly, which is the editor's test-run path.
    pub async fn execute(
        &self,
        playbook_id: Uuid,
        org_id: Uuid,
        mode: RunMode,
    ) -> AppResult<RunOutcome> {
        let playbook = queries::playbook::get_playbook(&self.pool, playbook_id, org_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Playbook {} not found", playbook_id)))?;

        self.execute_playbook(&playbook, mode).await
    }

    /// Run an already-fetched playbook row.
    ///
    /// A stored definition that no longer parses surfaces as an internal
    /// error: the client did nothing wrong.
    pub async fn execute_playbook(
        &self,
        playbook: &Playbook,
        mode: RunMode,
    ) -> AppResult<RunOutcome> {
        let definition = stored_definition(playbook)?;

        let interpreter = StepInterpreter::new();
        let interpretation = interpreter.execute(&definition, mode);

        let run_id = match mode {
            RunMode::DryRun => None,
            RunMode::Live => self.persist_audit_trail(playbook.id, &interpretation).await,
        };

        info!(
            playbook_id = %playbook.id,
            mode = %mode,
            total_steps = interpretation.stats.total_steps,
            time_saved_seconds = interpretation.stats.time_saved_seconds,
            "Playbook run finished"
        );

        Ok(RunOutcome {
            playbook_id: playbook.id,
            mode,
            run_id,
            stats: interpretation.stats,
            steps: interpretation.steps,
        })
    }

    /// Write the audit trail for a live run, best-effort.
    ///
    /// Every write failure is logged and swallowed. A failed header insert
    /// yields no run id; a failed step insert still lets finalize proceed.
    async fn persist_audit_trail(
        &self,
        playbook_id: Uuid,
        interpretation: &Interpretation,
    ) -> Option<Uuid> {
        let handle = self
            .recorder
            .start_run(playbook_id, RunMode::Live)
            .await
            .log("opening run record")
            .ok()?;

        self.recorder
            .record_steps(handle.run_id, &interpretation.steps)
            .await
            .log("recording run steps")
            .ok();

        self.recorder
            .finalize_run(handle.run_id, RunMode::Live, &interpretation.stats)
            .await
            .log("finalizing run record")
            .ok();

        Some(handle.run_id)
    }

    /// Project what a playbook would do without running it.
    pub async fn preview(&self, playbook_id: Uuid, org_id: Uuid) -> AppResult<DryRunPreview> {
        let playbook = queries::playbook::get_playbook(&self.pool, playbook_id, org_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Playbook {} not found", playbook_id)))?;
        let definition = stored_definition(&playbook)?;

        Ok(DryRunSimulator::new().preview(playbook.id, &definition))
    }

    /// Run history for a playbook, most recent first.
    ///
    /// Audit reads are fail-fast, unlike audit writes: errors here propagate.
    pub async fn history(
        &self,
        playbook_id: Uuid,
        org_id: Uuid,
        limit: i64,
    ) -> AppResult<RunListResponse> {
        // Resolve the playbook first so an unknown id is a 404, not an
        // empty list.
        queries::playbook::get_playbook(&self.pool, playbook_id, org_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Playbook {} not found", playbook_id)))?;

        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        let runs = queries::run::list_runs_for_playbook(&self.pool, playbook_id, limit).await?;
        let total = queries::run::count_runs_for_playbook(&self.pool, playbook_id).await?;

        Ok(RunListResponse {
            runs: runs.into_iter().map(RunResponse::from).collect(),
            total,
        })
    }

    /// Run detail: the header plus step records in step order.
    pub async fn detail(&self, run_id: Uuid, org_id: Uuid) -> AppResult<RunDetailResponse> {
        let run = queries::run::get_run(&self.pool, run_id, org_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Run {} not found", run_id)))?;
        let steps = queries::run::list_run_steps(&self.pool, run_id).await?;

        Ok(RunDetailResponse {
            run: run.into(),
            steps: steps.into_iter().map(RunStepResponse::from).collect(),
        })
    }
}

/// Parse a stored definition, mapping failures to an internal error.
///
/// Stored definitions were validated on the way in, so one that no longer
/// parses means bad data, not a bad request.
fn stored_definition(playbook: &Playbook) -> AppResult<PlaybookDefinition> {
    parse_definition(playbook.definition.clone()).map_err(|e| {
        AppError::Internal(format!(
            "Playbook {} has a corrupt stored definition: {}",
            playbook.id, e
        ))
    })
}
