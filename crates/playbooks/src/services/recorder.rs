//! Run audit trail recorder.
//!
//! Persists run headers and per-step records in Postgres. The recorder itself
//! is fail-fast and returns errors like any other database code; the policy
//! that audit writes never break a live run lives in the caller, which logs
//! and swallows recorder errors (see [`crate::services::run::RunService`]).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::models::RunStatus;
use crate::db::{queries, DbPool};
use crate::engine::interpreter::{RunMode, RunStats, StepOutcome};
use crate::error::AppResult;

/// Handle to a run opened by [`RunRecorder::start_run`].
#[derive(Debug, Clone, Copy)]
pub struct RunHandle {
    /// Run id, generated client-side.
    pub run_id: Uuid,

    /// When the run header was opened.
    pub started_at: DateTime<Utc>,
}

/// Records run audit trails.
#[derive(Clone)]
pub struct RunRecorder {
    pool: DbPool,
}

impl RunRecorder {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open a run header row.
    ///
    /// Live runs start in `started`; dry runs carry `dry_run` from the
    /// beginning so a crashed process never leaves a dry run looking live.
    pub async fn start_run(&self, playbook_id: Uuid, mode: RunMode) -> AppResult<RunHandle> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let status = match mode {
            RunMode::Live => RunStatus::Started,
            RunMode::DryRun => RunStatus::DryRun,
        };

        queries::run::insert_run(&self.pool, run_id, playbook_id, &status.to_string(), started_at)
            .await?;

        Ok(RunHandle { run_id, started_at })
    }

    /// Persist step outcomes, one row per step.
    ///
    /// Inserts are independent: rows written before a failure stay written,
    /// and there is no transaction across the run.
    pub async fn record_steps(&self, run_id: Uuid, outcomes: &[StepOutcome]) -> AppResult<()> {
        for outcome in outcomes {
            queries::run::insert_run_step(
                &self.pool,
                run_id,
                outcome.idx,
                &outcome.step_type.to_string(),
                &outcome.input,
                &outcome.output(),
                &outcome.status.to_string(),
            )
            .await?;
        }

        Ok(())
    }

    /// Close a run with its terminal status, stats, and completion time.
    pub async fn finalize_run(
        &self,
        run_id: Uuid,
        mode: RunMode,
        stats: &RunStats,
    ) -> AppResult<()> {
        let status = terminal_status(mode, stats);
        let stats_json = serde_json::to_value(stats)?;

        queries::run::finalize_run(&self.pool, run_id, &status.to_string(), &stats_json, Utc::now())
            .await
    }
}

/// Terminal status for a finished run.
///
/// Failed steps win over everything; otherwise `started` becomes `completed`
/// and dry runs stay `dry_run`.
fn terminal_status(mode: RunMode, stats: &RunStats) -> RunStatus {
    if stats.failed_steps > 0 {
        return RunStatus::Failed;
    }

    match mode {
        RunMode::Live => RunStatus::Completed,
        RunMode::DryRun => RunStatus::DryRun,
    }
}
