//! Run and step record models (the audit trail).
//!
//! A run row is the header; step rows carry what each step did. Step rows
//! are written best-effort, so a run may exist with a partial step set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Live run in progress.
    Started,
    /// Simulated run, recorded on request but without side effects.
    DryRun,
    /// Live run finished.
    Completed,
    /// Live run finished with failed steps.
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Started => "started",
            RunStatus::DryRun => "dry_run",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "started" => RunStatus::Started,
            "dry_run" => RunStatus::DryRun,
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            _ => RunStatus::Started,
        }
    }
}

/// Database run record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Run {
    /// Primary key.
    pub id: Uuid,

    /// Playbook this run belongs to.
    pub playbook_id: Uuid,

    /// Run status (started, dry_run, completed, failed).
    pub status: String,

    /// Aggregate statistics, written at finalization.
    pub stats: Option<serde_json::Value>,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run finished.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Database step record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RunStep {
    /// Run this step belongs to.
    pub run_id: Uuid,

    /// Position of the step in the definition.
    pub step_idx: i32,

    /// Step type (trigger, condition, action, wait, retry).
    pub step_type: String,

    /// Step input as authored in the definition.
    pub input: serde_json::Value,

    /// What the interpreter produced: `{ kind, note, mode }`.
    pub output: serde_json::Value,

    /// Step status (completed, failed, skipped).
    pub status: String,

    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// Run response for API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    /// Run ID.
    pub id: Uuid,

    /// Playbook ID.
    pub playbook_id: Uuid,

    /// Status.
    pub status: String,

    /// Aggregate statistics.
    pub stats: Option<serde_json::Value>,

    /// Started at.
    pub started_at: DateTime<Utc>,

    /// Completed at.
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Run> for RunResponse {
    fn from(r: Run) -> Self {
        Self {
            id: r.id,
            playbook_id: r.playbook_id,
            status: r.status,
            stats: r.stats,
            started_at: r.started_at,
            completed_at: r.completed_at,
        }
    }
}

/// Step record response for API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStepResponse {
    /// Position of the step.
    pub step_idx: i32,

    /// Step type.
    pub step_type: String,

    /// Step input.
    pub input: serde_json::Value,

    /// Interpreter output.
    pub output: serde_json::Value,

    /// Step status.
    pub status: String,

    /// Recorded at.
    pub created_at: DateTime<Utc>,
}

impl From<RunStep> for RunStepResponse {
    fn from(s: RunStep) -> Self {
        Self {
            step_idx: s.step_idx,
            step_type: s.step_type,
            input: s.input,
            output: s.output,
            status: s.status,
            created_at: s.created_at,
        }
    }
}

/// Run history response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunListResponse {
    /// Runs, most recent first.
    pub runs: Vec<RunResponse>,

    /// Total count returned.
    pub total: i64,
}

/// Run detail: header plus step records in definition order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDetailResponse {
    /// Run header.
    pub run: RunResponse,

    /// Step records ordered by `step_idx`.
    pub steps: Vec<RunStepResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_display() {
        assert_eq!(RunStatus::Started.to_string(), "started");
        assert_eq!(RunStatus::DryRun.to_string(), "dry_run");
        assert_eq!(RunStatus::Completed.to_string(), "completed");
        assert_eq!(RunStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_run_status_from_str() {
        assert_eq!(RunStatus::from("dry_run"), RunStatus::DryRun);
        assert_eq!(RunStatus::from("COMPLETED"), RunStatus::Completed);
        assert_eq!(RunStatus::from("unknown"), RunStatus::Started);
    }

    #[test]
    fn test_run_status_serde_round_trip() {
        let json = serde_json::to_string(&RunStatus::DryRun).unwrap();
        assert_eq!(json, "\"dry_run\"");
        let back: RunStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RunStatus::DryRun);
    }
}
