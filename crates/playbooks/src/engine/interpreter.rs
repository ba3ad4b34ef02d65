//! Step interpreter.
//!
//! Walks a definition's steps in order and classifies each one into an
//! outcome record plus aggregate statistics. The interpreter is pure:
//! no I/O, no clock, no randomness. Persistence and event matching live
//! in the service layer, which is what keeps dry-run and live
//! interpretation byte-for-byte identical apart from the action notes.

use serde::{Deserialize, Serialize};

use crate::engine::actions::ActionRegistry;
use crate::playbook::types::{PlaybookDefinition, Step, StepType};

/// Seconds of manual work one action step is credited with saving.
pub const TIME_SAVED_PER_ACTION_SECS: i64 = 60;

/// Execution mode for a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    DryRun,
    Live,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunMode::DryRun => "dry_run",
            RunMode::Live => "live",
        };
        write!(f, "{}", s)
    }
}

/// Outcome status of a single step.
///
/// The interpreter only ever produces `completed` today; `failed` and
/// `skipped` exist for handlers that will report real outcomes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Failed,
    Skipped,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// What interpreting one step produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepOutcome {
    /// Position of the step in the definition.
    pub idx: i32,

    /// Step type.
    #[serde(rename = "type")]
    pub step_type: StepType,

    /// Step kind as authored.
    pub kind: String,

    /// Outcome status.
    pub status: StepStatus,

    /// Human-readable note describing what happened (or would happen).
    pub note: String,

    /// Mode the step was interpreted under.
    pub mode: RunMode,

    /// Step input echoed for the audit trail.
    pub input: serde_json::Value,
}

impl StepOutcome {
    /// Output JSON persisted on the step record.
    pub fn output(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": self.kind,
            "note": self.note,
            "mode": self.mode,
        })
    }
}

/// Aggregate statistics for one interpreter pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunStats {
    /// Steps walked.
    pub total_steps: i64,

    /// Steps that completed.
    pub completed_steps: i64,

    /// Steps that failed.
    pub failed_steps: i64,

    /// Estimated seconds of manual work saved by action steps.
    pub time_saved_seconds: i64,
}

/// Result of one interpreter pass over a definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interpretation {
    /// Per-step outcomes, in definition order.
    pub steps: Vec<StepOutcome>,

    /// Aggregate statistics.
    pub stats: RunStats,
}

/// The step interpreter.
pub struct StepInterpreter {
    actions: ActionRegistry,
}

impl Default for StepInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl StepInterpreter {
    /// Interpreter with the built-in action handlers.
    pub fn new() -> Self {
        Self {
            actions: ActionRegistry::with_builtin_handlers(),
        }
    }

    /// Interpreter with a custom registry.
    pub fn with_registry(actions: ActionRegistry) -> Self {
        Self { actions }
    }

    /// Walk the definition's steps in order and produce outcomes + stats.
    ///
    /// Deterministic: the same definition and mode always yield the same
    /// interpretation.
    pub fn execute(&self, definition: &PlaybookDefinition, mode: RunMode) -> Interpretation {
        let mut action_count: i64 = 0;
        let mut steps = Vec::with_capacity(definition.steps.len());

        for step in &definition.steps {
            if step.step_type == StepType::Action {
                action_count += 1;
            }

            steps.push(StepOutcome {
                idx: step.idx,
                step_type: step.step_type,
                kind: step.kind.clone(),
                status: StepStatus::Completed,
                note: self.note_for(step, mode),
                mode,
                input: step.input.clone(),
            });
        }

        let total = steps.len() as i64;
        let stats = RunStats {
            total_steps: total,
            completed_steps: total,
            failed_steps: 0,
            time_saved_seconds: action_count * TIME_SAVED_PER_ACTION_SECS,
        };

        Interpretation { steps, stats }
    }

    fn note_for(&self, step: &Step, mode: RunMode) -> String {
        match step.step_type {
            StepType::Trigger => format!("trigger '{}' acknowledged", step.kind),
            StepType::Condition => format!(
                "condition '{}' recorded; predicates are not evaluated against event payloads yet",
                step.kind
            ),
            StepType::Action => {
                let summary = self.actions.summary(&step.kind, &step.input);
                match mode {
                    RunMode::DryRun => format!("{}: simulated, no side effects", summary),
                    RunMode::Live => format!("{}: executed (stub)", summary),
                }
            }
            StepType::Wait => format!(
                "wait '{}' acknowledged; durable scheduling happens outside the run",
                step.kind
            ),
            StepType::Retry => format!(
                "retry policy '{}' recorded; retries are not executed by the interpreter",
                step.kind
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playbook::types::{Trigger, TriggerKind};
    use serde_json::json;

    fn make_step(idx: i32, step_type: StepType, kind: &str) -> Step {
        Step {
            idx,
            step_type,
            kind: kind.to_string(),
            input: json!({}),
        }
    }

    fn make_definition(steps: Vec<Step>) -> PlaybookDefinition {
        PlaybookDefinition {
            trigger: Trigger {
                kind: TriggerKind::ShareLinkCreated,
                filter: None,
            },
            steps,
        }
    }

    fn three_step_definition() -> PlaybookDefinition {
        make_definition(vec![
            make_step(0, StepType::Trigger, "share_link_created"),
            make_step(1, StepType::Condition, "document_kind_matches"),
            make_step(2, StepType::Action, "notify_owner"),
        ])
    }

    #[test]
    fn test_execute_is_deterministic() {
        let interpreter = StepInterpreter::new();
        let definition = three_step_definition();

        let first = interpreter.execute(&definition, RunMode::Live);
        let second = interpreter.execute(&definition, RunMode::Live);
        assert_eq!(first, second);

        let dry_first = interpreter.execute(&definition, RunMode::DryRun);
        let dry_second = interpreter.execute(&definition, RunMode::DryRun);
        assert_eq!(dry_first, dry_second);
    }

    #[test]
    fn test_every_step_completes() {
        let interpreter = StepInterpreter::new();
        let definition = make_definition(vec![
            make_step(0, StepType::Trigger, "document_created"),
            make_step(1, StepType::Condition, "document_kind_matches"),
            make_step(2, StepType::Action, "prepare_share_link"),
            make_step(3, StepType::Wait, "delay"),
            make_step(4, StepType::Retry, "backoff"),
        ]);

        let result = interpreter.execute(&definition, RunMode::Live);
        assert_eq!(result.steps.len(), 5);
        assert!(result
            .steps
            .iter()
            .all(|s| s.status == StepStatus::Completed));
        assert_eq!(result.stats.total_steps, 5);
        assert_eq!(result.stats.completed_steps, 5);
        assert_eq!(result.stats.failed_steps, 0);
    }

    #[test]
    fn test_outcomes_preserve_order_and_echo_steps() {
        let interpreter = StepInterpreter::new();
        let definition = make_definition(vec![
            Step {
                idx: 0,
                step_type: StepType::Trigger,
                kind: "share_link_created".to_string(),
                input: json!({}),
            },
            Step {
                idx: 1,
                step_type: StepType::Action,
                kind: "notify_owner".to_string(),
                input: json!({ "channel": "email" }),
            },
        ]);

        let result = interpreter.execute(&definition, RunMode::DryRun);
        assert_eq!(result.steps[0].idx, 0);
        assert_eq!(result.steps[0].step_type, StepType::Trigger);
        assert_eq!(result.steps[1].idx, 1);
        assert_eq!(result.steps[1].kind, "notify_owner");
        assert_eq!(result.steps[1].input, json!({ "channel": "email" }));
    }

    #[test]
    fn test_time_saved_formula() {
        let interpreter = StepInterpreter::new();

        // One action out of three steps.
        let result = interpreter.execute(&three_step_definition(), RunMode::Live);
        assert_eq!(result.stats.time_saved_seconds, 60);

        // Three actions out of five steps.
        let definition = make_definition(vec![
            make_step(0, StepType::Trigger, "signature_completed"),
            make_step(1, StepType::Action, "generate_document"),
            make_step(2, StepType::Action, "archive_to_vault"),
            make_step(3, StepType::Wait, "delay"),
            make_step(4, StepType::Action, "notify_owner"),
        ]);
        let result = interpreter.execute(&definition, RunMode::DryRun);
        assert_eq!(result.stats.time_saved_seconds, 180);

        // No actions, nothing saved.
        let definition = make_definition(vec![make_step(0, StepType::Trigger, "manual")]);
        let result = interpreter.execute(&definition, RunMode::Live);
        assert_eq!(result.stats.time_saved_seconds, 0);
    }

    #[test]
    fn test_action_notes_differ_by_mode() {
        let interpreter = StepInterpreter::new();
        let definition = three_step_definition();

        let dry = interpreter.execute(&definition, RunMode::DryRun);
        let live = interpreter.execute(&definition, RunMode::Live);

        assert!(dry.steps[2].note.contains("simulated, no side effects"));
        assert!(live.steps[2].note.contains("executed (stub)"));

        // Non-action notes are identical across modes.
        assert_eq!(dry.steps[0].note, live.steps[0].note);
        assert_eq!(dry.steps[1].note, live.steps[1].note);

        // Stats do not depend on mode.
        assert_eq!(dry.stats, live.stats);
    }

    #[test]
    fn test_unknown_action_kind_still_interprets() {
        let interpreter = StepInterpreter::new();
        let definition = make_definition(vec![make_step(
            0,
            StepType::Action,
            "teleport_document",
        )]);

        let result = interpreter.execute(&definition, RunMode::Live);
        assert_eq!(result.steps[0].status, StepStatus::Completed);
        assert!(result.steps[0].note.contains("action 'teleport_document'"));
        assert_eq!(result.stats.time_saved_seconds, 60);
    }

    #[test]
    fn test_outcome_output_shape() {
        let interpreter = StepInterpreter::new();
        let result = interpreter.execute(&three_step_definition(), RunMode::DryRun);

        let output = result.steps[2].output();
        assert_eq!(output["kind"], "notify_owner");
        assert_eq!(output["mode"], "dry_run");
        assert!(output["note"].as_str().unwrap().contains("simulated"));
    }

    #[test]
    fn test_empty_steps_yield_zero_stats() {
        // Validation normally prevents this; the interpreter stays total anyway.
        let interpreter = StepInterpreter::new();
        let definition = make_definition(vec![]);

        let result = interpreter.execute(&definition, RunMode::Live);
        assert!(result.steps.is_empty());
        assert_eq!(
            result.stats,
            RunStats {
                total_steps: 0,
                completed_steps: 0,
                failed_steps: 0,
                time_saved_seconds: 0,
            }
        );
    }

    #[test]
    fn test_run_mode_serialization() {
        assert_eq!(serde_json::to_string(&RunMode::DryRun).unwrap(), "\"dry_run\"");
        assert_eq!(serde_json::to_string(&RunMode::Live).unwrap(), "\"live\"");
        assert_eq!(RunMode::DryRun.to_string(), "dry_run");
    }
}
