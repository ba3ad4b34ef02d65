//! Dry-run simulator.
//!
//! Answers "what would this playbook do" without touching storage. The
//! projection reuses the interpreter in dry-run mode so preview notes and
//! actual dry-run output can never drift apart.

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::engine::interpreter::{RunMode, StepInterpreter};
use crate::playbook::types::{PlaybookDefinition, StepType, TriggerKind};

/// A condition the playbook would evaluate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConditionPreview {
    /// Position of the step.
    pub idx: i32,

    /// Predicate kind.
    pub kind: String,

    /// Predicate parameters.
    pub input: serde_json::Value,
}

/// An action the playbook would execute, with its dry-run note.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionPreview {
    /// Position of the step.
    pub idx: i32,

    /// Action kind.
    pub kind: String,

    /// Dry-run note from the interpreter.
    pub note: String,
}

/// What a playbook would do, computed without side effects.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DryRunPreview {
    /// Playbook being previewed.
    pub playbook_id: Uuid,

    /// Synthesized event the trigger would receive.
    pub sample_event: serde_json::Value,

    /// Conditions in definition order.
    pub conditions: Vec<ConditionPreview>,

    /// Whether any actions would run.
    pub will_run_actions: bool,

    /// Actions in definition order.
    pub actions: Vec<ActionPreview>,
}

/// Deterministic fixture payload for a trigger kind.
pub fn sample_event(kind: TriggerKind) -> serde_json::Value {
    match kind {
        TriggerKind::Manual => json!({
            "event_type": "manual",
            "requested_by": "user-sample-0001",
            "note": "manually triggered from the playbook editor"
        }),
        TriggerKind::DocumentCreated => json!({
            "event_type": "document_created",
            "document": {
                "id": "doc-sample-0001",
                "title": "Sample services agreement",
                "kind": "contract",
                "owner_id": "user-sample-0001"
            }
        }),
        TriggerKind::ShareLinkCreated => json!({
            "event_type": "share_link_created",
            "share_link": {
                "id": "link-sample-0001",
                "document_id": "doc-sample-0001",
                "url": "https://app.quillspace.dev/s/AbCdEf123"
            },
            "document": {
                "id": "doc-sample-0001",
                "title": "Sample services agreement",
                "kind": "contract"
            }
        }),
        TriggerKind::SignatureCompleted => json!({
            "event_type": "signature_completed",
            "envelope": {
                "id": "env-sample-0001",
                "document_id": "doc-sample-0001",
                "signer_email": "signer@example.com",
                "completed": true
            }
        }),
    }
}

/// The dry-run simulator.
pub struct DryRunSimulator {
    interpreter: StepInterpreter,
}

impl Default for DryRunSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunSimulator {
    pub fn new() -> Self {
        Self {
            interpreter: StepInterpreter::new(),
        }
    }

    /// Project what the playbook would do.
    pub fn preview(&self, playbook_id: Uuid, definition: &PlaybookDefinition) -> DryRunPreview {
        let interpretation = self.interpreter.execute(definition, RunMode::DryRun);

        let conditions: Vec<ConditionPreview> = interpretation
            .steps
            .iter()
            .filter(|s| s.step_type == StepType::Condition)
            .map(|s| ConditionPreview {
                idx: s.idx,
                kind: s.kind.clone(),
                input: s.input.clone(),
            })
            .collect();

        let actions: Vec<ActionPreview> = interpretation
            .steps
            .iter()
            .filter(|s| s.step_type == StepType::Action)
            .map(|s| ActionPreview {
                idx: s.idx,
                kind: s.kind.clone(),
                note: s.note.clone(),
            })
            .collect();

        DryRunPreview {
            playbook_id,
            sample_event: sample_event(definition.trigger.kind),
            conditions,
            will_run_actions: !actions.is_empty(),
            actions,
        }
    }
}
