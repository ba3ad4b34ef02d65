//! Playbook definition types.
//!
//! A definition is the declarative shape of an automation recipe:
//! one trigger plus an ordered list of steps. Step `kind` and `input`
//! are opaque here; the step vocabulary itself is a closed set so the
//! interpreter can match on it exhaustively.

use serde::{Deserialize, Serialize};

/// Event kinds a trigger can bind to.
///
/// `manual` exists for run-now playbooks and is deliberately not
/// dispatchable: application events never carry it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Manual,
    DocumentCreated,
    ShareLinkCreated,
    SignatureCompleted,
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TriggerKind::Manual => "manual",
            TriggerKind::DocumentCreated => "document_created",
            TriggerKind::ShareLinkCreated => "share_link_created",
            TriggerKind::SignatureCompleted => "signature_completed",
        };
        write!(f, "{}", s)
    }
}

impl TriggerKind {
    /// Strict parse for event types arriving at the dispatcher.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(TriggerKind::Manual),
            "document_created" => Some(TriggerKind::DocumentCreated),
            "share_link_created" => Some(TriggerKind::ShareLinkCreated),
            "signature_completed" => Some(TriggerKind::SignatureCompleted),
            _ => None,
        }
    }

    /// Whether application events of this kind reach the dispatcher.
    pub fn is_dispatchable(&self) -> bool {
        !matches!(self, TriggerKind::Manual)
    }
}

/// Trigger binding of a definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trigger {
    /// Event kind the playbook listens for.
    pub kind: TriggerKind,

    /// Optional matching payload shape. Recorded with the definition,
    /// not evaluated during interpretation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
}

/// The five recognized step types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Trigger,
    Condition,
    Action,
    Wait,
    Retry,
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepType::Trigger => "trigger",
            StepType::Condition => "condition",
            StepType::Action => "action",
            StepType::Wait => "wait",
            StepType::Retry => "retry",
        };
        write!(f, "{}", s)
    }
}

/// One step of a definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Position in the definition. Must be contiguous and ascending
    /// from zero; the parser enforces this.
    pub idx: i32,

    /// Step type.
    #[serde(rename = "type")]
    pub step_type: StepType,

    /// What the step concretely does, e.g. `send_for_signature` or
    /// `document_kind_matches`. Opaque to validation.
    pub kind: String,

    /// Step parameters. Opaque to validation.
    #[serde(default = "default_input")]
    pub input: serde_json::Value,
}

fn default_input() -> serde_json::Value {
    serde_json::json!({})
}

/// Complete playbook definition: trigger plus ordered steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybookDefinition {
    /// Trigger binding.
    pub trigger: Trigger,

    /// Ordered steps.
    pub steps: Vec<Step>,
}

impl PlaybookDefinition {
    /// Number of steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of action steps.
    pub fn action_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.step_type == StepType::Action)
            .count()
    }

    /// Steps of a given type, in definition order.
    pub fn steps_of_type(&self, step_type: StepType) -> Vec<&Step> {
        self.steps
            .iter()
            .filter(|s| s.step_type == step_type)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple_definition() {
        let value = json!({
            "trigger": { "kind": "share_link_created" },
            "steps": [
                { "idx": 0, "type": "trigger", "kind": "share_link_created" },
                { "idx": 1, "type": "condition", "kind": "document_kind_matches",
                  "input": { "kinds": ["contract"] } },
                { "idx": 2, "type": "action", "kind": "notify_owner" }
            ]
        });

        let definition: PlaybookDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(definition.trigger.kind, TriggerKind::ShareLinkCreated);
        assert_eq!(definition.step_count(), 3);
        assert_eq!(definition.action_count(), 1);
        assert_eq!(definition.steps[0].input, json!({}));
        assert_eq!(
            definition.steps[1].input,
            json!({ "kinds": ["contract"] })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_step_type() {
        let value = json!({
            "trigger": { "kind": "manual" },
            "steps": [
                { "idx": 0, "type": "webhook", "kind": "call_out" }
            ]
        });

        let result: Result<PlaybookDefinition, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_trigger_kind() {
        let value = json!({
            "trigger": { "kind": "page_viewed" },
            "steps": [
                { "idx": 0, "type": "trigger", "kind": "page_viewed" }
            ]
        });

        let result: Result<PlaybookDefinition, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_trigger_filter_round_trip() {
        let trigger = Trigger {
            kind: TriggerKind::DocumentCreated,
            filter: Some(json!({ "document": { "kind": "contract" } })),
        };
        let value = serde_json::to_value(&trigger).unwrap();
        assert_eq!(value["kind"], "document_created");
        let back: Trigger = serde_json::from_value(value).unwrap();
        assert_eq!(back, trigger);

        // Absent filter stays absent on the wire.
        let bare = Trigger {
            kind: TriggerKind::Manual,
            filter: None,
        };
        let value = serde_json::to_value(&bare).unwrap();
        assert!(value.get("filter").is_none());
    }

    #[test]
    fn test_trigger_kind_display_and_parse() {
        for kind in [
            TriggerKind::Manual,
            TriggerKind::DocumentCreated,
            TriggerKind::ShareLinkCreated,
            TriggerKind::SignatureCompleted,
        ] {
            assert_eq!(TriggerKind::parse(&kind.to_string()), Some(kind));
        }
        assert_eq!(TriggerKind::parse("link_viewed"), None);
    }

    #[test]
    fn test_only_manual_is_not_dispatchable() {
        assert!(!TriggerKind::Manual.is_dispatchable());
        assert!(TriggerKind::DocumentCreated.is_dispatchable());
        assert!(TriggerKind::ShareLinkCreated.is_dispatchable());
        assert!(TriggerKind::SignatureCompleted.is_dispatchable());
    }

    #[test]
    fn test_step_type_display() {
        assert_eq!(StepType::Trigger.to_string(), "trigger");
        assert_eq!(StepType::Condition.to_string(), "condition");
        assert_eq!(StepType::Action.to_string(), "action");
        assert_eq!(StepType::Wait.to_string(), "wait");
        assert_eq!(StepType::Retry.to_string(), "retry");
    }

    #[test]
    fn test_steps_of_type() {
        let definition = PlaybookDefinition {
            trigger: Trigger {
                kind: TriggerKind::Manual,
                filter: None,
            },
            steps: vec![
                Step {
                    idx: 0,
                    step_type: StepType::Trigger,
                    kind: "manual".to_string(),
                    input: json!({}),
                },
                Step {
                    idx: 1,
                    step_type: StepType::Action,
                    kind: "notify_owner".to_string(),
                    input: json!({}),
                },
                Step {
                    idx: 2,
                    step_type: StepType::Action,
                    kind: "archive_to_vault".to_string(),
                    input: json!({}),
                },
            ],
        };

        let actions = definition.steps_of_type(StepType::Action);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, "notify_owner");
        assert!(definition.steps_of_type(StepType::Wait).is_empty());
    }
}
