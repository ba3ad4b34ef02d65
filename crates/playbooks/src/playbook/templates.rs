//! Built-in playbook templates.
//!
//! Templates are complete, valid definitions users can instantiate from
//! the template picker instead of authoring steps by hand. Slugs are part
//! of the public API; renaming one breaks existing create requests.

use serde::Serialize;
use serde_json::json;

use crate::playbook::types::{PlaybookDefinition, Step, StepType, Trigger, TriggerKind};

/// A built-in template: a named, ready-to-use definition.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybookTemplate {
    /// Stable identifier used in create requests.
    pub slug: &'static str,

    /// Display name.
    pub name: &'static str,

    /// One-line description for the picker.
    pub description: &'static str,

    /// The definition to instantiate.
    pub definition: PlaybookDefinition,
}

fn step(idx: i32, step_type: StepType, kind: &str, input: serde_json::Value) -> Step {
    Step {
        idx,
        step_type,
        kind: kind.to_string(),
        input,
    }
}

/// All built-in templates, in picker order.
pub fn builtin_templates() -> Vec<PlaybookTemplate> {
    vec![
        PlaybookTemplate {
            slug: "share-link-follow-up",
            name: "Share link follow-up",
            description: "Nudge the owner when a shared contract goes quiet",
            definition: PlaybookDefinition {
                trigger: Trigger {
                    kind: TriggerKind::ShareLinkCreated,
                    filter: None,
                },
                steps: vec![
                    step(0, StepType::Trigger, "share_link_created", json!({})),
                    step(
                        1,
                        StepType::Condition,
                        "document_kind_matches",
                        json!({ "kinds": ["contract", "proposal"] }),
                    ),
                    step(
                        2,
                        StepType::Action,
                        "notify_owner",
                        json!({ "channel": "email" }),
                    ),
                    step(3, StepType::Wait, "delay", json!({ "hours": 24 })),
                    step(
                        4,
                        StepType::Action,
                        "send_reminder",
                        json!({ "channel": "email", "template": "share_link_nudge" }),
                    ),
                ],
            },
        },
        PlaybookTemplate {
            slug: "signature-archival",
            name: "Signature archival",
            description: "File every signed document and tell the owner",
            definition: PlaybookDefinition {
                trigger: Trigger {
                    kind: TriggerKind::SignatureCompleted,
                    filter: None,
                },
                steps: vec![
                    step(0, StepType::Trigger, "signature_completed", json!({})),
                    step(
                        1,
                        StepType::Action,
                        "generate_document",
                        json!({ "template": "completion_certificate" }),
                    ),
                    step(
                        2,
                        StepType::Action,
                        "archive_to_vault",
                        json!({ "folder": "signed" }),
                    ),
                    step(
                        3,
                        StepType::Action,
                        "notify_owner",
                        json!({ "channel": "email" }),
                    ),
                ],
            },
        },
        PlaybookTemplate {
            slug: "contract-intake",
            name: "Contract intake",
            description: "Route new contracts straight to signature",
            definition: PlaybookDefinition {
                trigger: Trigger {
                    kind: TriggerKind::DocumentCreated,
                    filter: Some(json!({ "document": { "kind": "contract" } })),
                },
                steps: vec![
                    step(0, StepType::Trigger, "document_created", json!({})),
                    step(
                        1,
                        StepType::Condition,
                        "document_kind_matches",
                        json!({ "kinds": ["contract"] }),
                    ),
                    step(
                        2,
                        StepType::Action,
                        "prepare_share_link",
                        json!({ "expires_in_days": 14 }),
                    ),
                    step(
                        3,
                        StepType::Retry,
                        "backoff",
                        json!({ "max_attempts": 3, "backoff": "exponential" }),
                    ),
                    step(
                        4,
                        StepType::Action,
                        "send_for_signature",
                        json!({ "provider": "quillsign" }),
                    ),
                ],
            },
        },
    ]
}

/// Look up a template by slug.
pub fn template_by_slug(slug: &str) -> Option<PlaybookTemplate> {
    builtin_templates().into_iter().find(|t| t.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playbook::parser::validate_definition;

    #[test]
    fn test_all_templates_are_valid_definitions() {
        for template in builtin_templates() {
            assert!(
                validate_definition(&template.definition).is_ok(),
                "template '{}' failed validation",
                template.slug
            );
        }
    }

    #[test]
    fn test_template_slugs_are_unique() {
        let templates = builtin_templates();
        let mut slugs: Vec<&str> = templates.iter().map(|t| t.slug).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), templates.len());
    }

    #[test]
    fn test_template_lookup() {
        let template = template_by_slug("share-link-follow-up").unwrap();
        assert_eq!(template.definition.trigger.kind, TriggerKind::ShareLinkCreated);
        assert!(template_by_slug("no-such-template").is_none());
    }

    #[test]
    fn test_templates_cover_the_step_vocabulary() {
        let mut seen = std::collections::HashSet::new();
        for template in builtin_templates() {
            for s in &template.definition.steps {
                seen.insert(s.step_type);
            }
        }
        for step_type in [
            StepType::Trigger,
            StepType::Condition,
            StepType::Action,
            StepType::Wait,
            StepType::Retry,
        ] {
            assert!(seen.contains(&step_type), "no template uses {}", step_type);
        }
    }

    #[test]
    fn test_contract_intake_carries_trigger_filter() {
        let template = template_by_slug("contract-intake").unwrap();
        let filter = template.definition.trigger.filter.unwrap();
        assert_eq!(filter["document"]["kind"], "contract");
    }
}
