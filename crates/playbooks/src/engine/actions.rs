//! Action handler registry.
//!
//! Handlers describe what an action step would do; the interpreter folds
//! their summaries into step notes. Kinds without a registered handler
//! still interpret (the contract with real executors is honored by
//! convention), they just get a generic summary.

use std::collections::HashMap;
use std::sync::Arc;

/// A registered action kind.
pub trait ActionHandler: Send + Sync {
    /// Step kind this handler serves, e.g. `notify_owner`.
    fn kind(&self) -> &'static str;

    /// One-line summary of what the action would do with this input.
    fn summary(&self, input: &serde_json::Value) -> String;
}

/// Registry of known action handlers.
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in document workflow handlers.
    pub fn with_builtin_handlers() -> Self {
        let mut registry = Self::new();
        registry.register(PrepareShareLink);
        registry.register(LogSelection);
        registry.register(NotifyOwner);
        registry.register(SendForSignature);
        registry.register(ArchiveToVault);
        registry.register(SendReminder);
        registry.register(GenerateDocument);
        registry
    }

    /// Register a handler.
    pub fn register<H: ActionHandler + 'static>(&mut self, handler: H) {
        let kind = handler.kind().to_string();
        self.handlers.insert(kind, Arc::new(handler));
    }

    /// Get a handler by kind.
    pub fn get(&self, kind: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(kind).cloned()
    }

    /// Check if a handler is registered.
    pub fn has(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// List registered kinds, sorted for stable output.
    pub fn list(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Summary for a kind, falling back to a generic line for unknown kinds.
    pub fn summary(&self, kind: &str, input: &serde_json::Value) -> String {
        match self.get(kind) {
            Some(handler) => handler.summary(input),
            None => format!("action '{}'", kind),
        }
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("handlers", &self.list())
            .finish()
    }
}

fn input_str<'a>(input: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(|v| v.as_str())
}

/// Prepare a share link for a document.
struct PrepareShareLink;

impl ActionHandler for PrepareShareLink {
    fn kind(&self) -> &'static str {
        "prepare_share_link"
    }

    fn summary(&self, input: &serde_json::Value) -> String {
        match input_str(input, "document_id") {
            Some(id) => format!("prepare a share link for document {}", id),
            None => "prepare a share link for the triggering document".to_string(),
        }
    }
}

/// Record the document selection in the activity log.
struct LogSelection;

impl ActionHandler for LogSelection {
    fn kind(&self) -> &'static str {
        "log_selection"
    }

    fn summary(&self, _input: &serde_json::Value) -> String {
        "record the document selection in the activity log".to_string()
    }
}

/// Notify the document owner.
struct NotifyOwner;

impl ActionHandler for NotifyOwner {
    fn kind(&self) -> &'static str {
        "notify_owner"
    }

    fn summary(&self, input: &serde_json::Value) -> String {
        match input_str(input, "channel") {
            Some(channel) => format!("notify the document owner via {}", channel),
            None => "notify the document owner".to_string(),
        }
    }
}

/// Send the document out for signature.
struct SendForSignature;

impl ActionHandler for SendForSignature {
    fn kind(&self) -> &'static str {
        "send_for_signature"
    }

    fn summary(&self, input: &serde_json::Value) -> String {
        match input_str(input, "provider") {
            Some(provider) => format!("send the document for signature via {}", provider),
            None => "send the document for signature".to_string(),
        }
    }
}

/// Archive the document to the vault.
struct ArchiveToVault;

impl ActionHandler for ArchiveToVault {
    fn kind(&self) -> &'static str {
        "archive_to_vault"
    }

    fn summary(&self, input: &serde_json::Value) -> String {
        match input_str(input, "folder") {
            Some(folder) => format!("archive the document to vault folder '{}'", folder),
            None => "archive the document to the vault".to_string(),
        }
    }
}

/// Send a reminder to outstanding recipients.
struct SendReminder;

impl ActionHandler for SendReminder {
    fn kind(&self) -> &'static str {
        "send_reminder"
    }

    fn summary(&self, input: &serde_json::Value) -> String {
        match input_str(input, "channel") {
            Some(channel) => format!("send a reminder via {}", channel),
            None => "send a reminder to outstanding recipients".to_string(),
        }
    }
}

/// Generate a document from a template.
struct GenerateDocument;

impl ActionHandler for GenerateDocument {
    fn kind(&self) -> &'static str {
        "generate_document"
    }

    fn summary(&self, input: &serde_json::Value) -> String {
        match input_str(input, "template") {
            Some(template) => format!("generate a document from template '{}'", template),
            None => "generate a document".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct MockAction;

    impl ActionHandler for MockAction {
        fn kind(&self) -> &'static str {
            "mock"
        }

        fn summary(&self, _input: &serde_json::Value) -> String {
            "do the mock thing".to_string()
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = ActionRegistry::new();
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_registry_register() {
        let mut registry = ActionRegistry::new();
        registry.register(MockAction);

        assert!(registry.has("mock"));
        assert!(!registry.has("unknown"));
        assert_eq!(registry.list(), vec!["mock"]);
        assert_eq!(registry.summary("mock", &json!({})), "do the mock thing");
    }

    #[test]
    fn test_builtin_handlers_present() {
        let registry = ActionRegistry::with_builtin_handlers();
        assert_eq!(
            registry.list(),
            vec![
                "archive_to_vault",
                "generate_document",
                "log_selection",
                "notify_owner",
                "prepare_share_link",
                "send_for_signature",
                "send_reminder",
            ]
        );
    }

    #[test]
    fn test_summary_uses_input() {
        let registry = ActionRegistry::with_builtin_handlers();
        assert_eq!(
            registry.summary("notify_owner", &json!({ "channel": "slack" })),
            "notify the document owner via slack"
        );
        assert_eq!(
            registry.summary("notify_owner", &json!({})),
            "notify the document owner"
        );
        assert_eq!(
            registry.summary(
                "prepare_share_link",
                &json!({ "document_id": "doc-42" })
            ),
            "prepare a share link for document doc-42"
        );
    }

    #[test]
    fn test_summary_falls_back_for_unknown_kind() {
        let registry = ActionRegistry::with_builtin_handlers();
        assert_eq!(
            registry.summary("teleport_document", &json!({})),
            "action 'teleport_document'"
        );
    }
}
