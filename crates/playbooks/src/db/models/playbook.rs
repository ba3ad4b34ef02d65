//! Playbook model and API shapes.
//!
//! A playbook row stores the denormalized trigger kind alongside the full
//! definition JSON so the dispatcher can match candidates with one indexed
//! lookup instead of unpacking every definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of a playbook.
///
/// The canonical vocabulary is `draft`, `active`, `disabled`. Earlier
/// clients wrote `enabled` and `inactive`; those are accepted on input and
/// normalized on the way out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaybookStatus {
    Draft,
    Active,
    Disabled,
}

impl std::fmt::Display for PlaybookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlaybookStatus::Draft => "draft",
            PlaybookStatus::Active => "active",
            PlaybookStatus::Disabled => "disabled",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for PlaybookStatus {
    fn from(s: &str) -> Self {
        // Lenient mapping for rows written by older clients.
        PlaybookStatus::parse(s).unwrap_or(PlaybookStatus::Draft)
    }
}

impl PlaybookStatus {
    /// Strict parse used for API input. Accepts the canonical values and
    /// the legacy aliases; anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(PlaybookStatus::Draft),
            "active" | "enabled" => Some(PlaybookStatus::Active),
            "disabled" | "inactive" => Some(PlaybookStatus::Disabled),
            _ => None,
        }
    }
}

/// Database playbook record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Playbook {
    /// Primary key.
    pub id: Uuid,

    /// Owning organization.
    pub org_id: Uuid,

    /// User who created the playbook.
    pub owner_id: Uuid,

    /// Display name.
    pub name: String,

    /// Lifecycle status (draft, active, disabled).
    pub status: String,

    /// Denormalized trigger kind from the definition.
    pub trigger_kind: String,

    /// Full definition JSON (trigger + steps).
    pub definition: serde_json::Value,

    /// When the playbook was created.
    pub created_at: DateTime<Utc>,

    /// When the playbook was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Playbook {
    /// Typed view of the status column.
    pub fn status_enum(&self) -> PlaybookStatus {
        PlaybookStatus::from(self.status.as_str())
    }
}

/// Request to create a new playbook.
///
/// Exactly one of `definition` and `template` must be provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookCreateRequest {
    /// Display name.
    pub name: String,

    /// Inline definition JSON.
    #[serde(default)]
    pub definition: Option<serde_json::Value>,

    /// Slug of a built-in template to instantiate.
    #[serde(default)]
    pub template: Option<String>,
}

impl PlaybookCreateRequest {
    /// Validate the request shape.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("'name' must not be empty".to_string());
        }
        match (&self.definition, &self.template) {
            (None, None) => Err("either 'definition' or 'template' must be provided".to_string()),
            (Some(_), Some(_)) => {
                Err("'definition' and 'template' are mutually exclusive".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Request to update an existing playbook.
///
/// A supplied definition replaces the stored one wholesale; definitions are
/// never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookUpdateRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Replacement definition JSON.
    #[serde(default)]
    pub definition: Option<serde_json::Value>,
}

/// Request to change a playbook's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// Target status (draft, active, disabled; legacy enabled/inactive).
    pub status: String,
}

/// Playbook summary for list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookSummary {
    /// Playbook ID.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Lifecycle status.
    pub status: String,

    /// Trigger kind.
    pub trigger_kind: String,

    /// Created at.
    pub created_at: DateTime<Utc>,

    /// Updated at.
    pub updated_at: DateTime<Utc>,
}

impl From<Playbook> for PlaybookSummary {
    fn from(p: Playbook) -> Self {
        Self {
            id: p.id,
            name: p.name,
            status: PlaybookStatus::from(p.status.as_str()).to_string(),
            trigger_kind: p.trigger_kind,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Full playbook response including the definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookDetail {
    /// Playbook ID.
    pub id: Uuid,

    /// Owning organization.
    pub org_id: Uuid,

    /// User who created the playbook.
    pub owner_id: Uuid,

    /// Display name.
    pub name: String,

    /// Lifecycle status.
    pub status: String,

    /// Trigger kind.
    pub trigger_kind: String,

    /// Definition JSON.
    pub definition: serde_json::Value,

    /// Created at.
    pub created_at: DateTime<Utc>,

    /// Updated at.
    pub updated_at: DateTime<Utc>,
}

impl From<Playbook> for PlaybookDetail {
    fn from(p: Playbook) -> Self {
        Self {
            id: p.id,
            org_id: p.org_id,
            owner_id: p.owner_id,
            name: p.name,
            status: PlaybookStatus::from(p.status.as_str()).to_string(),
            trigger_kind: p.trigger_kind,
            definition: p.definition,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// List of playbooks response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookListResponse {
    /// Playbooks in the organization, newest first.
    pub playbooks: Vec<PlaybookSummary>,

    /// Total count.
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(PlaybookStatus::Draft.to_string(), "draft");
        assert_eq!(PlaybookStatus::Active.to_string(), "active");
        assert_eq!(PlaybookStatus::Disabled.to_string(), "disabled");
    }

    #[test]
    fn test_status_parse_canonical() {
        assert_eq!(PlaybookStatus::parse("draft"), Some(PlaybookStatus::Draft));
        assert_eq!(PlaybookStatus::parse("active"), Some(PlaybookStatus::Active));
        assert_eq!(
            PlaybookStatus::parse("disabled"),
            Some(PlaybookStatus::Disabled)
        );
    }

    #[test]
    fn test_status_parse_legacy_aliases() {
        assert_eq!(
            PlaybookStatus::parse("enabled"),
            Some(PlaybookStatus::Active)
        );
        assert_eq!(
            PlaybookStatus::parse("inactive"),
            Some(PlaybookStatus::Disabled)
        );
        assert_eq!(
            PlaybookStatus::parse("Enabled"),
            Some(PlaybookStatus::Active)
        );
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(PlaybookStatus::parse("archived"), None);
        assert_eq!(PlaybookStatus::parse(""), None);
    }

    #[test]
    fn test_lenient_from_defaults_to_draft() {
        assert_eq!(PlaybookStatus::from("garbage"), PlaybookStatus::Draft);
        assert_eq!(PlaybookStatus::from("enabled"), PlaybookStatus::Active);
    }

    #[test]
    fn test_create_request_requires_one_source() {
        let req = PlaybookCreateRequest {
            name: "Follow up".to_string(),
            definition: None,
            template: None,
        };
        assert!(req.validate().is_err());

        let req = PlaybookCreateRequest {
            name: "Follow up".to_string(),
            definition: Some(serde_json::json!({})),
            template: Some("share-link-follow-up".to_string()),
        };
        assert!(req.validate().is_err());

        let req = PlaybookCreateRequest {
            name: "Follow up".to_string(),
            definition: None,
            template: Some("share-link-follow-up".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_blank_name() {
        let req = PlaybookCreateRequest {
            name: "   ".to_string(),
            definition: None,
            template: Some("share-link-follow-up".to_string()),
        };
        assert!(req.validate().is_err());
    }
}
