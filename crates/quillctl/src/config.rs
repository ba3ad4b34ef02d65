//! CLI configuration stored at `~/.quillspace/config.yaml`.
//!
//! A config holds named server contexts so operators can switch between
//! deployments (local, staging, production) without retyping connection
//! details on every command.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context as ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// A named server context: where to connect and who the caller is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerContext {
    pub server_url: String,
    pub org_id: String,
    pub user_id: String,
}

/// Persistent CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub current_context: Option<String>,
    #[serde(default)]
    pub contexts: HashMap<String, ServerContext>,
}

impl Config {
    fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".quillspace").join("config.yaml"))
    }

    /// Load the config file, or an empty config when none exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Write the config back, creating `~/.quillspace/` on first use.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// The active context, if `current_context` names one that exists.
    pub fn get_current_context(&self) -> Option<(&String, &ServerContext)> {
        self.current_context
            .as_ref()
            .and_then(|name| self.contexts.get(name).map(|ctx| (name, ctx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context(url: &str) -> ServerContext {
        ServerContext {
            server_url: url.to_string(),
            org_id: "0be46047-fc82-4840-b54f-e2e94a7c7fbe".to_string(),
            user_id: "4c4fae8a-312a-4bbd-95be-a956d2c2e04b".to_string(),
        }
    }

    #[test]
    fn roundtrips_through_yaml() {
        let mut config = Config::default();
        config
            .contexts
            .insert("local".to_string(), sample_context("http://localhost:8084"));
        config.current_context = Some("local".to_string());

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.current_context.as_deref(), Some("local"));
        assert_eq!(
            parsed.contexts["local"].server_url,
            "http://localhost:8084"
        );
    }

    #[test]
    fn current_context_requires_a_matching_entry() {
        let mut config = Config::default();
        config.current_context = Some("missing".to_string());
        assert!(config.get_current_context().is_none());

        config
            .contexts
            .insert("staging".to_string(), sample_context("https://staging.example.com"));
        config.current_context = Some("staging".to_string());

        let (name, ctx) = config.get_current_context().unwrap();
        assert_eq!(name, "staging");
        assert_eq!(ctx.server_url, "https://staging.example.com");
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let parsed: Config = serde_yaml::from_str("{}").unwrap();
        assert!(parsed.current_context.is_none());
        assert!(parsed.contexts.is_empty());
    }
}
