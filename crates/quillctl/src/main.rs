mod client;
mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};

use client::{print_response, ApiClient};
use config::{Config, ServerContext};

#[derive(Parser)]
#[command(name = "quillctl")]
#[command(version, about = "Quillspace Playbooks Command Line Tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Playbooks server URL (overrides the active context)
    #[arg(long)]
    server_url: Option<String>,

    /// Org id for the x-org-id header (overrides the active context)
    #[arg(long)]
    org: Option<String>,

    /// User id for the x-user-id header (overrides the active context)
    #[arg(long)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage server contexts
    Context {
        #[command(subcommand)]
        command: ContextCommand,
    },
    /// Manage playbooks
    Playbook {
        #[command(subcommand)]
        command: PlaybookCommand,
    },
    /// Execute a playbook
    ///
    /// Runs are dry by default: steps are interpreted but nothing is
    /// recorded. Pass --live to persist a run with its step records.
    ///
    /// Examples:
    ///     quillctl run 7c0e8a9b-55d2-4f11-9c3a-8b1f12f34a01
    ///     quillctl run 7c0e8a9b-55d2-4f11-9c3a-8b1f12f34a01 --live
    #[command(verbatim_doc_comment)]
    Run {
        /// Playbook id
        playbook_id: String,

        /// Execute live and record the run
        #[arg(long)]
        live: bool,
    },
    /// Preview a playbook against a sample event
    DryRun {
        /// Playbook id
        playbook_id: String,
    },
    /// Dispatch an application event to matching active playbooks
    ///
    /// Examples:
    ///     quillctl dispatch document_created
    ///     quillctl dispatch share_link_created --payload '{"document": {"kind": "contract"}}'
    #[command(verbatim_doc_comment)]
    Dispatch {
        /// Event type: document_created, share_link_created, signature_completed
        event_type: String,

        /// Event payload as a JSON string
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
    },
    /// List recorded runs for a playbook
    Runs {
        /// Playbook id
        playbook_id: String,

        /// Maximum rows to return (server default 50, capped at 100)
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Show a run with its recorded steps
    RunDetail {
        /// Run id
        run_id: String,
    },
    /// List built-in playbook templates
    Templates,
    /// Check server health
    Health,
}

#[derive(Subcommand)]
enum ContextCommand {
    /// Add a named server context
    ///
    /// Examples:
    ///     quillctl context add local --server-url http://localhost:8084 \
    ///         --org-id 0be46047-fc82-4840-b54f-e2e94a7c7fbe \
    ///         --user-id 4c4fae8a-312a-4bbd-95be-a956d2c2e04b
    #[command(verbatim_doc_comment)]
    Add {
        /// Context name
        name: String,

        /// Playbooks server URL
        #[arg(long)]
        server_url: String,

        /// Org id sent as the x-org-id header
        #[arg(long)]
        org_id: String,

        /// User id sent as the x-user-id header
        #[arg(long)]
        user_id: String,

        /// Make this the current context
        #[arg(long)]
        set_current: bool,
    },
    /// List configured contexts
    List,
    /// Switch the current context
    Use {
        /// Context name
        name: String,
    },
    /// Delete a context
    Delete {
        /// Context name
        name: String,
    },
    /// Show the current context
    Current,
}

#[derive(Subcommand)]
enum PlaybookCommand {
    /// List playbooks in the org
    List {
        /// Filter by status: draft, active, or disabled
        #[arg(long)]
        status: Option<String>,
    },
    /// Get a playbook with its full definition
    Get {
        /// Playbook id
        id: String,
    },
    /// Create a playbook from a definition file or a built-in template
    ///
    /// New playbooks start in draft; activate them with
    /// 'quillctl playbook status <id> active'.
    ///
    /// Examples:
    ///     quillctl playbook create --name "Contract intake" --file intake.yaml
    ///     quillctl playbook create --name "Follow up" --template share-link-follow-up
    #[command(verbatim_doc_comment)]
    Create {
        /// Playbook name
        #[arg(long)]
        name: String,

        /// Definition file (JSON, or YAML by extension)
        #[arg(long, conflicts_with = "template")]
        file: Option<PathBuf>,

        /// Built-in template slug (see 'quillctl templates')
        #[arg(long)]
        template: Option<String>,
    },
    /// Update a playbook's name and/or definition
    Update {
        /// Playbook id
        id: String,

        /// New playbook name
        #[arg(long)]
        name: Option<String>,

        /// Replacement definition file (JSON, or YAML by extension)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Set a playbook's status
    Status {
        /// Playbook id
        id: String,

        /// New status: draft, active, or disabled
        status: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    let base_url = if let Some(url) = cli.server_url {
        url
    } else {
        config
            .get_current_context()
            .map(|(_, ctx)| ctx.server_url.clone())
            .unwrap_or_else(|| "http://localhost:8084".to_string())
    };

    // Context management and health work without an org identity.
    let command = match cli.command {
        Commands::Context { command } => return handle_context_command(&mut config, command),
        Commands::Health => return check_health(&base_url).await,
        command => command,
    };

    let (org_id, user_id) = resolve_identity(cli.org, cli.user, &config)?;
    tracing::debug!("Connecting to {} as org {}", base_url, org_id);
    let api = ApiClient::new(base_url, org_id, user_id);

    match command {
        Commands::Playbook { command } => handle_playbook_command(&api, command).await,
        Commands::Run { playbook_id, live } => execute_run(&api, &playbook_id, live).await,
        Commands::DryRun { playbook_id } => preview_run(&api, &playbook_id).await,
        Commands::Dispatch {
            event_type,
            payload,
        } => dispatch_event(&api, &event_type, payload.as_deref()).await,
        Commands::Runs { playbook_id, limit } => list_runs(&api, &playbook_id, limit).await,
        Commands::RunDetail { run_id } => show_run_detail(&api, &run_id).await,
        Commands::Templates => list_templates(&api).await,
        Commands::Context { .. } | Commands::Health => unreachable!("handled above"),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Resolve the org and user ids from flags or the active context.
fn resolve_identity(
    org: Option<String>,
    user: Option<String>,
    config: &Config,
) -> Result<(String, String)> {
    let context = config.get_current_context().map(|(_, ctx)| ctx);

    let org_id = org
        .or_else(|| context.map(|ctx| ctx.org_id.clone()))
        .context("No org id configured. Pass --org or add a context with 'quillctl context add'")?;
    let user_id = user.or_else(|| context.map(|ctx| ctx.user_id.clone())).context(
        "No user id configured. Pass --user or add a context with 'quillctl context add'",
    )?;

    Ok((org_id, user_id))
}

fn handle_context_command(config: &mut Config, command: ContextCommand) -> Result<()> {
    match command {
        ContextCommand::Add {
            name,
            server_url,
            org_id,
            user_id,
            set_current,
        } => {
            config.contexts.insert(
                name.clone(),
                ServerContext {
                    server_url,
                    org_id,
                    user_id,
                },
            );
            if set_current || config.current_context.is_none() {
                config.current_context = Some(name.clone());
            }
            config.save()?;
            println!("Context '{}' added.", name);
            if config.current_context.as_ref() == Some(&name) {
                println!("Context '{}' is now the current context.", name);
            }
        }
        ContextCommand::List => {
            println!("  {:<15} {:<32} {:<38}", "NAME", "SERVER URL", "ORG");
            for (name, ctx) in &config.contexts {
                let current_mark = if config.current_context.as_ref() == Some(name) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<15} {:<32} {:<38}",
                    current_mark, name, ctx.server_url, ctx.org_id
                );
            }
        }
        ContextCommand::Use { name } => {
            if let Some(ctx) = config.contexts.get(&name) {
                let server_url = ctx.server_url.clone();
                config.current_context = Some(name.clone());
                config.save()?;
                println!("Switched to context '{}' ({}).", name, server_url);
            } else {
                eprintln!("Context '{}' not found.", name);
                std::process::exit(1);
            }
        }
        ContextCommand::Delete { name } => {
            if config.contexts.remove(&name).is_some() {
                if config.current_context.as_ref() == Some(&name) {
                    config.current_context = None;
                }
                config.save()?;
                println!("Context '{}' deleted.", name);
            } else {
                eprintln!("Context '{}' not found.", name);
                std::process::exit(1);
            }
        }
        ContextCommand::Current => {
            if let Some((name, ctx)) = config.get_current_context() {
                println!("Current context: {}", name);
                println!("  Server URL: {}", ctx.server_url);
                println!("  Org id:     {}", ctx.org_id);
                println!("  User id:    {}", ctx.user_id);
            } else {
                println!("No current context set.");
            }
        }
    }
    Ok(())
}

async fn handle_playbook_command(api: &ApiClient, command: PlaybookCommand) -> Result<()> {
    match command {
        PlaybookCommand::List { status } => {
            let path = match status {
                Some(status) => format!("/api/playbooks?status={}", status),
                None => "/api/playbooks".to_string(),
            };
            print_response(api.get(&path).await?).await
        }
        PlaybookCommand::Get { id } => {
            print_response(api.get(&format!("/api/playbooks/{}", id)).await?).await
        }
        PlaybookCommand::Create {
            name,
            file,
            template,
        } => create_playbook(api, &name, file.as_deref(), template.as_deref()).await,
        PlaybookCommand::Update { id, name, file } => {
            update_playbook(api, &id, name.as_deref(), file.as_deref()).await
        }
        PlaybookCommand::Status { id, status } => {
            let body = serde_json::json!({ "status": status });
            print_response(
                api.post(&format!("/api/playbooks/{}/status", id), &body)
                    .await?,
            )
            .await
        }
    }
}

async fn create_playbook(
    api: &ApiClient,
    name: &str,
    file: Option<&Path>,
    template: Option<&str>,
) -> Result<()> {
    let body = match (file, template) {
        (Some(path), None) => {
            let definition = read_definition_file(path)?;
            serde_json::json!({ "name": name, "definition": definition })
        }
        (None, Some(slug)) => serde_json::json!({ "name": name, "template": slug }),
        _ => anyhow::bail!("Provide exactly one of --file or --template"),
    };
    print_response(api.post("/api/playbooks", &body).await?).await
}

async fn update_playbook(
    api: &ApiClient,
    id: &str,
    name: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let mut body = serde_json::Map::new();
    if let Some(name) = name {
        body.insert("name".to_string(), serde_json::json!(name));
    }
    if let Some(path) = file {
        body.insert("definition".to_string(), read_definition_file(path)?);
    }
    if body.is_empty() {
        anyhow::bail!("Provide --name and/or --file");
    }
    print_response(
        api.put(
            &format!("/api/playbooks/{}", id),
            &serde_json::Value::Object(body),
        )
        .await?,
    )
    .await
}

async fn execute_run(api: &ApiClient, playbook_id: &str, live: bool) -> Result<()> {
    let mode = if live { "live" } else { "dry_run" };
    let body = serde_json::json!({ "playbook_id": playbook_id, "mode": mode });
    print_response(api.post("/api/playbooks/run", &body).await?).await
}

async fn preview_run(api: &ApiClient, playbook_id: &str) -> Result<()> {
    print_response(
        api.get(&format!("/api/playbooks/{}/dry-run", playbook_id))
            .await?,
    )
    .await
}

async fn dispatch_event(api: &ApiClient, event_type: &str, payload: Option<&str>) -> Result<()> {
    let payload: serde_json::Value = match payload {
        Some(raw) => serde_json::from_str(raw).context("Failed to parse --payload JSON")?,
        None => serde_json::Value::Object(serde_json::Map::new()),
    };
    let body = serde_json::json!({ "event_type": event_type, "payload": payload });
    print_response(api.post("/api/events", &body).await?).await
}

async fn list_runs(api: &ApiClient, playbook_id: &str, limit: Option<i64>) -> Result<()> {
    let path = match limit {
        Some(limit) => format!("/api/playbooks/{}/runs?limit={}", playbook_id, limit),
        None => format!("/api/playbooks/{}/runs", playbook_id),
    };
    print_response(api.get(&path).await?).await
}

async fn show_run_detail(api: &ApiClient, run_id: &str) -> Result<()> {
    print_response(api.get(&format!("/api/runs/{}", run_id)).await?).await
}

async fn list_templates(api: &ApiClient) -> Result<()> {
    print_response(api.get("/api/playbooks/templates").await?).await
}

async fn check_health(base_url: &str) -> Result<()> {
    let response = reqwest::get(format!("{}/api/health", base_url))
        .await
        .context("Failed to send health request")?;

    if response.status().is_success() {
        let result: serde_json::Value = response.json().await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        eprintln!("Server unhealthy: {} - {}", status, text);
        std::process::exit(1);
    }
}

/// Read a playbook definition from disk, parsing YAML or JSON by file
/// extension. Either way the result is the JSON value the API expects.
fn read_definition_file(path: &Path) -> Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).context(format!("Failed to read definition file: {:?}", path))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content)
            .context(format!("Failed to parse YAML definition from: {:?}", path))
    } else {
        serde_json::from_str(&content)
            .context(format!("Failed to parse JSON definition from: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_context() -> Config {
        let mut config = Config::default();
        config.contexts.insert(
            "local".to_string(),
            ServerContext {
                server_url: "http://localhost:8084".to_string(),
                org_id: "org-from-context".to_string(),
                user_id: "user-from-context".to_string(),
            },
        );
        config.current_context = Some("local".to_string());
        config
    }

    #[test]
    fn test_identity_prefers_flags_over_context() {
        let config = config_with_context();
        let (org, user) = resolve_identity(
            Some("org-from-flag".to_string()),
            None,
            &config,
        )
        .unwrap();
        assert_eq!(org, "org-from-flag");
        assert_eq!(user, "user-from-context");
    }

    #[test]
    fn test_identity_fails_without_context_or_flags() {
        let config = Config::default();
        let err = resolve_identity(None, None, &config).unwrap_err();
        assert!(err.to_string().contains("No org id configured"));
    }

    #[test]
    fn test_definition_file_parses_yaml_by_extension() {
        let dir = std::env::temp_dir();
        let path = dir.join("quillctl-test-definition.yaml");
        fs::write(
            &path,
            "trigger:\n  kind: document_created\nsteps:\n  - idx: 0\n    type: trigger\n    kind: document_created\n",
        )
        .unwrap();

        let value = read_definition_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(value["trigger"]["kind"], "document_created");
        assert_eq!(value["steps"][0]["type"], "trigger");
    }

    #[test]
    fn test_definition_file_rejects_malformed_json() {
        let dir = std::env::temp_dir();
        let path = dir.join("quillctl-test-definition.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_definition_file(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(err.to_string().contains("Failed to parse JSON definition"));
    }
}
