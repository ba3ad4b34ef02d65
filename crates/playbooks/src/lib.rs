//! Quillspace Playbooks Library
//!
//! This crate provides the Playbooks automation service for Quillspace,
//! handling:
//!
//! - **Playbook Management**: Create, update, and toggle automation recipes
//! - **Step Interpretation**: Walk definition steps and produce outcome records
//! - **Run Recording**: Persist the audit trail of every live run
//! - **Event Dispatch**: Route document events to matching active playbooks
//! - **Dry-Run Simulation**: Report what a playbook would do, without side effects
//!
//! ## Architecture
//!
//! Playbooks are JSON definitions (a trigger plus ordered steps) stored in
//! PostgreSQL. The interpreter is pure and deterministic; persistence and
//! dispatch wrap it in the service layer. Org scoping arrives on every
//! request via gateway headers.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Database connectivity, row models, and queries
//! - [`engine`]: Interpreter, action registry, and dry-run simulator
//! - [`error`]: Custom error types with Axum integration
//! - [`handlers`]: HTTP route handlers
//! - [`playbook`]: Definition types, parsing, validation, and templates
//! - [`services`]: Business logic between handlers and queries
//! - [`state`]: Shared application state
//! - [`tenant`]: Org context extraction from gateway headers
//!
//! ## Example
//!
//! ```ignore
//! use quillspace_playbooks::{
//!     config::{AppConfig, DatabaseConfig},
//!     db::create_pool,
//!     state::AppState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app_config = AppConfig::from_env()?;
//!     let db_config = DatabaseConfig::from_env()?;
//!     let db_pool = create_pool(&db_config);
//!     let state = AppState::new(db_pool, app_config);
//!     // ... build and run server
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod playbook;
pub mod result_ext;
pub mod services;
pub mod state;
pub mod tenant;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
