//! Database models for the Playbooks service.
//!
//! This module contains SQLx-compatible model definitions
//! for all database tables.

pub mod playbook;
pub mod run;

pub use playbook::*;
pub use run::*;
