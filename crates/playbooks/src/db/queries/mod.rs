//! Database queries for the Quillspace Playbooks service.
//!
//! This module contains database query functions organized by domain.

pub mod playbook;
pub mod run;
