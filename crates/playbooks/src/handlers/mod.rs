//! HTTP handlers for the Quillspace Playbooks API.
//!
//! This module contains all route handlers organized by domain.

pub mod events;
pub mod health;
pub mod playbooks;
pub mod runs;

pub use events::handle_event;
pub use health::{api_health, health_check};
