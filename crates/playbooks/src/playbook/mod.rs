//! Playbook definition model.
//!
//! This module provides definition parsing and validation:
//! - Type definitions for the trigger/step structure
//! - JSON parsing
//! - Structural validation
//! - Built-in templates

pub mod parser;
pub mod templates;
pub mod types;

pub use parser::{parse_definition, validate_definition};
pub use types::{PlaybookDefinition, Step, StepType, Trigger, TriggerKind};
