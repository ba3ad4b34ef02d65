//! Playbook execution engine.
//!
//! This module provides the core execution machinery for playbooks:
//!
//! - **Interpreter**: Walks definition steps and produces outcomes and stats
//! - **Actions**: Registry of action kinds with human-readable summaries
//! - **Simulator**: Dry-run projection of what a playbook would do

pub mod actions;
pub mod interpreter;
pub mod simulator;

pub use actions::{ActionHandler, ActionRegistry};
pub use interpreter::{
    Interpretation, RunMode, StepInterpreter, StepOutcome, StepStatus, TIME_SAVED_PER_ACTION_SECS,
};
pub use simulator::{DryRunPreview, DryRunSimulator};
