//! Playbook definition parser.
//!
//! Parses JSON definitions into [`PlaybookDefinition`] structures and
//! enforces the structural invariants:
//! - at least one step
//! - step indexes contiguous and ascending from zero
//!
//! Step `kind` and `input` are accepted as-is so definitions authored for
//! newer action handlers keep working on older deployments.

use crate::error::{AppError, AppResult};
use crate::playbook::types::PlaybookDefinition;

/// Parse a JSON value into a validated definition.
pub fn parse_definition(value: serde_json::Value) -> AppResult<PlaybookDefinition> {
    let definition: PlaybookDefinition =
        serde_json::from_value(value).map_err(|e| AppError::Parse(e.to_string()))?;

    validate_definition(&definition)?;

    Ok(definition)
}

/// Validate a parsed definition.
pub fn validate_definition(definition: &PlaybookDefinition) -> AppResult<()> {
    if definition.steps.is_empty() {
        return Err(AppError::Validation(
            "Definition must contain at least one step".to_string(),
        ));
    }

    for (position, step) in definition.steps.iter().enumerate() {
        let expected = position as i32;
        if step.idx != expected {
            return Err(AppError::Validation(format!(
                "Step at position {}: expected idx {}, found {}. \
                 Step indexes must be contiguous and ascending from 0",
                position, expected, step.idx
            )));
        }
    }

    Ok(())
}
