//! Error types for planner operations.

use thiserror::Error;

/// Result type for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Errors that can occur in planner operations.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The share code could not be decoded (bad prefix, broken payload or malformed JSON).
    #[error("Invalid plan code")]
    InvalidPlanCode,

    /// A share code was requested but the input was blank.
    #[error("Please enter a share code")]
    EmptyShareCode,

    /// A text field exceeds its character cap.
    #[error("{field} must be {max} characters or less (got {actual})")]
    LengthLimit {
        /// Human readable field name.
        field: &'static str,
        /// Maximum allowed characters.
        max: usize,
        /// Characters supplied.
        actual: usize,
    },

    /// A layer name was empty after trimming.
    #[error("Layer name cannot be empty")]
    EmptyLayerName,

    /// Attempted to delete the only remaining layer.
    #[error("Cannot delete the last layer")]
    LastLayer,

    /// Layer index does not exist.
    #[error("Layer index out of range: {0}")]
    LayerOutOfRange(usize),

    /// Map id is not part of the catalog.
    #[error("Unknown map: {0}")]
    UnknownMap(String),

    /// A prompt answer arrived while no prompt of that kind was pending.
    #[error("No pending prompt to resolve")]
    NoPendingPrompt,

    /// Plan serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlannerError {
    /// Text shown to the user when this error surfaces as a notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPlanCode => "Failed to load plan. Please check the share code.".to_string(),
            Self::LengthLimit { field, max, .. } => {
                format!("{field} must be {max} characters or less")
            }
            other => other.to_string(),
        }
    }
}
