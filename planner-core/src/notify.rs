//! User-facing notifications and modal prompts.
//!
//! The planner has no UI of its own. It queues [`Notification`]s for the host
//! to show as toasts, and raises a [`Prompt`] when it needs an answer before
//! it can continue.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Neutral information.
    Info,
    /// An action completed.
    Success,
    /// An action was refused but nothing is wrong.
    Warning,
    /// An action failed.
    Error,
}

/// A toast message for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text to show.
    pub message: String,
}

impl Notification {
    /// Create a notification.
    #[must_use]
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Mirror this notification to the log at a matching level.
    pub(crate) fn log(&self) {
        match self.level {
            NotificationLevel::Info | NotificationLevel::Success => {
                tracing::info!(level = ?self.level, "{}", self.message);
            }
            NotificationLevel::Warning => tracing::warn!("{}", self.message),
            NotificationLevel::Error => tracing::error!("{}", self.message),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Destructive action awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Delete the current layer.
    DeleteLayer,
    /// Remove every item from the current layer.
    ClearLayer,
}

impl ConfirmAction {
    /// Dialog title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::DeleteLayer => "Delete Layer",
            Self::ClearLayer => "Clear Canvas",
        }
    }

    /// Dialog body.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::DeleteLayer => {
                "Are you sure you want to delete this layer? All drawings on this layer will be lost."
            }
            Self::ClearLayer => {
                "Are you sure you want to clear the current layer? All drawings will be lost."
            }
        }
    }
}

/// A question the host must answer before the planner continues.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Ask for the content of a text item placed at `at` (plan space).
    TextEntry {
        /// Anchor of the text item.
        at: Point,
    },
    /// Ask for a new name for a layer.
    RenameLayer {
        /// Layer index.
        index: usize,
        /// Name to pre-fill.
        current: String,
    },
    /// Ask the user to confirm a destructive action.
    Confirm(ConfirmAction),
}
