//! Planner configuration.

use serde::{Deserialize, Serialize};

use crate::catalog::MapCatalog;
use crate::history::DEFAULT_HISTORY_DEPTH;
use crate::plan::Extent;
use crate::{PlannerResult, Style};

/// Configuration for a [`crate::Planner`].
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Initial stroke color.
    pub color: String,
    /// Initial stroke width.
    pub width: f64,
    /// Initial opacity.
    pub opacity: f64,
    /// Maximum undo steps kept.
    pub history_depth: usize,
    /// Initial viewport width in pixels.
    pub canvas_width: f64,
    /// Initial viewport height in pixels.
    pub canvas_height: f64,
    /// Selectable maps.
    pub maps: MapCatalog,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            color: "#ff8300".to_string(),
            width: 3.0,
            opacity: 1.0,
            history_depth: DEFAULT_HISTORY_DEPTH,
            canvas_width: 800.0,
            canvas_height: 800.0,
            maps: MapCatalog::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PlannerError::Serialization`] if the JSON is malformed.
    pub fn from_json(json: &str) -> PlannerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Initial drawing style.
    #[must_use]
    pub fn style(&self) -> Style {
        Style::new(self.color.clone(), self.width, self.opacity)
    }

    /// Initial viewport. A non-positive or non-finite canvas size falls
    /// back to the default 800x800.
    #[must_use]
    pub fn viewport(&self) -> Extent {
        let viewport = Extent::new(self.canvas_width, self.canvas_height);
        if viewport.is_drawable() {
            return viewport;
        }
        tracing::warn!(
            width = self.canvas_width,
            height = self.canvas_height,
            "Ignoring degenerate canvas size"
        );
        let defaults = Self::default();
        Extent::new(defaults.canvas_width, defaults.canvas_height)
    }
}
