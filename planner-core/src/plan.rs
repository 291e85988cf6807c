//! Plans: the unit that is saved to and loaded from a share code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Layer, PlannerError, PlannerResult};

/// Maximum characters in a plan title.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum characters in a plan description.
pub const MAX_DESCRIPTION_LEN: usize = 250;

/// Logical canvas size that item coordinates are expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Width in plan units.
    pub width: f64,
    /// Height in plan units.
    pub height: f64,
}

impl Extent {
    /// Create an extent.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both sides are finite and positive, so points can be scaled
    /// into and out of it.
    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A complete strategy plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Map catalog id selecting the background image.
    pub map: String,
    /// Title, at most [`MAX_TITLE_LEN`] characters.
    #[serde(default)]
    pub title: String,
    /// Description, at most [`MAX_DESCRIPTION_LEN`] characters.
    #[serde(default)]
    pub description: String,
    /// Layers, bottom to top.
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Canvas size the coordinates were drawn against. Absent in older plans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
}

impl Plan {
    /// Create an empty plan for `map`, stamped with the current time.
    #[must_use]
    pub fn new(map: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            title: String::new(),
            description: String::new(),
            layers: Vec::new(),
            created_at: Utc::now(),
            extent: None,
        }
    }

    /// Total item count across all layers.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// Check the title and description caps.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::LengthLimit`] for the first field over its cap.
    pub fn validate(&self) -> PlannerResult<()> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> PlannerResult<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(PlannerError::LengthLimit { field, max, actual });
    }
    Ok(())
}

/// Check a plan title against [`MAX_TITLE_LEN`].
///
/// # Errors
///
/// Returns [`PlannerError::LengthLimit`] when the title is too long.
pub fn validate_title(title: &str) -> PlannerResult<()> {
    check_len("Plan title", title, MAX_TITLE_LEN)
}

/// Check a plan description against [`MAX_DESCRIPTION_LEN`].
///
/// # Errors
///
/// Returns [`PlannerError::LengthLimit`] when the description is too long.
pub fn validate_description(description: &str) -> PlannerResult<()> {
    check_len("Plan description", description, MAX_DESCRIPTION_LEN)
}
