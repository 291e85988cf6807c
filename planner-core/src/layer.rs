//! Layers: named, independently toggleable drawing surfaces.

use serde::{Deserialize, Serialize};

use crate::{Item, PlannerError, PlannerResult};

/// Maximum characters in a layer name.
pub const MAX_LAYER_NAME_LEN: usize = 25;

/// A named stack of items. Z-order is list order, first item at the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Display name.
    pub name: String,
    /// Whether the layer is drawn.
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    /// Items, bottom to top.
    #[serde(rename = "drawing", default)]
    pub items: Vec<Item>,
}

fn visible_by_default() -> bool {
    true
}

impl Layer {
    /// Create an empty, visible layer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            items: Vec::new(),
        }
    }

    /// Default name for the layer at 1-based position `n`.
    #[must_use]
    pub fn default_name(n: usize) -> String {
        format!("Layer {n}")
    }

    /// Index of the topmost item matching `pred`.
    pub fn topmost(&self, mut pred: impl FnMut(&Item) -> bool) -> Option<usize> {
        self.items.iter().rposition(|item| pred(item))
    }

    /// Number of items on the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the layer has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Trim and validate a proposed layer name.
///
/// # Errors
///
/// Returns [`PlannerError::EmptyLayerName`] for blank input and
/// [`PlannerError::LengthLimit`] when the trimmed name is longer than
/// [`MAX_LAYER_NAME_LEN`] characters.
pub fn validate_layer_name(name: &str) -> PlannerResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::EmptyLayerName);
    }
    let actual = trimmed.chars().count();
    if actual > MAX_LAYER_NAME_LEN {
        return Err(PlannerError::LengthLimit {
            field: "Layer name",
            max: MAX_LAYER_NAME_LEN,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name() {
        assert_eq!(Layer::default_name(3), "Layer 3");
        assert!(Layer::new("x").visible);
    }

    #[test]
    fn test_validate_layer_name() {
        assert_eq!(validate_layer_name("  Push A  ").expect("valid"), "Push A");
        assert!(matches!(
            validate_layer_name("   "),
            Err(PlannerError::EmptyLayerName)
        ));
        let long = "x".repeat(30);
        assert!(matches!(
            validate_layer_name(&long),
            Err(PlannerError::LengthLimit { max: 25, actual: 30, .. })
        ));
        assert!(validate_layer_name(&"y".repeat(25)).is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let layer: Layer = serde_json::from_str(r#"{"name":"Layer 1"}"#).expect("parse");
        assert!(layer.visible);
        assert!(layer.is_empty());
    }
}
