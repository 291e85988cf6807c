//! Tools, cursors and the interaction state machine's states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::Item;

/// The active drawing tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Select, move, resize and rotate items.
    #[default]
    Select,
    /// Freehand drawing.
    Freehand,
    /// Straight line.
    Line,
    /// Line with an arrowhead.
    Arrow,
    /// Rectangle.
    Rectangle,
    /// Circle.
    Circle,
    /// Text label.
    Text,
    /// Eraser.
    Erase,
}

impl Tool {
    /// Every tool, in toolbar order.
    pub const ALL: [Self; 8] = [
        Self::Select,
        Self::Freehand,
        Self::Line,
        Self::Arrow,
        Self::Rectangle,
        Self::Circle,
        Self::Text,
        Self::Erase,
    ];

    /// Toolbar identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Freehand => "freehand",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::Erase => "erase",
        }
    }

    /// Canvas cursor while the tool is active and nothing is hovered.
    #[must_use]
    pub fn cursor(self) -> Cursor {
        match self {
            Self::Select => Cursor::Default,
            Self::Erase => Cursor::Cell,
            _ => Cursor::Crosshair,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown tool name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Mouse cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    /// Platform arrow.
    Default,
    /// Crosshair for drawing tools.
    Crosshair,
    /// Cell cursor for the eraser.
    Cell,
    /// Over a movable item or a line endpoint.
    Move,
    /// Over a rotation handle.
    Grab,
    /// North-west / south-east resize.
    NwseResize,
    /// North-east / south-west resize.
    NeswResize,
    /// Vertical resize.
    NsResize,
    /// Horizontal resize.
    EwResize,
}

impl Cursor {
    /// CSS cursor keyword.
    #[must_use]
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Crosshair => "crosshair",
            Self::Cell => "cell",
            Self::Move => "move",
            Self::Grab => "grab",
            Self::NwseResize => "nwse-resize",
            Self::NeswResize => "nesw-resize",
            Self::NsResize => "ns-resize",
            Self::EwResize => "ew-resize",
        }
    }
}

/// Resize handle on a selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Top-left corner.
    Nw,
    /// Top edge midpoint.
    N,
    /// Top-right corner.
    Ne,
    /// Right edge midpoint.
    E,
    /// Bottom-right corner.
    Se,
    /// Bottom edge midpoint.
    S,
    /// Bottom-left corner.
    Sw,
    /// Left edge midpoint.
    W,
    /// First endpoint of a line or arrow.
    Start,
    /// Second endpoint of a line or arrow.
    End,
}

impl Handle {
    /// The eight box handles, in hit-test order.
    pub const BOX: [Self; 8] = [
        Self::Nw,
        Self::Ne,
        Self::Sw,
        Self::Se,
        Self::N,
        Self::S,
        Self::W,
        Self::E,
    ];

    /// Position as fractions of the bounds. `None` for endpoint handles.
    #[must_use]
    pub fn fraction(self) -> Option<(f64, f64)> {
        match self {
            Self::Nw => Some((0.0, 0.0)),
            Self::N => Some((0.5, 0.0)),
            Self::Ne => Some((1.0, 0.0)),
            Self::E => Some((1.0, 0.5)),
            Self::Se => Some((1.0, 1.0)),
            Self::S => Some((0.5, 1.0)),
            Self::Sw => Some((0.0, 1.0)),
            Self::W => Some((0.0, 0.5)),
            Self::Start | Self::End => None,
        }
    }

    /// Hover cursor.
    #[must_use]
    pub fn cursor(self) -> Cursor {
        match self {
            Self::Nw | Self::Se => Cursor::NwseResize,
            Self::Ne | Self::Sw => Cursor::NeswResize,
            Self::N | Self::S => Cursor::NsResize,
            Self::E | Self::W => Cursor::EwResize,
            Self::Start | Self::End => Cursor::Move,
        }
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Rubber-banding a line, arrow, rectangle or circle.
    Drawing {
        /// Where the press happened.
        start: Point,
        /// Item that will be committed on release.
        preview: Item,
    },
    /// Appending points to the last path of the current layer.
    Freehand,
    /// Moving the selected item.
    Dragging {
        /// Pointer minus item center at gesture start.
        offset: Point,
    },
    /// Resizing the selected item.
    Resizing {
        /// Grabbed handle.
        handle: Handle,
        /// The item as it was when the gesture started.
        origin: Item,
    },
    /// Rotating the selected item.
    Rotating {
        /// Pointer angle minus item angle at gesture start.
        offset: f64,
    },
    /// Erasing while the button is held.
    Erasing,
}

impl Interaction {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
