//! Input events for planner interaction.
//!
//! Mouse and touch input are both normalized into a [`PointerEvent`] before
//! they reach the tool state machine.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed or finger down.
    Down,
    /// Pointer moved.
    Move,
    /// Button released or finger lifted.
    Up,
    /// Pointer left the canvas. Treated like [`PointerPhase::Up`].
    Leave,
}

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    /// Mouse or pen.
    Mouse,
    /// Touch screen.
    Touch,
}

/// A pointer event in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase.
    pub phase: PointerPhase,
    /// Position relative to the canvas' top-left corner.
    pub position: Point,
    /// Originating device.
    pub source: PointerSource,
}

impl PointerEvent {
    /// Create a mouse event.
    #[must_use]
    pub fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            source: PointerSource::Mouse,
        }
    }

    /// Convenience constructor for a mouse press.
    #[must_use]
    pub fn down(x: f64, y: f64) -> Self {
        Self::mouse(PointerPhase::Down, x, y)
    }

    /// Convenience constructor for a mouse move.
    #[must_use]
    pub fn moved(x: f64, y: f64) -> Self {
        Self::mouse(PointerPhase::Move, x, y)
    }

    /// Convenience constructor for a mouse release.
    #[must_use]
    pub fn up(x: f64, y: f64) -> Self {
        Self::mouse(PointerPhase::Up, x, y)
    }
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Finger down.
    Start,
    /// Finger dragging.
    Move,
    /// Finger lifted.
    End,
    /// Touch cancelled by the platform.
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier.
    pub id: u32,
    /// X in viewport pixels.
    pub x: f64,
    /// Y in viewport pixels.
    pub y: f64,
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// Touches still on the surface (for `End`, the lifted ones).
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Map to a pointer event. Only the primary touch drives the tools.
    ///
    /// `last` is the previous pointer position, used when an `End` event
    /// carries no touch points.
    #[must_use]
    pub fn to_pointer(&self, last: Point) -> Option<PointerEvent> {
        let position = self
            .primary_touch()
            .map_or(last, |t| Point::new(t.x, t.y));
        let phase = match self.phase {
            TouchPhase::Start => {
                self.primary_touch()?;
                PointerPhase::Down
            }
            TouchPhase::Move => {
                self.primary_touch()?;
                PointerPhase::Move
            }
            TouchPhase::End | TouchPhase::Cancel => PointerPhase::Up,
        };
        Some(PointerEvent {
            phase,
            position,
            source: PointerSource::Touch,
        })
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Only Ctrl held.
    #[must_use]
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name as reported by the host (`"z"`, `"Delete"`, `"Escape"`).
    pub key: String,
    /// Active modifier keys.
    pub modifiers: KeyModifiers,
    /// Whether keyboard focus is inside a text input.
    pub in_text_input: bool,
}

impl KeyEvent {
    /// Create a key press outside any text input.
    #[must_use]
    pub fn new(key: impl Into<String>, modifiers: KeyModifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            in_text_input: false,
        }
    }

    /// Mark the event as coming from a focused text input.
    #[must_use]
    pub fn in_text_input(mut self) -> Self {
        self.in_text_input = true;
        self
    }
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The canvas needs a redraw.
    pub redraw: bool,
    /// The host should suppress the platform default (scroll, zoom, browser undo).
    pub prevent_default: bool,
}

impl EventOutcome {
    /// Nothing to do.
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            redraw: false,
            prevent_default: false,
        }
    }

    /// Redraw requested.
    #[must_use]
    pub const fn redraw() -> Self {
        Self {
            redraw: true,
            prevent_default: false,
        }
    }

    /// Also ask the host to suppress its default handling.
    #[must_use]
    pub const fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(phase: TouchPhase, x: f64, y: f64) -> TouchEvent {
        TouchEvent::new(phase, vec![TouchPoint { id: 0, x, y }])
    }

    #[test]
    fn test_touch_maps_to_pointer_phases() {
        let last = Point::default();
        let down = touch(TouchPhase::Start, 3.0, 4.0).to_pointer(last);
        assert_eq!(
            down,
            Some(PointerEvent {
                phase: PointerPhase::Down,
                position: Point::new(3.0, 4.0),
                source: PointerSource::Touch,
            })
        );
        let moved = touch(TouchPhase::Move, 5.0, 6.0).to_pointer(last);
        assert_eq!(moved.map(|e| e.phase), Some(PointerPhase::Move));
    }

    #[test]
    fn test_touch_end_without_points_uses_last_position() {
        let end = TouchEvent::new(TouchPhase::End, Vec::new());
        let pointer = end.to_pointer(Point::new(7.0, 8.0)).expect("pointer");
        assert_eq!(pointer.phase, PointerPhase::Up);
        assert_eq!(pointer.position, Point::new(7.0, 8.0));
    }

    #[test]
    fn test_touch_start_without_points_is_dropped() {
        let start = TouchEvent::new(TouchPhase::Start, Vec::new());
        assert!(start.to_pointer(Point::default()).is_none());
    }

    #[test]
    fn test_outcome_builders() {
        assert!(!EventOutcome::ignored().redraw);
        let o = EventOutcome::redraw().prevent_default();
        assert!(o.redraw && o.prevent_default);
    }
}
