//! Pointer and keyboard dispatch.

use crate::event::{EventOutcome, KeyEvent, PointerEvent, PointerPhase, TouchEvent, TouchPhase};
use crate::geometry::Point;
use crate::notify::Prompt;
use crate::tool::{Cursor, Interaction, Tool};
use crate::transform::{self, handle_at, on_rotation_handle};
use crate::{Item, Layer, Shape, Style};

use super::Planner;

fn item_mut(layers: &mut [Layer], layer: usize, selection: Option<usize>) -> Option<&mut Item> {
    layers.get_mut(layer)?.items.get_mut(selection?)
}

/// Build the preview item for a rubber-band tool.
fn preview_item(tool: Tool, start: Point, end: Point, style: Style) -> Option<Item> {
    let shape = match tool {
        Tool::Line => Shape::Line {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        },
        Tool::Arrow => Shape::Arrow {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        },
        Tool::Rectangle => Shape::Rect {
            x: start.x.min(end.x),
            y: start.y.min(end.y),
            width: (end.x - start.x).abs(),
            height: (end.y - start.y).abs(),
        },
        Tool::Circle => Shape::Circle {
            x: start.x,
            y: start.y,
            radius: start.distance(end),
        },
        _ => return None,
    };
    Some(Item::new(shape, style))
}

impl Planner {
    /// Handle a mouse or normalized touch event.
    ///
    /// Positions are viewport pixels. Input is ignored while a prompt is
    /// pending.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> EventOutcome {
        self.last_pointer = event.position;
        if self.prompt.is_some() {
            return EventOutcome::ignored();
        }
        let p = self.to_plan_space(event.position);
        match event.phase {
            PointerPhase::Down => self.pointer_down(p),
            PointerPhase::Move => self.pointer_move(p),
            PointerPhase::Up | PointerPhase::Leave => self.pointer_up(),
        }
    }

    /// Handle a touch event. Touch start and move ask the host to suppress
    /// scrolling and zooming.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> EventOutcome {
        let Some(pointer) = event.to_pointer(self.last_pointer) else {
            return EventOutcome::ignored();
        };
        let outcome = self.handle_pointer(pointer);
        match event.phase {
            TouchPhase::Start | TouchPhase::Move => outcome.prevent_default(),
            TouchPhase::End | TouchPhase::Cancel => outcome,
        }
    }

    fn pointer_down(&mut self, p: Point) -> EventOutcome {
        if self.interaction.is_active() {
            // A press without a release in between; close the old gesture first.
            self.pointer_up();
        }
        match self.tool {
            Tool::Select => self.select_down(p),
            Tool::Freehand => {
                self.begin_gesture();
                let item = Item::new(Shape::Path { points: vec![p] }, self.style.clone());
                self.layers[self.current_layer].items.push(item);
                self.interaction = Interaction::Freehand;
                EventOutcome::redraw()
            }
            Tool::Line | Tool::Arrow | Tool::Rectangle | Tool::Circle => {
                let Some(preview) = preview_item(self.tool, p, p, self.style.clone()) else {
                    return EventOutcome::ignored();
                };
                self.begin_gesture();
                self.interaction = Interaction::Drawing { start: p, preview };
                EventOutcome::redraw()
            }
            Tool::Text => {
                self.prompt = Some(Prompt::TextEntry { at: p });
                EventOutcome::ignored()
            }
            Tool::Erase => {
                self.begin_gesture();
                self.interaction = Interaction::Erasing;
                self.erase_at(p);
                EventOutcome::redraw()
            }
        }
    }

    fn select_down(&mut self, p: Point) -> EventOutcome {
        let measure = self.measure.as_ref();
        if let Some(item) = self.selected_item() {
            if let Some(handle) = handle_at(item, p, measure) {
                let origin = item.clone();
                self.begin_gesture();
                self.interaction = Interaction::Resizing { handle, origin };
                return EventOutcome::redraw();
            }
            if on_rotation_handle(item, p, measure) {
                let offset = transform::rotation_offset(item, p, measure);
                self.begin_gesture();
                self.interaction = Interaction::Rotating { offset };
                return EventOutcome::redraw();
            }
        }

        match self.select_at(p) {
            Some(index) => {
                let item = &self.layers[self.current_layer].items[index];
                let offset = transform::drag_offset(item, p, self.measure.as_ref());
                self.begin_gesture();
                self.interaction = Interaction::Dragging { offset };
            }
            None => tracing::trace!("Click hit nothing; selection cleared"),
        }
        EventOutcome::redraw()
    }

    fn pointer_move(&mut self, p: Point) -> EventOutcome {
        match self.interaction {
            Interaction::Idle => return EventOutcome::ignored(),
            Interaction::Erasing => {
                self.erase_at(p);
                return EventOutcome::redraw();
            }
            _ => {}
        }

        let measure = self.measure.as_ref();
        let layer = self.current_layer;
        match &mut self.interaction {
            Interaction::Drawing { start, preview } => {
                if let Some(next) = preview_item(self.tool, *start, p, preview.style.clone()) {
                    *preview = next;
                }
            }
            Interaction::Freehand => {
                if let Some(Item {
                    shape: Shape::Path { points },
                    ..
                }) = self.layers[layer].items.last_mut()
                {
                    points.push(p);
                }
            }
            Interaction::Dragging { offset } => {
                if let Some(item) = item_mut(&mut self.layers, layer, self.selection) {
                    transform::drag(item, p, *offset, measure);
                }
            }
            Interaction::Resizing { handle, origin } => {
                if let Some(item) = item_mut(&mut self.layers, layer, self.selection) {
                    transform::resize(item, origin, *handle, p, measure);
                }
            }
            Interaction::Rotating { offset } => {
                if let Some(item) = item_mut(&mut self.layers, layer, self.selection) {
                    transform::rotate(item, p, *offset, measure);
                }
            }
            Interaction::Idle | Interaction::Erasing => {}
        }
        EventOutcome::redraw()
    }

    fn pointer_up(&mut self) -> EventOutcome {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => return EventOutcome::ignored(),
            Interaction::Drawing { preview, .. } => {
                tracing::debug!(kind = preview.shape.name(), "Shape committed");
                self.layers[self.current_layer].items.push(preview);
            }
            Interaction::Freehand
            | Interaction::Dragging { .. }
            | Interaction::Resizing { .. }
            | Interaction::Rotating { .. }
            | Interaction::Erasing => {}
        }
        self.settle_history();
        EventOutcome::redraw()
    }

    /// Handle a key press.
    ///
    /// Ctrl+Z undoes and Ctrl+Y (or Ctrl+Shift+Z) redoes, except while focus
    /// is in a text input. Delete and Backspace remove the selected item.
    /// Escape closes a pending prompt or abandons a rubber-band preview.
    pub fn handle_key(&mut self, event: &KeyEvent) -> EventOutcome {
        if event.key == "Escape" {
            if self.dismiss_prompt() {
                return EventOutcome::redraw();
            }
            if matches!(self.interaction, Interaction::Drawing { .. }) {
                self.end_gesture();
                return EventOutcome::redraw();
            }
            return EventOutcome::ignored();
        }
        if event.in_text_input || self.prompt.is_some() {
            return EventOutcome::ignored();
        }

        let command = event.modifiers.ctrl || event.modifiers.meta;
        let key = event.key.to_ascii_lowercase();
        let changed = match key.as_str() {
            "z" if command && event.modifiers.shift => self.redo(),
            "z" if command => self.undo(),
            "y" if command => self.redo(),
            "delete" | "backspace" if !self.interaction.is_active() => self.delete_selected(),
            _ => return EventOutcome::ignored(),
        };
        let outcome = if changed {
            EventOutcome::redraw()
        } else {
            EventOutcome::ignored()
        };
        if command {
            outcome.prevent_default()
        } else {
            outcome
        }
    }

    /// Cursor to show with the pointer at `position` (viewport pixels).
    #[must_use]
    pub fn cursor_at(&self, position: Point) -> Cursor {
        if self.tool != Tool::Select {
            return self.tool.cursor();
        }
        let p = self.to_plan_space(position);
        let measure = self.measure.as_ref();
        match &self.interaction {
            Interaction::Dragging { .. } => return Cursor::Move,
            Interaction::Resizing { handle, .. } => return handle.cursor(),
            Interaction::Rotating { .. } => return Cursor::Grab,
            _ => {}
        }
        if let Some(item) = self.selected_item() {
            if let Some(handle) = handle_at(item, p, measure) {
                return handle.cursor();
            }
            if on_rotation_handle(item, p, measure) {
                return Cursor::Grab;
            }
        }
        let tolerance = self.hit_tolerance();
        if self
            .current_layer()
            .topmost(|item| item.hit(p, tolerance, measure))
            .is_some()
        {
            Cursor::Move
        } else {
            Cursor::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyModifiers, TouchPoint};
    use crate::tool::Handle;

    fn drag(planner: &mut Planner, from: (f64, f64), to: (f64, f64)) {
        planner.handle_pointer(PointerEvent::down(from.0, from.1));
        planner.handle_pointer(PointerEvent::moved(to.0, to.1));
        planner.handle_pointer(PointerEvent::up(to.0, to.1));
    }

    #[test]
    fn test_rectangle_tool_normalizes_drag_direction() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Rectangle);
        drag(&mut planner, (100.0, 80.0), (40.0, 20.0));
        assert_eq!(
            planner.current_layer().items[0].shape,
            Shape::Rect {
                x: 40.0,
                y: 20.0,
                width: 60.0,
                height: 60.0
            }
        );
        assert!(planner.preview().is_none());
    }

    #[test]
    fn test_preview_visible_during_drag() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Circle);
        planner.handle_pointer(PointerEvent::down(10.0, 10.0));
        let outcome = planner.handle_pointer(PointerEvent::moved(13.0, 14.0));
        assert!(outcome.redraw);
        let preview = planner.preview().expect("preview");
        assert_eq!(
            preview.shape,
            Shape::Circle {
                x: 10.0,
                y: 10.0,
                radius: 5.0
            }
        );
        assert!(planner.current_layer().is_empty());
    }

    #[test]
    fn test_freehand_collects_points() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Freehand);
        planner.handle_pointer(PointerEvent::down(0.0, 0.0));
        planner.handle_pointer(PointerEvent::moved(5.0, 5.0));
        planner.handle_pointer(PointerEvent::moved(10.0, 0.0));
        planner.handle_pointer(PointerEvent::mouse(PointerPhase::Leave, 10.0, 0.0));
        let Shape::Path { points } = &planner.current_layer().items[0].shape else {
            panic!("expected path");
        };
        assert_eq!(points.len(), 3);
        assert!(!planner.interaction().is_active());
    }

    #[test]
    fn test_text_tool_prompts_and_blocks_pointer() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Text);
        planner.handle_pointer(PointerEvent::down(30.0, 40.0));
        assert_eq!(
            planner.prompt(),
            Some(&Prompt::TextEntry {
                at: Point::new(30.0, 40.0)
            })
        );
        assert!(!planner.handle_pointer(PointerEvent::down(1.0, 1.0)).redraw);

        planner.resolve_text("   ").expect("blank keeps prompt");
        assert!(planner.prompt().is_some());
        planner.resolve_text("Hold here").expect("commit");
        assert!(planner.prompt().is_none());
        assert_eq!(planner.tool(), Tool::Text);
        assert!(matches!(
            &planner.current_layer().items[0].shape,
            Shape::Text { text, .. } if text == "Hold here"
        ));
        assert!(planner.can_undo());
    }

    #[test]
    fn test_click_without_move_leaves_no_history() {
        let mut planner = Planner::default();
        planner.add_item(Item::new(
            Shape::Rect {
                x: 0.0,
                y: 0.0,
                width: 50.0,
                height: 50.0,
            },
            Style::new("#fff", 3.0, 1.0),
        ));
        let depth = planner.history().undo_count();
        planner.handle_pointer(PointerEvent::down(25.0, 25.0));
        planner.handle_pointer(PointerEvent::up(25.0, 25.0));
        assert_eq!(planner.selected_index(), Some(0));
        assert_eq!(planner.history().undo_count(), depth);
    }

    #[test]
    fn test_resize_gesture_through_handle() {
        let mut planner = Planner::default();
        planner.add_item(Item::new(
            Shape::Rect {
                x: 100.0,
                y: 100.0,
                width: 100.0,
                height: 100.0,
            },
            Style::new("#fff", 3.0, 1.0),
        ));
        planner.handle_pointer(PointerEvent::down(150.0, 150.0));
        planner.handle_pointer(PointerEvent::up(150.0, 150.0));
        assert_eq!(planner.cursor_at(Point::new(200.0, 200.0)), Handle::Se.cursor());

        drag(&mut planner, (200.0, 200.0), (300.0, 250.0));
        assert_eq!(
            planner.current_layer().items[0].shape,
            Shape::Rect {
                x: 100.0,
                y: 100.0,
                width: 200.0,
                height: 150.0
            }
        );
        assert!(planner.undo());
        assert!(matches!(
            planner.current_layer().items[0].shape,
            Shape::Rect { width, .. } if (width - 100.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn test_touch_prevents_default() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Line);
        let start = TouchEvent::new(TouchPhase::Start, vec![TouchPoint { id: 1, x: 0.0, y: 0.0 }]);
        let moved = TouchEvent::new(TouchPhase::Move, vec![TouchPoint { id: 1, x: 9.0, y: 0.0 }]);
        assert!(planner.handle_touch(&start).prevent_default);
        assert!(planner.handle_touch(&moved).prevent_default);
        planner.handle_touch(&TouchEvent::new(TouchPhase::End, Vec::new()));
        assert_eq!(
            planner.current_layer().items[0].shape.endpoints(),
            Some((Point::new(0.0, 0.0), Point::new(9.0, 0.0)))
        );
    }

    #[test]
    fn test_undo_shortcuts_suppressed_in_text_input() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Line);
        drag(&mut planner, (0.0, 0.0), (10.0, 10.0));

        let ctrl_z = KeyEvent::new("z", KeyModifiers::ctrl());
        assert!(!planner.handle_key(&ctrl_z.clone().in_text_input()).redraw);
        assert_eq!(planner.current_layer().len(), 1);

        let outcome = planner.handle_key(&ctrl_z);
        assert!(outcome.redraw && outcome.prevent_default);
        assert!(planner.current_layer().is_empty());

        assert!(planner.handle_key(&KeyEvent::new("y", KeyModifiers::ctrl())).redraw);
        assert_eq!(planner.current_layer().len(), 1);
    }

    #[test]
    fn test_escape_cancels_preview() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Arrow);
        planner.handle_pointer(PointerEvent::down(0.0, 0.0));
        planner.handle_pointer(PointerEvent::moved(50.0, 0.0));
        planner.handle_key(&KeyEvent::new("Escape", KeyModifiers::default()));
        assert!(planner.preview().is_none());
        planner.handle_pointer(PointerEvent::up(50.0, 0.0));
        assert!(planner.current_layer().is_empty());
        assert!(!planner.can_undo());
    }

    #[test]
    fn test_delete_key_removes_selection() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Circle);
        drag(&mut planner, (50.0, 50.0), (60.0, 50.0));
        planner.set_tool(Tool::Select);
        drag(&mut planner, (50.0, 50.0), (50.0, 50.0));
        assert_eq!(planner.selected_index(), Some(0));
        assert!(planner.handle_key(&KeyEvent::new("Delete", KeyModifiers::default())).redraw);
        assert!(planner.current_layer().is_empty());
        assert!(planner.selected_index().is_none());
    }

    #[test]
    fn test_tool_cursors_outside_select() {
        let mut planner = Planner::default();
        planner.set_tool(Tool::Erase);
        assert_eq!(planner.cursor_at(Point::new(1.0, 1.0)), Cursor::Cell);
        planner.set_tool(Tool::Select);
        assert_eq!(planner.cursor_at(Point::new(1.0, 1.0)), Cursor::Default);
    }
}
