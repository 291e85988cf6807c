//! The planner engine.
//!
//! [`Planner`] owns everything that changes while a plan is edited: layers,
//! the active tool and style, the selection, the gesture in progress, the
//! undo history, pending prompts and queued notifications. Pointer and
//! keyboard handling live in the `input` submodule.

mod input;

use std::fmt;

use chrono::Utc;

use crate::catalog::{MapCatalog, MapInfo};
use crate::codec::{decode_plan, encode_plan};
use crate::config::PlannerConfig;
use crate::geometry::Point;
use crate::history::{History, Snapshot};
use crate::layer::validate_layer_name;
use crate::notify::{ConfirmAction, Notification, NotificationLevel, Prompt};
use crate::plan::{validate_description, validate_title, Extent};
use crate::render::{draw_frame, Frame, Surface, OVERLAY_COLOR};
use crate::text::{ApproxTextMeasure, TextMeasure};
use crate::tool::{Interaction, Tool};
use crate::{Item, Layer, Plan, PlannerError, PlannerResult, Shape, Style};

/// Stroke width range accepted from the style controls.
pub const WIDTH_RANGE: (f64, f64) = (1.0, 20.0);

/// The strategy planner engine.
pub struct Planner {
    maps: MapCatalog,
    map: String,
    title: String,
    description: String,
    layers: Vec<Layer>,
    current_layer: usize,
    tool: Tool,
    style: Style,
    selection: Option<usize>,
    interaction: Interaction,
    gesture_start: Option<Snapshot>,
    history: History,
    prompt: Option<Prompt>,
    notifications: Vec<Notification>,
    viewport: Extent,
    extent: Extent,
    last_pointer: Point,
    measure: Box<dyn TextMeasure>,
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("map", &self.map)
            .field("layers", &self.layers.len())
            .field("current_layer", &self.current_layer)
            .field("tool", &self.tool)
            .field("selection", &self.selection)
            .field("interaction", &self.interaction)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    /// Create a planner with one empty layer and no map selected.
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        let viewport = config.viewport();
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            history_depth = config.history_depth,
            "Creating planner"
        );
        Self {
            style: config.style(),
            history: History::new(config.history_depth),
            maps: config.maps,
            map: String::new(),
            title: String::new(),
            description: String::new(),
            layers: vec![Layer::new(Layer::default_name(1))],
            current_layer: 0,
            tool: Tool::default(),
            selection: None,
            interaction: Interaction::Idle,
            gesture_start: None,
            prompt: None,
            notifications: Vec::new(),
            viewport,
            extent: viewport,
            last_pointer: Point::default(),
            measure: Box::new(ApproxTextMeasure::default()),
        }
    }

    /// Replace the text metrics source.
    #[must_use]
    pub fn with_text_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    /// Text metrics source in use.
    #[must_use]
    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification::new(level, message);
        notification.log();
        self.notifications.push(notification);
    }

    /// Queue `err` as a notification and return it.
    fn fail<T>(&mut self, level: NotificationLevel, err: PlannerError) -> PlannerResult<T> {
        self.notify(level, err.user_message());
        Err(err)
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Notifications queued since the last drain.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// All layers, bottom to top.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Index of the current layer.
    #[must_use]
    pub fn current_layer_index(&self) -> usize {
        self.current_layer
    }

    /// The layer new items are added to.
    #[must_use]
    pub fn current_layer(&self) -> &Layer {
        &self.layers[self.current_layer]
    }

    /// Active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Style applied to new items.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Index of the selected item within the current layer.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selection
    }

    /// The selected item.
    #[must_use]
    pub fn selected_item(&self) -> Option<&Item> {
        self.selection
            .and_then(|i| self.layers[self.current_layer].items.get(i))
    }

    /// Gesture in progress.
    #[must_use]
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Shape being rubber-banded, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&Item> {
        match &self.interaction {
            Interaction::Drawing { preview, .. } => Some(preview),
            _ => None,
        }
    }

    /// Prompt awaiting an answer.
    #[must_use]
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Selected map id; empty before a map is chosen.
    #[must_use]
    pub fn map(&self) -> &str {
        &self.map
    }

    /// Catalog entry of the selected map, if it is known.
    #[must_use]
    pub fn map_info(&self) -> Option<&MapInfo> {
        self.maps.find(&self.map)
    }

    /// Map catalog.
    #[must_use]
    pub fn maps(&self) -> &MapCatalog {
        &self.maps
    }

    /// Plan title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Plan description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Characters in the title, for the live counter.
    #[must_use]
    pub fn title_char_count(&self) -> usize {
        self.title.chars().count()
    }

    /// Characters in the description, for the live counter.
    #[must_use]
    pub fn description_char_count(&self) -> usize {
        self.description.chars().count()
    }

    /// Whether undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo/redo history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Viewport size in pixels.
    #[must_use]
    pub fn viewport(&self) -> Extent {
        self.viewport
    }

    /// Plan space size.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    // ------------------------------------------------------------------
    // Viewport and coordinates
    // ------------------------------------------------------------------

    /// Resize the viewport. Items keep their plan-space coordinates.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if !Extent::new(width, height).is_drawable() {
            tracing::warn!(width, height, "Ignoring degenerate viewport");
            return;
        }
        self.viewport = Extent::new(width, height);
        tracing::debug!(width, height, "Viewport resized");
    }

    /// Map a viewport position to plan space.
    #[must_use]
    pub fn to_plan_space(&self, p: Point) -> Point {
        Point::new(
            p.x * self.extent.width / self.viewport.width,
            p.y * self.extent.height / self.viewport.height,
        )
    }

    /// Hit tolerance in plan units: twice the current stroke width.
    #[must_use]
    pub fn hit_tolerance(&self) -> f64 {
        self.style.width * 2.0
    }

    // ------------------------------------------------------------------
    // Tools and style
    // ------------------------------------------------------------------

    /// Switch tools. Clears the selection and abandons any gesture.
    pub fn set_tool(&mut self, tool: Tool) {
        self.end_gesture();
        self.selection = None;
        self.tool = tool;
        tracing::debug!(%tool, "Tool changed");
    }

    /// Set the stroke color; also recolors the selected item.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.style.color = color.into();
        let color = self.style.color.clone();
        self.restyle_selection(|style| style.color = color);
    }

    /// Set the stroke width (clamped to [`WIDTH_RANGE`]); also applies to
    /// the selected item.
    pub fn set_width(&mut self, width: f64) {
        if !width.is_finite() {
            return;
        }
        let (lo, hi) = WIDTH_RANGE;
        let width = width.clamp(lo, hi);
        self.style.width = width;
        self.restyle_selection(|style| style.width = width);
    }

    /// Set the opacity (clamped to 0..=1); also applies to the selected item.
    pub fn set_opacity(&mut self, opacity: f64) {
        if !opacity.is_finite() {
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0);
        self.style.opacity = opacity;
        self.restyle_selection(|style| style.opacity = opacity);
    }

    fn restyle_selection(&mut self, apply: impl FnOnce(&mut Style)) {
        let Some(index) = self.selection else {
            return;
        };
        let Some(item) = self.layers[self.current_layer].items.get(index) else {
            return;
        };
        let mut style = item.style.clone();
        apply(&mut style);
        if style == item.style {
            return;
        }
        self.save_state();
        self.layers[self.current_layer].items[index].style = style;
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            layers: self.layers.clone(),
            current_layer: self.current_layer,
        }
    }

    /// Record the current state before a mutation. Closes any gesture first.
    fn save_state(&mut self) {
        self.end_gesture();
        let snapshot = self.snapshot();
        self.history.save_state(snapshot);
    }

    /// Remember the state a gesture starts from. Nothing reaches the history
    /// until the gesture settles with a change.
    fn begin_gesture(&mut self) {
        self.gesture_start = Some(self.snapshot());
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.layers = snapshot.layers;
        if self.layers.is_empty() {
            self.layers.push(Layer::new(Layer::default_name(1)));
        }
        self.current_layer = snapshot.current_layer.min(self.layers.len() - 1);
        self.selection = None;
        self.interaction = Interaction::Idle;
        self.gesture_start = None;
    }

    /// Commit the gesture's starting state as one undo step if the gesture
    /// changed anything.
    fn settle_history(&mut self) {
        let Some(start) = self.gesture_start.take() else {
            return;
        };
        if start == self.snapshot() {
            tracing::trace!("Gesture left the plan unchanged");
        } else {
            self.history.save_state(start);
        }
    }

    fn end_gesture(&mut self) {
        self.interaction = Interaction::Idle;
        self.settle_history();
    }

    /// Step back one change. Returns whether anything was undone.
    ///
    /// A gesture in progress is closed first, so its change is undone.
    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        let current = self.snapshot();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.restore(previous);
        tracing::debug!(remaining = self.history.undo_count(), "Undo");
        true
    }

    /// Re-apply the last undone change. Returns whether anything was redone.
    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        let current = self.snapshot();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore(next);
        tracing::debug!(remaining = self.history.redo_count(), "Redo");
        true
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Append an item to the current layer as one undoable step.
    pub fn add_item(&mut self, item: Item) {
        self.save_state();
        tracing::debug!(kind = item.shape.name(), layer = self.current_layer, "Item added");
        self.layers[self.current_layer].items.push(item);
    }

    /// Select the topmost item of the current layer under `p` (plan space).
    pub fn select_at(&mut self, p: Point) -> Option<usize> {
        let tolerance = self.hit_tolerance();
        let measure = self.measure.as_ref();
        self.selection =
            self.layers[self.current_layer].topmost(|item| item.hit(p, tolerance, measure));
        self.selection
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Remove the selected item. Returns whether an item was removed.
    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.selection.take() else {
            return false;
        };
        if index >= self.layers[self.current_layer].items.len() {
            return false;
        }
        self.save_state();
        let item = self.layers[self.current_layer].items.remove(index);
        tracing::debug!(kind = item.shape.name(), "Selected item deleted");
        true
    }

    /// Remove every item of the current layer hit at `p` (plan space).
    ///
    /// Returns how many items were removed.
    pub fn erase_at(&mut self, p: Point) -> usize {
        let tolerance = self.hit_tolerance();
        let measure = self.measure.as_ref();
        let items = &mut self.layers[self.current_layer].items;
        let before = items.len();
        items.retain(|item| !item.hit(p, tolerance, measure));
        let erased = before - items.len();
        if erased > 0 {
            self.selection = None;
            tracing::debug!(erased, "Erased items");
        }
        erased
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    /// Append a new layer and make it current.
    pub fn add_layer(&mut self) -> usize {
        self.save_state();
        let name = Layer::default_name(self.layers.len() + 1);
        self.layers.push(Layer::new(name));
        self.switch_layer(self.layers.len() - 1);
        self.notify(NotificationLevel::Success, "New layer added");
        self.current_layer
    }

    fn switch_layer(&mut self, index: usize) {
        self.end_gesture();
        self.selection = None;
        self.current_layer = index;
    }

    /// Make `index` the current layer.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::LayerOutOfRange`] for a bad index.
    pub fn select_layer(&mut self, index: usize) -> PlannerResult<()> {
        if index >= self.layers.len() {
            return Err(PlannerError::LayerOutOfRange(index));
        }
        self.switch_layer(index);
        Ok(())
    }

    /// Flip a layer's visibility. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::LayerOutOfRange`] for a bad index.
    pub fn toggle_layer_visibility(&mut self, index: usize) -> PlannerResult<bool> {
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(PlannerError::LayerOutOfRange(index))?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Rename a layer.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::EmptyLayerName`] or
    /// [`PlannerError::LengthLimit`] for an invalid name, and
    /// [`PlannerError::LayerOutOfRange`] for a bad index.
    pub fn rename_layer(&mut self, index: usize, name: &str) -> PlannerResult<()> {
        if index >= self.layers.len() {
            return Err(PlannerError::LayerOutOfRange(index));
        }
        let name = match validate_layer_name(name) {
            Ok(name) => name,
            Err(e) => return self.fail(NotificationLevel::Error, e),
        };
        self.save_state();
        self.layers[index].name = name;
        self.notify(NotificationLevel::Success, "Layer renamed successfully");
        Ok(())
    }

    /// Delete the current layer. The last remaining layer cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::LastLayer`] when only one layer exists.
    pub fn delete_layer(&mut self) -> PlannerResult<()> {
        if self.layers.len() <= 1 {
            return self.fail(NotificationLevel::Warning, PlannerError::LastLayer);
        }
        self.save_state();
        let removed = self.layers.remove(self.current_layer);
        tracing::debug!(name = %removed.name, "Layer deleted");
        let index = self.current_layer.min(self.layers.len() - 1);
        self.switch_layer(index);
        self.notify(NotificationLevel::Success, "Layer deleted");
        Ok(())
    }

    /// Remove every item from the current layer.
    pub fn clear_layer(&mut self) {
        self.save_state();
        self.layers[self.current_layer].items.clear();
        self.selection = None;
        self.notify(NotificationLevel::Success, "Canvas cleared");
    }

    // ------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------

    /// Ask the host for a new name for the current layer.
    pub fn request_rename_layer(&mut self) {
        self.prompt = Some(Prompt::RenameLayer {
            index: self.current_layer,
            current: self.layers[self.current_layer].name.clone(),
        });
    }

    /// Ask the host to confirm deleting the current layer.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::LastLayer`] without prompting when only one
    /// layer exists.
    pub fn request_delete_layer(&mut self) -> PlannerResult<()> {
        if self.layers.len() <= 1 {
            return self.fail(NotificationLevel::Warning, PlannerError::LastLayer);
        }
        self.prompt = Some(Prompt::Confirm(ConfirmAction::DeleteLayer));
        Ok(())
    }

    /// Ask the host to confirm clearing the current layer.
    pub fn request_clear_layer(&mut self) {
        self.prompt = Some(Prompt::Confirm(ConfirmAction::ClearLayer));
    }

    /// Answer a text-entry or rename prompt.
    ///
    /// Blank text leaves a text-entry prompt pending. An invalid layer name
    /// leaves the rename prompt pending.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::NoPendingPrompt`] if no text prompt is
    /// pending, or the validation error of a rejected layer name.
    pub fn resolve_text(&mut self, text: &str) -> PlannerResult<()> {
        match self.prompt.clone() {
            Some(Prompt::TextEntry { at }) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(());
                }
                self.prompt = None;
                self.add_item(Item::new(
                    Shape::Text {
                        x: at.x,
                        y: at.y,
                        text: text.to_string(),
                    },
                    self.style.clone(),
                ));
                Ok(())
            }
            Some(Prompt::RenameLayer { index, .. }) => {
                self.rename_layer(index, text)?;
                self.prompt = None;
                Ok(())
            }
            Some(Prompt::Confirm(_)) | None => Err(PlannerError::NoPendingPrompt),
        }
    }

    /// Answer a confirmation prompt.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::NoPendingPrompt`] if no confirmation is
    /// pending, or the error of the confirmed action.
    pub fn resolve_confirmation(&mut self, confirmed: bool) -> PlannerResult<()> {
        let Some(Prompt::Confirm(action)) = self.prompt else {
            return Err(PlannerError::NoPendingPrompt);
        };
        self.prompt = None;
        if !confirmed {
            return Ok(());
        }
        match action {
            ConfirmAction::DeleteLayer => self.delete_layer(),
            ConfirmAction::ClearLayer => {
                self.clear_layer();
                Ok(())
            }
        }
    }

    /// Close any pending prompt without acting on it.
    pub fn dismiss_prompt(&mut self) -> bool {
        self.prompt.take().is_some()
    }

    // ------------------------------------------------------------------
    // Plan metadata
    // ------------------------------------------------------------------

    /// Choose the background map.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownMap`] if the id is not in the catalog.
    pub fn select_map(&mut self, id: &str) -> PlannerResult<()> {
        if let Err(e) = self.maps.require(id) {
            return self.fail(NotificationLevel::Error, e);
        }
        self.map = id.to_string();
        tracing::info!(map = id, "Map selected");
        Ok(())
    }

    /// Set the title. The length cap is enforced when saving.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set the description. The length cap is enforced when saving.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    // ------------------------------------------------------------------
    // Save and load
    // ------------------------------------------------------------------

    /// The current state as a plan, stamped now.
    #[must_use]
    pub fn to_plan(&self) -> Plan {
        Plan {
            map: self.map.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            layers: self.layers.clone(),
            created_at: Utc::now(),
            extent: Some(self.extent),
        }
    }

    /// Validate and encode the plan as a share code.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::LengthLimit`] when the title or description is
    /// too long, or [`PlannerError::Serialization`] if encoding fails.
    pub fn save(&mut self) -> PlannerResult<String> {
        if let Err(e) = validate_title(&self.title) {
            return self.fail(NotificationLevel::Error, e);
        }
        if let Err(e) = validate_description(&self.description) {
            return self.fail(NotificationLevel::Error, e);
        }
        let plan = self.to_plan();
        let code = match encode_plan(&plan) {
            Ok(code) => code,
            Err(e) => return self.fail(NotificationLevel::Error, e),
        };
        tracing::info!(items = plan.item_count(), layers = plan.layers.len(), "Plan saved");
        self.notify(NotificationLevel::Success, "Share code generated");
        Ok(code)
    }

    /// Replace the current plan with the one in `code`.
    ///
    /// On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::EmptyShareCode`] for blank input and
    /// [`PlannerError::InvalidPlanCode`] when the code does not decode.
    pub fn load(&mut self, code: &str) -> PlannerResult<()> {
        if code.trim().is_empty() {
            return self.fail(NotificationLevel::Error, PlannerError::EmptyShareCode);
        }
        match decode_plan(code) {
            Ok(plan) => {
                self.load_plan(plan);
                self.notify(NotificationLevel::Success, "Plan loaded successfully");
                Ok(())
            }
            Err(e) => self.fail(NotificationLevel::Error, e),
        }
    }

    /// Replace the current plan with `plan`.
    ///
    /// Resets the current layer, selection, gesture and history. A plan
    /// without layers gets a fresh `Layer 1`; a plan without a drawable
    /// extent is taken to be drawn against the current viewport.
    pub fn load_plan(&mut self, plan: Plan) {
        if self.maps.find(&plan.map).is_none() {
            tracing::warn!(map = %plan.map, "Loaded plan references an unknown map");
        }
        self.map = plan.map;
        self.title = plan.title;
        self.description = plan.description;
        self.layers = plan.layers;
        if self.layers.is_empty() {
            self.layers.push(Layer::new(Layer::default_name(1)));
        }
        self.current_layer = 0;
        self.extent = match plan.extent {
            Some(extent) if extent.is_drawable() => extent,
            Some(extent) => {
                tracing::warn!(
                    width = extent.width,
                    height = extent.height,
                    "Ignoring degenerate plan extent"
                );
                self.viewport
            }
            None => self.viewport,
        };
        self.selection = None;
        self.interaction = Interaction::Idle;
        self.gesture_start = None;
        self.prompt = None;
        self.history.clear();
        tracing::info!(
            map = %self.map,
            layers = self.layers.len(),
            "Plan loaded"
        );
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Everything needed to draw the current state.
    #[must_use]
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            viewport: self.viewport,
            extent: self.extent,
            layers: &self.layers,
            preview: self.preview(),
            selection: self.selected_item(),
            overlay: OVERLAY_COLOR,
            measure: self.measure.as_ref(),
        }
    }

    /// Redraw the whole canvas onto `surface`.
    pub fn redraw(&self, surface: &mut dyn Surface) {
        draw_frame(surface, &self.frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Item {
        Item::new(
            Shape::Rect {
                x,
                y,
                width: w,
                height: h,
            },
            Style::new("#ff8300", 3.0, 1.0),
        )
    }

    #[test]
    fn test_new_planner_has_one_layer() {
        let planner = Planner::default();
        assert_eq!(planner.layers().len(), 1);
        assert_eq!(planner.current_layer().name, "Layer 1");
        assert_eq!(planner.tool(), Tool::Select);
        assert!(!planner.can_undo());
    }

    #[test]
    fn test_add_and_delete_layer() {
        let mut planner = Planner::default();
        assert_eq!(planner.add_layer(), 1);
        assert_eq!(planner.current_layer().name, "Layer 2");
        planner.delete_layer().expect("delete");
        assert_eq!(planner.layers().len(), 1);
        assert_eq!(planner.current_layer_index(), 0);
        let messages: Vec<_> = planner
            .take_notifications()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, ["New layer added", "Layer deleted"]);
    }

    #[test]
    fn test_delete_last_layer_warns() {
        let mut planner = Planner::default();
        assert!(matches!(planner.delete_layer(), Err(PlannerError::LastLayer)));
        assert_eq!(planner.layers().len(), 1);
        let notes = planner.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Warning);
        assert_eq!(notes[0].message, "Cannot delete the last layer");
        assert!(!planner.can_undo());
    }

    #[test]
    fn test_rename_rejects_long_names() {
        let mut planner = Planner::default();
        let err = planner.rename_layer(0, &"x".repeat(30)).expect_err("too long");
        assert!(matches!(err, PlannerError::LengthLimit { .. }));
        assert_eq!(planner.current_layer().name, "Layer 1");
        assert_eq!(
            planner.take_notifications()[0].message,
            "Layer name must be 25 characters or less"
        );
        planner.rename_layer(0, " Flank ").expect("rename");
        assert_eq!(planner.current_layer().name, "Flank");
    }

    #[test]
    fn test_rename_prompt_stays_open_on_error() {
        let mut planner = Planner::default();
        planner.request_rename_layer();
        assert!(planner.resolve_text(&"y".repeat(26)).is_err());
        assert!(matches!(planner.prompt(), Some(Prompt::RenameLayer { .. })));
        planner.resolve_text("Rotate").expect("rename");
        assert!(planner.prompt().is_none());
        assert_eq!(planner.current_layer().name, "Rotate");
    }

    #[test]
    fn test_clear_layer_via_confirmation_is_undoable() {
        let mut planner = Planner::default();
        planner.add_item(rect(0.0, 0.0, 10.0, 10.0));
        planner.request_clear_layer();
        planner.resolve_confirmation(false).expect("cancel");
        assert_eq!(planner.current_layer().len(), 1);

        planner.request_clear_layer();
        planner.resolve_confirmation(true).expect("confirm");
        assert!(planner.current_layer().is_empty());
        assert!(planner.undo());
        assert_eq!(planner.current_layer().len(), 1);
    }

    #[test]
    fn test_resolve_without_prompt() {
        let mut planner = Planner::default();
        assert!(matches!(
            planner.resolve_confirmation(true),
            Err(PlannerError::NoPendingPrompt)
        ));
        assert!(matches!(
            planner.resolve_text("hi"),
            Err(PlannerError::NoPendingPrompt)
        ));
        assert!(!planner.dismiss_prompt());
    }

    #[test]
    fn test_style_change_restyles_selection() {
        let mut planner = Planner::default();
        planner.add_item(rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(planner.select_at(Point::new(5.0, 5.0)), Some(0));
        planner.set_color("#00ff00");
        planner.set_width(50.0);
        let item = planner.selected_item().expect("selected");
        assert_eq!(item.style.color, "#00ff00");
        assert!((item.style.width - 20.0).abs() < f64::EPSILON);
        assert!(planner.undo());
        assert_eq!(planner.current_layer().items[0].style.color, "#00ff00");
        assert!((planner.current_layer().items[0].style.width - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_select_map() {
        let mut planner = Planner::default();
        planner.select_map("sunstroke").expect("known map");
        assert_eq!(planner.map_info().map(|m| m.name.as_str()), Some("Sunstroke"));
        assert!(matches!(
            planner.select_map("nowhere"),
            Err(PlannerError::UnknownMap(_))
        ));
        assert_eq!(planner.map(), "sunstroke");
    }

    #[test]
    fn test_save_enforces_limits() {
        let mut planner = Planner::default();
        planner.set_title("t".repeat(101));
        assert_eq!(planner.title_char_count(), 101);
        assert!(planner.save().is_err());
        assert_eq!(
            planner.take_notifications()[0].message,
            "Plan title must be 100 characters or less"
        );
        planner.set_title("ok");
        planner.set_description("d".repeat(251));
        assert!(planner.save().is_err());
        planner.set_description("fine");
        assert!(planner.save().expect("save").starts_with("PCWSTRAT-"));
    }

    #[test]
    fn test_load_empty_plan_creates_layer() {
        let mut planner = Planner::default();
        planner.add_item(rect(0.0, 0.0, 1.0, 1.0));
        let mut plan = Plan::new("unlisted_map");
        plan.title = "Empty".into();
        let code = encode_plan(&plan).expect("encode");
        planner.load(&code).expect("load");
        assert_eq!(planner.map(), "unlisted_map");
        assert_eq!(planner.layers().len(), 1);
        assert_eq!(planner.current_layer().name, "Layer 1");
        assert!(!planner.can_undo());
        assert_eq!(planner.extent(), planner.viewport());
    }

    #[test]
    fn test_load_failures_leave_state() {
        let mut planner = Planner::default();
        planner.add_item(rect(0.0, 0.0, 1.0, 1.0));
        assert!(matches!(planner.load("  "), Err(PlannerError::EmptyShareCode)));
        assert!(matches!(
            planner.load("garbage"),
            Err(PlannerError::InvalidPlanCode)
        ));
        assert_eq!(planner.current_layer().len(), 1);
        let notes = planner.take_notifications();
        assert_eq!(notes[0].message, "Please enter a share code");
        assert_eq!(
            notes[1].message,
            "Failed to load plan. Please check the share code."
        );
    }

    #[test]
    fn test_viewport_maps_to_plan_space() {
        let mut planner = Planner::default();
        planner.set_viewport(400.0, 200.0);
        assert_eq!(
            planner.to_plan_space(Point::new(100.0, 100.0)),
            Point::new(200.0, 400.0)
        );
        planner.set_viewport(0.0, 10.0);
        assert_eq!(planner.viewport(), Extent::new(400.0, 200.0));
    }
}
