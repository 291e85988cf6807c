//! The redraw pipeline.
//!
//! The planner never touches pixels itself. It replays a frame as a sequence
//! of 2D drawing calls against a [`Surface`], which a host backs with its
//! canvas (see the `planner-renderer` crate for a recording display list and
//! an SVG exporter).
//!
//! ```text
//! clear ─▶ scale to viewport ─▶ visible layers, bottom-up
//!                                 └─ items in list order, rotated about center
//!       ─▶ preview ─▶ selection overlay
//! ```

use crate::geometry::{Bounds, Point};
use crate::plan::Extent;
use crate::text::{font_for, TextMeasure};
use crate::transform::{handle_positions, rotation_handle, HANDLE_SIZE};
use crate::{Item, Layer, Shape};

/// Length of each arrowhead stroke.
pub const ARROWHEAD_LENGTH: f64 = 15.0;

/// Default selection overlay color.
pub const OVERLAY_COLOR: &str = "#00ffff";

/// Dash pattern of the selection outline.
pub const OVERLAY_DASH: [f64; 2] = [5.0, 5.0];

/// Gap between an item's bounds and its selection outline.
pub const OVERLAY_PADDING: f64 = 5.0;

/// A Canvas2D-like drawing target.
///
/// Transforms compose the way a browser canvas does: each call post-multiplies
/// the current matrix, and `save`/`restore` bracket both the matrix and the
/// style state.
pub trait Surface {
    /// Clear everything and reset the state stack.
    fn clear(&mut self, width: f64, height: f64);
    /// Push the current transform and style.
    fn save(&mut self);
    /// Pop the transform and style pushed by the matching [`Surface::save`].
    fn restore(&mut self);
    /// Translate the coordinate system.
    fn translate(&mut self, dx: f64, dy: f64);
    /// Rotate the coordinate system by `angle` radians.
    fn rotate(&mut self, angle: f64);
    /// Scale the coordinate system.
    fn scale(&mut self, sx: f64, sy: f64);
    /// Stroke color and width for subsequent strokes.
    fn set_stroke(&mut self, color: &str, width: f64);
    /// Fill color for subsequent fills.
    fn set_fill(&mut self, color: &str);
    /// Global opacity.
    fn set_alpha(&mut self, alpha: f64);
    /// Dash pattern; empty for solid lines.
    fn set_line_dash(&mut self, dash: &[f64]);
    /// Stroke an open polyline.
    fn stroke_polyline(&mut self, points: &[Point]);
    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Bounds);
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Bounds);
    /// Stroke a circle outline.
    fn stroke_circle(&mut self, center: Point, radius: f64);
    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64);
    /// Fill text with its baseline-left corner at `at`.
    fn fill_text(&mut self, text: &str, at: Point, font: &str);
}

/// Everything one frame needs.
pub struct Frame<'a> {
    /// Viewport size in pixels.
    pub viewport: Extent,
    /// Plan space the items are expressed in.
    pub extent: Extent,
    /// Layers, bottom to top.
    pub layers: &'a [Layer],
    /// Shape being rubber-banded, if any.
    pub preview: Option<&'a Item>,
    /// Selected item, if any.
    pub selection: Option<&'a Item>,
    /// Selection overlay color.
    pub overlay: &'a str,
    /// Text metrics used for text bounds.
    pub measure: &'a dyn TextMeasure,
}

/// Draw a full frame.
pub fn draw_frame(surface: &mut dyn Surface, frame: &Frame<'_>) {
    surface.clear(frame.viewport.width, frame.viewport.height);
    surface.save();
    if frame.extent.width > 0.0 && frame.extent.height > 0.0 {
        surface.scale(
            frame.viewport.width / frame.extent.width,
            frame.viewport.height / frame.extent.height,
        );
    }

    let mut drawn = 0usize;
    for layer in frame.layers.iter().filter(|l| l.visible) {
        for item in &layer.items {
            draw_item(surface, item, frame.measure);
            drawn += 1;
        }
    }
    if let Some(preview) = frame.preview {
        draw_item(surface, preview, frame.measure);
    }
    if let Some(selected) = frame.selection {
        draw_selection(surface, selected, frame.overlay, frame.measure);
    }

    surface.restore();
    tracing::trace!(items = drawn, "Redrew frame");
}

/// Draw one item with its own style and rotation.
pub fn draw_item(surface: &mut dyn Surface, item: &Item, measure: &dyn TextMeasure) {
    surface.save();
    if item.angle.abs() > f64::EPSILON {
        let c = item.center(measure);
        surface.translate(c.x, c.y);
        surface.rotate(item.angle);
        surface.translate(-c.x, -c.y);
    }
    surface.set_stroke(&item.style.color, item.style.width);
    surface.set_fill(&item.style.color);
    surface.set_alpha(item.style.opacity);

    match &item.shape {
        Shape::Line { x1, y1, x2, y2 } => {
            surface.stroke_polyline(&[Point::new(*x1, *y1), Point::new(*x2, *y2)]);
        }
        Shape::Arrow { x1, y1, x2, y2 } => {
            let start = Point::new(*x1, *y1);
            let end = Point::new(*x2, *y2);
            surface.stroke_polyline(&[start, end]);
            draw_arrowhead(surface, start, end);
        }
        Shape::Rect {
            x,
            y,
            width,
            height,
        } => surface.stroke_rect(Bounds::new(*x, *y, *width, *height)),
        Shape::Circle { x, y, radius } => surface.stroke_circle(Point::new(*x, *y), *radius),
        Shape::Text { x, y, text } => {
            surface.fill_text(text, Point::new(*x, *y), &font_for(item.style.width));
        }
        Shape::Path { points } => match points.as_slice() {
            [] => {}
            [dot] => surface.fill_circle(*dot, item.style.width / 2.0),
            _ => surface.stroke_polyline(points),
        },
    }
    surface.restore();
}

fn draw_arrowhead(surface: &mut dyn Surface, start: Point, end: Point) {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let half = ARROWHEAD_LENGTH / 2.0;
    let wing = |dy: f64| Point::new(-ARROWHEAD_LENGTH, dy).rotate_about(Point::default(), angle);
    let left = wing(-half);
    let right = wing(half);
    surface.stroke_polyline(&[end.offset(left.x, left.y), end, end.offset(right.x, right.y)]);
}

fn handle_square(at: Point) -> Bounds {
    Bounds::new(
        at.x - HANDLE_SIZE / 2.0,
        at.y - HANDLE_SIZE / 2.0,
        HANDLE_SIZE,
        HANDLE_SIZE,
    )
}

/// Draw the selection overlay for `item`.
pub fn draw_selection(
    surface: &mut dyn Surface,
    item: &Item,
    color: &str,
    measure: &dyn TextMeasure,
) {
    surface.save();
    surface.set_stroke(color, 1.0);
    surface.set_fill(color);
    surface.set_alpha(1.0);

    if item.shape.is_segment() {
        let ends: Vec<Point> = handle_positions(item, measure)
            .into_iter()
            .map(|(_, at)| at)
            .collect();
        surface.set_line_dash(&OVERLAY_DASH);
        surface.stroke_polyline(&ends);
        surface.set_line_dash(&[]);
        for at in ends {
            surface.fill_circle(at, HANDLE_SIZE);
            surface.stroke_circle(at, HANDLE_SIZE);
        }
        surface.restore();
        return;
    }

    let bounds = item.bounds(measure);
    let c = item.center(measure);
    surface.translate(c.x, c.y);
    surface.rotate(item.angle);
    surface.translate(-c.x, -c.y);

    surface.set_line_dash(&OVERLAY_DASH);
    surface.stroke_rect(Bounds::new(
        bounds.x - OVERLAY_PADDING,
        bounds.y - OVERLAY_PADDING,
        bounds.width + OVERLAY_PADDING * 2.0,
        bounds.height + OVERLAY_PADDING * 2.0,
    ));
    surface.set_line_dash(&[]);

    // Handles are drawn in the rotated frame, so use unrotated positions here.
    let unrotated = item.clone().with_angle(0.0);
    for (_, at) in handle_positions(&unrotated, measure) {
        surface.fill_rect(handle_square(at));
        surface.stroke_rect(handle_square(at));
    }

    if let Some(knob) = rotation_handle(&unrotated, measure) {
        surface.stroke_polyline(&[bounds.at(0.5, 0.0), knob]);
        surface.fill_circle(knob, HANDLE_SIZE / 2.0);
        surface.stroke_circle(knob, HANDLE_SIZE / 2.0);
    }
    surface.restore();
}
