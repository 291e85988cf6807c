//! Selection handles and the move/resize/rotate math.
//!
//! All functions work in plan space. Box handles sit on the item's local
//! bounds and are rotated with the item about its center; resize maps the
//! pointer back into that local frame before measuring anything.

use crate::geometry::Point;
use crate::text::TextMeasure;
use crate::tool::Handle;
use crate::{Item, Shape};

/// Side length of a square resize handle, and the hit half-width around it.
pub const HANDLE_SIZE: f64 = 8.0;

/// Distance of the rotation handle above the top edge of the bounds.
pub const ROTATION_HANDLE_DISTANCE: f64 = 30.0;

/// Grab radius around a line or arrow endpoint.
pub const ENDPOINT_GRAB_RADIUS: f64 = HANDLE_SIZE * 2.0;

/// Smallest width/height a resize can produce.
pub const MIN_SIZE: f64 = 5.0;

/// Text width that corresponds to a font-scale multiplier of 1.
pub const TEXT_WIDTH_PER_SCALE: f64 = 20.0;

/// Font-scale range a text resize is clamped to.
pub const TEXT_SCALE_RANGE: (f64, f64) = (1.0, 10.0);

/// World positions of every resize handle of `item`.
///
/// Lines and arrows expose their two endpoints; everything else the eight
/// box handles.
#[must_use]
pub fn handle_positions(item: &Item, measure: &dyn TextMeasure) -> Vec<(Handle, Point)> {
    if let Some((start, end)) = item.shape.endpoints() {
        let center = item.center(measure);
        return vec![
            (Handle::Start, start.rotate_about(center, item.angle)),
            (Handle::End, end.rotate_about(center, item.angle)),
        ];
    }
    let bounds = item.bounds(measure);
    let center = item.center(measure);
    Handle::BOX
        .into_iter()
        .filter_map(|handle| {
            let (fx, fy) = handle.fraction()?;
            Some((handle, bounds.at(fx, fy).rotate_about(center, item.angle)))
        })
        .collect()
}

/// World position of the rotation handle, if the item has one.
#[must_use]
pub fn rotation_handle(item: &Item, measure: &dyn TextMeasure) -> Option<Point> {
    if !item.supports_rotation() {
        return None;
    }
    let bounds = item.bounds(measure);
    let top = bounds.at(0.5, 0.0);
    Some(
        top.offset(0.0, -ROTATION_HANDLE_DISTANCE)
            .rotate_about(item.center(measure), item.angle),
    )
}

/// Resize handle under `p`, if any.
#[must_use]
pub fn handle_at(item: &Item, p: Point, measure: &dyn TextMeasure) -> Option<Handle> {
    handle_positions(item, measure)
        .into_iter()
        .find(|(handle, at)| match handle {
            Handle::Start | Handle::End => p.distance(*at) < ENDPOINT_GRAB_RADIUS,
            _ => (p.x - at.x).abs() < HANDLE_SIZE && (p.y - at.y).abs() < HANDLE_SIZE,
        })
        .map(|(handle, _)| handle)
}

/// Whether `p` is on the rotation handle.
#[must_use]
pub fn on_rotation_handle(item: &Item, p: Point, measure: &dyn TextMeasure) -> bool {
    rotation_handle(item, measure).is_some_and(|at| p.distance(at) < HANDLE_SIZE)
}

/// Horizontal and vertical side a handle pulls: -1 for left/top, 1 for
/// right/bottom, 0 when the axis is not affected.
fn sides(handle: Handle) -> (i8, i8) {
    match handle {
        Handle::Nw => (-1, -1),
        Handle::N => (0, -1),
        Handle::Ne => (1, -1),
        Handle::E => (1, 0),
        Handle::Se => (1, 1),
        Handle::S => (0, 1),
        Handle::Sw => (-1, 1),
        Handle::W => (-1, 0),
        Handle::Start | Handle::End => (0, 0),
    }
}

/// New extent along one axis when the `side` edge follows `local`.
///
/// `half` is half the original extent; the opposite edge stays put.
fn pulled_extent(side: i8, local: f64, half: f64) -> f64 {
    match side {
        -1 => half - local,
        1 => local + half,
        _ => half * 2.0,
    }
}

/// Resize `item` so that `handle` follows `p`.
///
/// `origin` is the item as it was when the gesture started. Rectangles keep
/// the opposite edge anchored, circles keep their center, text keeps its
/// anchor and paths scale about their center.
pub fn resize(item: &mut Item, origin: &Item, handle: Handle, p: Point, measure: &dyn TextMeasure) {
    let center = origin.center(measure);
    let angle = origin.angle;

    if let Some((start, end)) = origin.shape.endpoints() {
        let target = p.rotate_about(center, -angle);
        let (a, b) = match handle {
            Handle::Start => (target, end),
            Handle::End => (start, target),
            _ => return,
        };
        if let Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2 } = &mut item.shape
        {
            *x1 = a.x;
            *y1 = a.y;
            *x2 = b.x;
            *y2 = b.y;
        }
        return;
    }

    let local = p.to_local(center, angle);
    let bounds = origin.bounds(measure);
    let (sx, sy) = sides(handle);
    let half_w = bounds.width / 2.0;
    let half_h = bounds.height / 2.0;
    let new_w = pulled_extent(sx, local.x, half_w).max(MIN_SIZE);
    let new_h = pulled_extent(sy, local.y, half_h).max(MIN_SIZE);

    match (&mut item.shape, &origin.shape) {
        (Shape::Rect { x, y, width, height }, Shape::Rect { .. }) => {
            // Offset of the new local center from the old one.
            let shift_x = match sx {
                -1 => half_w - new_w / 2.0,
                1 => new_w / 2.0 - half_w,
                _ => 0.0,
            };
            let shift_y = match sy {
                -1 => half_h - new_h / 2.0,
                1 => new_h / 2.0 - half_h,
                _ => 0.0,
            };
            let new_center = center
                .offset(shift_x, shift_y)
                .rotate_about(center, angle);
            *x = new_center.x - new_w / 2.0;
            *y = new_center.y - new_h / 2.0;
            *width = new_w;
            *height = new_h;
        }
        (Shape::Circle { radius, .. }, Shape::Circle { .. }) => {
            let reach = match (sx, sy) {
                (0, _) => local.y.abs(),
                (_, 0) => local.x.abs(),
                _ => local.x.abs().max(local.y.abs()),
            };
            *radius = (reach * 2.0).max(MIN_SIZE) / 2.0;
        }
        (Shape::Text { .. }, Shape::Text { .. }) => {
            let (lo, hi) = TEXT_SCALE_RANGE;
            item.style.width = (new_w / TEXT_WIDTH_PER_SCALE).clamp(lo, hi);
        }
        (Shape::Path { points }, Shape::Path { points: original }) => {
            let scale = |side: i8, reach: f64, half: f64| {
                if side == 0 || half <= 0.0 {
                    return 1.0;
                }
                let reach = if side < 0 { -reach } else { reach };
                (reach / half).max(MIN_SIZE / (half * 2.0))
            };
            let scale_x = scale(sx, local.x, half_w);
            let scale_y = scale(sy, local.y, half_h);
            *points = original
                .iter()
                .map(|pt| {
                    Point::new(
                        center.x + (pt.x - center.x) * scale_x,
                        center.y + (pt.y - center.y) * scale_y,
                    )
                })
                .collect();
        }
        _ => {}
    }
}

/// Pointer angle about the item's center minus the item's rotation.
#[must_use]
pub fn rotation_offset(item: &Item, p: Point, measure: &dyn TextMeasure) -> f64 {
    pointer_angle(item, p, measure) - item.angle
}

/// Rotate `item` so the pointer keeps the angular offset it had at gesture start.
pub fn rotate(item: &mut Item, p: Point, offset: f64, measure: &dyn TextMeasure) {
    item.angle = pointer_angle(item, p, measure) - offset;
}

fn pointer_angle(item: &Item, p: Point, measure: &dyn TextMeasure) -> f64 {
    let c = item.center(measure);
    (p.y - c.y).atan2(p.x - c.x)
}

/// Pointer minus item center, captured when a drag starts.
#[must_use]
pub fn drag_offset(item: &Item, p: Point, measure: &dyn TextMeasure) -> Point {
    let c = item.center(measure);
    Point::new(p.x - c.x, p.y - c.y)
}

/// Move `item` so its center sits at `p - offset`.
pub fn drag(item: &mut Item, p: Point, offset: Point, measure: &dyn TextMeasure) {
    let c = item.center(measure);
    item.translate(p.x - offset.x - c.x, p.y - offset.y - c.y);
}
