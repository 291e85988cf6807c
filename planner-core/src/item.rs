//! Drawable items - the building blocks of a layer.

use serde::{Deserialize, Serialize};

use crate::geometry::{in_circle, near_polyline, near_segment, Bounds, Point};
use crate::text::{TextMeasure, FONT_SCALE};

/// Padding added around a line's endpoints when computing its bounds.
pub const LINE_BOUNDS_PADDING: f64 = 10.0;

/// Stroke/fill styling shared by every item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// CSS color string, usually `#rrggbb`.
    pub color: String,
    /// Stroke width in pixels. Text items use it as the font-size multiplier.
    pub width: f64,
    /// Opacity from 0.0 to 1.0.
    pub opacity: f64,
}

impl Style {
    /// Create a style.
    #[must_use]
    pub fn new(color: impl Into<String>, width: f64, opacity: f64) -> Self {
        Self {
            color: color.into(),
            width,
            opacity,
        }
    }
}

/// Geometry of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Straight segment.
    Line {
        /// Start X.
        x1: f64,
        /// Start Y.
        y1: f64,
        /// End X.
        x2: f64,
        /// End Y.
        y2: f64,
    },
    /// Segment with an arrowhead at the end point.
    Arrow {
        /// Start X.
        x1: f64,
        /// Start Y.
        y1: f64,
        /// End X (arrowhead).
        x2: f64,
        /// End Y (arrowhead).
        y2: f64,
    },
    /// Axis-aligned rectangle (before rotation).
    ///
    /// The size travels as `w`/`h` because `width` is the stroke width.
    /// `height` is accepted for `h`, but a rectangle without `w` cannot be
    /// recovered and fails to decode.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        #[serde(rename = "w")]
        width: f64,
        /// Height.
        #[serde(rename = "h", alias = "height")]
        height: f64,
    },
    /// Circle.
    Circle {
        /// Center X.
        x: f64,
        /// Center Y.
        y: f64,
        /// Radius.
        radius: f64,
    },
    /// Text anchored at its baseline-left corner.
    Text {
        /// Anchor X.
        x: f64,
        /// Anchor Y (baseline).
        y: f64,
        /// Content.
        text: String,
    },
    /// Freehand polyline.
    Path {
        /// Points in drawing order.
        points: Vec<Point>,
    },
}

impl Shape {
    /// Lines and arrows are edited through their endpoints.
    #[must_use]
    pub fn is_segment(&self) -> bool {
        matches!(self, Self::Line { .. } | Self::Arrow { .. })
    }

    /// Endpoints of a line or arrow.
    #[must_use]
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match *self {
            Self::Line { x1, y1, x2, y2 } | Self::Arrow { x1, y1, x2, y2 } => {
                Some((Point::new(x1, y1), Point::new(x2, y2)))
            }
            _ => None,
        }
    }

    /// Short type name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Arrow { .. } => "arrow",
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
            Self::Path { .. } => "path",
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp)]
fn is_zero(angle: &f64) -> bool {
    *angle == 0.0
}

/// A styled shape with an optional rotation about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Geometry.
    #[serde(flatten)]
    pub shape: Shape,
    /// Styling.
    #[serde(flatten)]
    pub style: Style,
    /// Rotation in radians about [`Item::center`].
    #[serde(default, skip_serializing_if = "is_zero")]
    pub angle: f64,
}

impl Item {
    /// Create an unrotated item.
    #[must_use]
    pub fn new(shape: Shape, style: Style) -> Self {
        Self {
            shape,
            style,
            angle: 0.0,
        }
    }

    /// Set the rotation.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Font size in pixels for text items.
    #[must_use]
    pub fn font_px(&self) -> f64 {
        self.style.width * FONT_SCALE
    }

    /// Bounding box in the item's local, unrotated frame.
    #[must_use]
    pub fn bounds(&self, measure: &dyn TextMeasure) -> Bounds {
        match &self.shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => Bounds::new(*x, *y, *width, *height),
            Shape::Circle { x, y, radius } => {
                Bounds::new(x - radius, y - radius, radius * 2.0, radius * 2.0)
            }
            Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2 } => Bounds::new(
                x1.min(*x2) - LINE_BOUNDS_PADDING,
                y1.min(*y2) - LINE_BOUNDS_PADDING,
                (x2 - x1).abs() + LINE_BOUNDS_PADDING * 2.0,
                (y2 - y1).abs() + LINE_BOUNDS_PADDING * 2.0,
            ),
            Shape::Text { x, y, text } => {
                let m = measure.measure(text, self.font_px());
                Bounds::new(*x, y - m.ascent, m.width, m.ascent + m.descent)
            }
            Shape::Path { points } => Bounds::enclosing(points).unwrap_or_default(),
        }
    }

    /// Geometric center, used as the rotation pivot.
    #[must_use]
    pub fn center(&self, measure: &dyn TextMeasure) -> Point {
        match &self.shape {
            Shape::Circle { x, y, .. } => Point::new(*x, *y),
            Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2 } => {
                Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0)
            }
            Shape::Text { x, y, text } => {
                let m = measure.measure(text, self.font_px());
                Point::new(x + m.width / 2.0, y - m.ascent / 2.0)
            }
            Shape::Rect { .. } | Shape::Path { .. } => self.bounds(measure).center(),
        }
    }

    /// Whether `p` (plan space) hits this item.
    ///
    /// `tolerance` is the stroke distance for segments and paths and the padding
    /// for rectangles, text and circles. The point is first rotated into the
    /// item's local frame.
    #[must_use]
    pub fn hit(&self, p: Point, tolerance: f64, measure: &dyn TextMeasure) -> bool {
        let center = self.center(measure);
        let local = p.rotate_about(center, -self.angle);
        match &self.shape {
            Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2 } => near_segment(
                local,
                Point::new(*x1, *y1),
                Point::new(*x2, *y2),
                tolerance,
            ),
            Shape::Rect { .. } | Shape::Text { .. } => {
                self.bounds(measure).contains(local, tolerance)
            }
            Shape::Circle { x, y, radius } => {
                in_circle(local, Point::new(*x, *y), *radius, tolerance)
            }
            Shape::Path { points } => near_polyline(local, points, tolerance),
        }
    }

    /// Move every position field by (`dx`, `dy`).
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match &mut self.shape {
            Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2 } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
            }
            Shape::Rect { x, y, .. } | Shape::Circle { x, y, .. } | Shape::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Shape::Path { points } => {
                for p in points {
                    p.x += dx;
                    p.y += dy;
                }
            }
        }
    }

    /// Lines and arrows never expose a rotation handle.
    #[must_use]
    pub fn supports_rotation(&self) -> bool {
        !self.shape.is_segment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::ApproxTextMeasure;
    use std::f64::consts::FRAC_PI_2;

    fn style() -> Style {
        Style::new("#ff8300", 3.0, 1.0)
    }

    fn rect(x: f64, y: f64, width: f64, height: f64) -> Item {
        Item::new(
            Shape::Rect {
                x,
                y,
                width,
                height,
            },
            style(),
        )
    }

    #[test]
    fn test_rect_center_and_bounds() {
        let m = ApproxTextMeasure::default();
        let r = rect(10.0, 10.0, 100.0, 50.0);
        assert_eq!(r.center(&m), Point::new(60.0, 35.0));
        assert_eq!(r.bounds(&m), Bounds::new(10.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_line_bounds_are_padded() {
        let m = ApproxTextMeasure::default();
        let line = Item::new(
            Shape::Line {
                x1: 100.0,
                y1: 0.0,
                x2: 0.0,
                y2: 50.0,
            },
            style(),
        );
        assert_eq!(line.bounds(&m), Bounds::new(-10.0, -10.0, 120.0, 70.0));
        assert_eq!(line.center(&m), Point::new(50.0, 25.0));
    }

    #[test]
    fn test_rotated_rect_hit_uses_local_frame() {
        let m = ApproxTextMeasure::default();
        // A 100x10 bar centered at (50, 5), rotated a quarter turn becomes vertical.
        let bar = rect(0.0, 0.0, 100.0, 10.0).with_angle(FRAC_PI_2);
        assert!(bar.hit(Point::new(50.0, 40.0), 0.0, &m));
        assert!(!bar.hit(Point::new(90.0, 5.0), 0.0, &m));
    }

    #[test]
    fn test_circle_hit_with_padding() {
        let m = ApproxTextMeasure::default();
        let c = Item::new(
            Shape::Circle {
                x: 0.0,
                y: 0.0,
                radius: 10.0,
            },
            style(),
        );
        assert!(c.hit(Point::new(0.0, 10.0), 0.0, &m));
        assert!(!c.hit(Point::new(0.0, 13.0), 0.0, &m));
        assert!(c.hit(Point::new(0.0, 13.0), 4.0, &m));
    }

    #[test]
    fn test_translate_moves_path_points() {
        let mut path = Item::new(
            Shape::Path {
                points: vec![Point::new(0.0, 0.0), Point::new(4.0, 2.0)],
            },
            style(),
        );
        path.translate(1.0, -1.0);
        let Shape::Path { points } = &path.shape else {
            panic!("expected path");
        };
        assert_eq!(points, &vec![Point::new(1.0, -1.0), Point::new(5.0, 1.0)]);
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let json = serde_json::to_value(rect(1.0, 2.0, 30.0, 4.0)).expect("serialize");
        assert_eq!(json["type"], "rect");
        assert_eq!(json["w"], 30.0);
        assert_eq!(json["width"], 3.0);
        assert_eq!(json["color"], "#ff8300");
        assert!(json.get("angle").is_none());
    }
}
