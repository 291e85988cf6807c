//! SVG backend.
//!
//! Turns the Canvas2D call stream into standalone SVG markup. Canvas
//! transforms are tracked as a 2x3 matrix and written onto each element, so
//! the output has no nested groups to keep balanced.

use std::fmt::Write;

use planner_core::{Bounds, Point, Surface};

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// Affine matrix `[a, b, c, d, e, f]` as in `CanvasRenderingContext2D::transform`.
type Matrix = [f64; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m` followed by `n`, the way a canvas post-multiplies.
fn multiply(m: Matrix, n: Matrix) -> Matrix {
    [
        m[0] * n[0] + m[2] * n[1],
        m[1] * n[0] + m[3] * n[1],
        m[0] * n[2] + m[2] * n[3],
        m[1] * n[2] + m[3] * n[3],
        m[0] * n[4] + m[2] * n[5] + m[4],
        m[1] * n[4] + m[3] * n[5] + m[5],
    ]
}

#[derive(Debug, Clone)]
struct State {
    matrix: Matrix,
    stroke: String,
    line_width: f64,
    fill: String,
    alpha: f64,
    dash: Vec<f64>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            matrix: IDENTITY,
            stroke: "#000000".to_string(),
            line_width: 1.0,
            fill: "#000000".to_string(),
            alpha: 1.0,
            dash: Vec::new(),
        }
    }
}

/// Escape special XML characters.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// SVG-producing backend.
pub struct SvgBackend {
    width: u32,
    height: u32,
    background: String,
    backdrop: Option<String>,
    body: String,
    finished: Option<String>,
    state: State,
    stack: Vec<State>,
}

impl SvgBackend {
    /// Create an SVG backend with a transparent background.
    #[must_use]
    pub fn new() -> Self {
        Self::with_background("transparent")
    }

    /// Create a backend that paints `background` behind the drawing.
    #[must_use]
    pub fn with_background(background: impl Into<String>) -> Self {
        Self {
            width: 800,
            height: 800,
            background: background.into(),
            backdrop: None,
            body: String::new(),
            finished: None,
            state: State::default(),
            stack: Vec::new(),
        }
    }

    /// Place an image (usually the map radar) under the drawing.
    pub fn set_backdrop(&mut self, href: Option<String>) {
        self.backdrop = href;
    }

    /// Markup of the last finished frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&str> {
        self.finished.as_deref()
    }

    #[allow(clippy::float_cmp)]
    fn transform_attr(&self) -> String {
        let m = self.state.matrix;
        if m == IDENTITY {
            return String::new();
        }
        format!(
            " transform=\"matrix({} {} {} {} {} {})\"",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }

    fn stroke_attrs(&self) -> String {
        let s = &self.state;
        let mut attrs = format!(
            " fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
            escape_xml(&s.stroke),
            s.line_width
        );
        if s.alpha < 1.0 {
            let _ = write!(attrs, " opacity=\"{}\"", s.alpha);
        }
        if !s.dash.is_empty() {
            let dash: Vec<String> = s.dash.iter().map(ToString::to_string).collect();
            let _ = write!(attrs, " stroke-dasharray=\"{}\"", dash.join(" "));
        }
        attrs.push_str(&self.transform_attr());
        attrs
    }

    fn fill_attrs(&self) -> String {
        let s = &self.state;
        let mut attrs = format!(" fill=\"{}\"", escape_xml(&s.fill));
        if s.alpha < 1.0 {
            let _ = write!(attrs, " opacity=\"{}\"", s.alpha);
        }
        attrs.push_str(&self.transform_attr());
        attrs
    }

    fn apply(&mut self, n: Matrix) {
        self.state.matrix = multiply(self.state.matrix, n);
    }
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for SvgBackend {
    fn clear(&mut self, width: f64, height: f64) {
        self.state = State::default();
        self.stack.clear();
        self.body.clear();

        let _ = write!(
            self.body,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {width} {height}\">",
            self.width, self.height,
        );
        if self.background != "transparent" {
            let _ = write!(
                self.body,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(&self.background)
            );
        }
        if let Some(href) = &self.backdrop {
            let _ = write!(
                self.body,
                "<image href=\"{}\" x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"none\"/>",
                escape_xml(href)
            );
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("SVG restore without matching save"),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.apply([1.0, 0.0, 0.0, 1.0, dx, dy]);
    }

    fn rotate(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        self.apply([cos, sin, -sin, cos, 0.0, 0.0]);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.apply([sx, 0.0, 0.0, sy, 0.0, 0.0]);
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.state.stroke = color.to_string();
        self.state.line_width = width;
    }

    fn set_fill(&mut self, color: &str) {
        self.state.fill = color.to_string();
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_line_dash(&mut self, dash: &[f64]) {
        self.state.dash = dash.to_vec();
    }

    fn stroke_polyline(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        let coords: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
        let attrs = self.stroke_attrs();
        let _ = write!(
            self.body,
            "<polyline points=\"{}\"{attrs}/>",
            coords.join(" ")
        );
    }

    fn stroke_rect(&mut self, rect: Bounds) {
        let attrs = self.stroke_attrs();
        let _ = write!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{attrs}/>",
            rect.x, rect.y, rect.width, rect.height
        );
    }

    fn fill_rect(&mut self, rect: Bounds) {
        let attrs = self.fill_attrs();
        let _ = write!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{attrs}/>",
            rect.x, rect.y, rect.width, rect.height
        );
    }

    fn stroke_circle(&mut self, center: Point, radius: f64) {
        let attrs = self.stroke_attrs();
        let _ = write!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{radius}\"{attrs}/>",
            center.x, center.y
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        let attrs = self.fill_attrs();
        let _ = write!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{radius}\"{attrs}/>",
            center.x, center.y
        );
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &str) {
        let attrs = self.fill_attrs();
        let _ = write!(
            self.body,
            "<text x=\"{}\" y=\"{}\" style=\"font: {}\"{attrs}>{}</text>",
            at.x,
            at.y,
            escape_xml(font),
            escape_xml(text)
        );
    }
}

impl RenderBackend for SvgBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Svg
    }

    fn surface(&mut self) -> &mut dyn Surface {
        self
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        if !self.stack.is_empty() {
            return Err(RenderError::Frame(format!(
                "{} unmatched save call(s)",
                self.stack.len()
            )));
        }
        if self.body.is_empty() {
            return Err(RenderError::Frame("frame was never cleared".to_string()));
        }
        let mut svg = std::mem::take(&mut self.body);
        svg.push_str("</svg>");
        tracing::trace!(bytes = svg.len(), "SVG frame finished");
        self.finished = Some(svg);
        Ok(())
    }

    fn output(&self) -> RenderResult<String> {
        self.finished
            .clone()
            .ok_or_else(|| RenderError::Frame("no frame rendered yet".to_string()))
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "invalid size {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        tracing::debug!("SVG surface resized to {}x{}", width, height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rotation_about_center_matrix() {
        // translate(c) rotate(90deg) translate(-c) maps (c.x + 1, c.y) to (c.x, c.y + 1).
        let mut svg = SvgBackend::new();
        svg.translate(10.0, 20.0);
        svg.rotate(std::f64::consts::FRAC_PI_2);
        svg.translate(-10.0, -20.0);
        let m = svg.state.matrix;
        let (x, y) = (11.0, 20.0);
        let tx = m[0] * x + m[2] * y + m[4];
        let ty = m[1] * x + m[3] * y + m[5];
        assert!(approx(tx, 10.0) && approx(ty, 21.0));
    }

    #[test]
    fn test_restore_pops_transform_and_style() {
        let mut svg = SvgBackend::new();
        svg.clear(100.0, 100.0);
        svg.save();
        svg.scale(2.0, 2.0);
        svg.set_stroke("#ff0000", 4.0);
        svg.restore();
        svg.stroke_rect(Bounds::new(1.0, 2.0, 3.0, 4.0));
        svg.end_frame().expect("frame");
        let out = svg.output().expect("svg");
        assert!(out.contains("<rect x=\"1\" y=\"2\" width=\"3\" height=\"4\" fill=\"none\" stroke=\"#000000\""));
        assert!(!out.contains("matrix("));
    }

    #[test]
    fn test_dash_and_alpha_attributes() {
        let mut svg = SvgBackend::new();
        svg.clear(100.0, 100.0);
        svg.set_alpha(0.5);
        svg.set_line_dash(&[5.0, 5.0]);
        svg.stroke_polyline(&[Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        svg.end_frame().expect("frame");
        let out = svg.output().expect("svg");
        assert!(out.contains("points=\"0,0 10,10\""));
        assert!(out.contains("opacity=\"0.5\""));
        assert!(out.contains("stroke-dasharray=\"5 5\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut svg = SvgBackend::with_background("#ffffff");
        svg.clear(100.0, 100.0);
        svg.fill_text("A <&> B", Point::new(5.0, 5.0), "15px Arial");
        svg.end_frame().expect("frame");
        let out = svg.output().expect("svg");
        assert!(out.contains("A &lt;&amp;&gt; B"));
        assert!(out.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_end_frame_requires_clear() {
        let mut svg = SvgBackend::new();
        assert!(svg.end_frame().is_err());
    }
}
