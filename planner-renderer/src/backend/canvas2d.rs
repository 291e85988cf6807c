//! Canvas2D display-list backend.
//!
//! Records every drawing call as a [`DrawCommand`]. A browser host replays
//! the list against its `CanvasRenderingContext2D`; tests inspect it directly.

use planner_core::{Bounds, Point, Surface};
use serde::{Deserialize, Serialize};

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// One Canvas2D call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// `clearRect` over the whole canvas.
    Clear {
        /// Canvas width.
        width: f64,
        /// Canvas height.
        height: f64,
    },
    /// `save()`.
    Save,
    /// `restore()`.
    Restore,
    /// `translate(dx, dy)`.
    Translate {
        /// X offset.
        dx: f64,
        /// Y offset.
        dy: f64,
    },
    /// `rotate(angle)`.
    Rotate {
        /// Radians.
        angle: f64,
    },
    /// `scale(sx, sy)`.
    Scale {
        /// X factor.
        sx: f64,
        /// Y factor.
        sy: f64,
    },
    /// `strokeStyle` and `lineWidth`.
    SetStroke {
        /// CSS color.
        color: String,
        /// Line width.
        width: f64,
    },
    /// `fillStyle`.
    SetFill {
        /// CSS color.
        color: String,
    },
    /// `globalAlpha`.
    SetAlpha {
        /// 0.0 to 1.0.
        alpha: f64,
    },
    /// `setLineDash`.
    SetLineDash {
        /// Dash pattern, empty for solid.
        dash: Vec<f64>,
    },
    /// `beginPath; moveTo; lineTo...; stroke`.
    StrokePolyline {
        /// Vertices.
        points: Vec<Point>,
    },
    /// `strokeRect`.
    StrokeRect {
        /// Rectangle.
        rect: Bounds,
    },
    /// `fillRect`.
    FillRect {
        /// Rectangle.
        rect: Bounds,
    },
    /// `arc` then `stroke`.
    StrokeCircle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// `arc` then `fill`.
    FillCircle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// `font` then `fillText`.
    FillText {
        /// Content.
        text: String,
        /// Baseline-left anchor.
        at: Point,
        /// CSS font shorthand.
        font: String,
    },
}

/// Recording 2D canvas backend.
pub struct Canvas2DBackend {
    width: u32,
    height: u32,
    background: String,
    commands: Vec<DrawCommand>,
    finished: Option<Vec<DrawCommand>>,
    depth: usize,
}

impl Canvas2DBackend {
    /// Create a new 2D canvas backend with a transparent background.
    #[must_use]
    pub fn new() -> Self {
        Self::with_background("transparent")
    }

    /// Create a backend that paints `background` on every clear.
    #[must_use]
    pub fn with_background(background: impl Into<String>) -> Self {
        Self {
            width: 800,
            height: 800,
            background: background.into(),
            commands: Vec::new(),
            finished: None,
            depth: 0,
        }
    }

    /// Commands recorded for the frame in progress.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands of the last finished frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&[DrawCommand]> {
        self.finished.as_deref()
    }

    /// Current surface size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Default for Canvas2DBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for Canvas2DBackend {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.clear();
        self.depth = 0;
        self.push(DrawCommand::Clear { width, height });
        if self.background != "transparent" {
            self.push(DrawCommand::SetFill {
                color: self.background.clone(),
            });
            self.push(DrawCommand::FillRect {
                rect: Bounds::new(0.0, 0.0, width, height),
            });
        }
    }

    fn save(&mut self) {
        self.depth += 1;
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        // Like the browser, a restore without a save is a no-op.
        if self.depth == 0 {
            tracing::warn!("Canvas2D restore without matching save");
            return;
        }
        self.depth -= 1;
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, angle: f64) {
        self.push(DrawCommand::Rotate { angle });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.push(DrawCommand::Scale { sx, sy });
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.push(DrawCommand::SetStroke {
            color: color.to_string(),
            width,
        });
    }

    fn set_fill(&mut self, color: &str) {
        self.push(DrawCommand::SetFill {
            color: color.to_string(),
        });
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.push(DrawCommand::SetAlpha { alpha });
    }

    fn set_line_dash(&mut self, dash: &[f64]) {
        self.push(DrawCommand::SetLineDash {
            dash: dash.to_vec(),
        });
    }

    fn stroke_polyline(&mut self, points: &[Point]) {
        self.push(DrawCommand::StrokePolyline {
            points: points.to_vec(),
        });
    }

    fn stroke_rect(&mut self, rect: Bounds) {
        self.push(DrawCommand::StrokeRect { rect });
    }

    fn fill_rect(&mut self, rect: Bounds) {
        self.push(DrawCommand::FillRect { rect });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64) {
        self.push(DrawCommand::StrokeCircle { center, radius });
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        self.push(DrawCommand::FillCircle { center, radius });
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &str) {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
            font: font.to_string(),
        });
    }
}

impl RenderBackend for Canvas2DBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Canvas2D
    }

    fn surface(&mut self) -> &mut dyn Surface {
        self
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        if self.depth != 0 {
            return Err(RenderError::Frame(format!(
                "{} unmatched save call(s)",
                self.depth
            )));
        }
        tracing::trace!(
            "Canvas2D frame: {} commands, viewport {}x{}",
            self.commands.len(),
            self.width,
            self.height
        );
        self.finished = Some(std::mem::take(&mut self.commands));
        Ok(())
    }

    fn output(&self) -> RenderResult<String> {
        let frame = self
            .finished
            .as_ref()
            .ok_or_else(|| RenderError::Frame("no frame rendered yet".to_string()))?;
        serde_json::to_string(frame).map_err(|e| RenderError::Export(e.to_string()))
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "invalid size {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        tracing::debug!("Canvas2D resized to {}x{}", width, height);
        Ok(())
    }
}
