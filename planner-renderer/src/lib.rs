//! # Strategy Planner Renderer
//!
//! Concrete drawing targets for the planner's redraw pipeline.
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │      planner_core::render::draw_frame       │
//! ├──────────────────────┬──────────────────────┤
//! │ Canvas2D             │ SVG                  │
//! │ (display list, JSON) │ (standalone markup)  │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;
pub mod export;

pub use backend::canvas2d::{Canvas2DBackend, DrawCommand};
pub use backend::svg::SvgBackend;
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, PlanExporter};

use std::fmt;
use std::str::FromStr;

use planner_core::render::{draw_frame, OVERLAY_COLOR};
use planner_core::Frame;

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Preferred backend.
    pub preferred_backend: BackendType,
    /// CSS color painted under the drawing, or `transparent` to let the host's
    /// map image show through.
    pub background_color: String,
    /// CSS color of the selection overlay.
    pub overlay_color: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::Canvas2D,
            background_color: "transparent".to_string(),
            overlay_color: OVERLAY_COLOR.to_string(),
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Recorded Canvas2D calls, replayed by a browser host.
    Canvas2D,
    /// SVG markup.
    Svg,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Canvas2D => "canvas2d",
            Self::Svg => "svg",
        })
    }
}

impl FromStr for BackendType {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "canvas2d" | "canvas" => Ok(Self::Canvas2D),
            "svg" => Ok(Self::Svg),
            other => Err(RenderError::NoBackend(other.to_string())),
        }
    }
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable backend is available.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        let backend = Self::create_backend(&config)?;
        tracing::debug!(backend = %backend.backend_type(), "Renderer created");

        Ok(Self {
            config,
            backend,
            frame_count: 0,
        })
    }

    /// Create the backend named by the config.
    #[allow(clippy::unnecessary_wraps)]
    fn create_backend(config: &RendererConfig) -> RenderResult<Box<dyn RenderBackend>> {
        let background = config.background_color.clone();
        Ok(match config.preferred_backend {
            BackendType::Canvas2D => Box::new(Canvas2DBackend::with_background(background)),
            BackendType::Svg => Box::new(SvgBackend::with_background(background)),
        })
    }

    /// Render a frame.
    ///
    /// The frame's overlay color is replaced by the configured one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the frame.
    pub fn render(&mut self, frame: &Frame<'_>) -> RenderResult<()> {
        let frame = Frame {
            overlay: &self.config.overlay_color,
            ..*frame
        };
        draw_frame(self.backend.surface(), &frame);
        self.backend.end_frame()?;
        self.frame_count += 1;
        Ok(())
    }

    /// Serialized last frame: a JSON display list or SVG markup depending on
    /// the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been rendered yet.
    pub fn output(&self) -> RenderResult<String> {
        self.backend.output()
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)
    }
}

/// Renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
