//! Plan export to SVG.
//!
//! Renders a decoded [`Plan`] without an engine: visible layers only, no
//! preview and no selection overlay.

use planner_core::render::{draw_frame, OVERLAY_COLOR};
use planner_core::{ApproxTextMeasure, Extent, Frame, MapCatalog, Plan, TextMeasure};

use crate::backend::svg::SvgBackend;
use crate::backend::RenderBackend;
use crate::error::{RenderError, RenderResult};

/// Logical size assumed for plans saved without an extent.
pub const DEFAULT_EXTENT: Extent = Extent::new(800.0, 800.0);

/// Configuration for plan export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output width in pixels (default: plan extent width).
    pub width: Option<u32>,
    /// Output height in pixels (default: plan extent height).
    pub height: Option<u32>,
    /// Background CSS color.
    pub background: String,
    /// Draw the plan's map image under the drawing.
    pub include_map: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: "#ffffff".to_string(),
            include_map: false,
        }
    }
}

/// Exports a [`Plan`] as SVG.
pub struct PlanExporter {
    config: ExportConfig,
    maps: MapCatalog,
    measure: Box<dyn TextMeasure>,
}

impl PlanExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            maps: MapCatalog::default(),
            measure: Box::new(ApproxTextMeasure::default()),
        }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Resolve map images against `maps` instead of the built-in catalog.
    #[must_use]
    pub fn with_maps(mut self, maps: MapCatalog) -> Self {
        self.maps = maps;
        self
    }

    /// Render the plan to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns an error if the output size is zero or the frame cannot be
    /// finished.
    pub fn render_to_svg(&self, plan: &Plan) -> RenderResult<String> {
        let extent = plan.extent.unwrap_or(DEFAULT_EXTENT);
        let (out_w, out_h) = self.output_dimensions(extent)?;

        let mut backend = SvgBackend::with_background(self.config.background.clone());
        backend.resize(out_w, out_h)?;
        if self.config.include_map {
            match self.maps.find(&plan.map) {
                Some(map) => backend.set_backdrop(Some(map.image.clone())),
                None => tracing::warn!(map = %plan.map, "No image for map; exporting without it"),
            }
        }

        // The drawing keeps plan coordinates; the root viewBox does the scaling.
        let frame = Frame {
            viewport: extent,
            extent,
            layers: &plan.layers,
            preview: None,
            selection: None,
            overlay: OVERLAY_COLOR,
            measure: self.measure.as_ref(),
        };
        draw_frame(backend.surface(), &frame);
        backend.end_frame()?;

        tracing::debug!(
            items = plan.item_count(),
            width = out_w,
            height = out_h,
            "Exported plan as SVG"
        );
        backend.output()
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn output_dimensions(&self, extent: Extent) -> RenderResult<(u32, u32)> {
        let width = self
            .config
            .width
            .unwrap_or_else(|| extent.width.max(1.0).round() as u32);
        let height = self
            .config
            .height
            .unwrap_or_else(|| extent.height.max(1.0).round() as u32);
        if width == 0 || height == 0 {
            return Err(RenderError::Export(format!(
                "invalid output size {width}x{height}"
            )));
        }
        Ok((width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{Item, Layer, Shape, Style};

    fn plan_with(items: Vec<Item>) -> Plan {
        let mut layer = Layer::new("Layer 1");
        layer.items = items;
        let mut plan = Plan::new("nord_oko");
        plan.layers.push(layer);
        plan
    }

    fn circle() -> Item {
        Item::new(
            Shape::Circle {
                x: 50.0,
                y: 60.0,
                radius: 20.0,
            },
            Style::new("#ff8300", 3.0, 1.0),
        )
    }

    #[test]
    fn test_svg_export_empty_plan() {
        let svg = PlanExporter::with_defaults()
            .render_to_svg(&Plan::new("nord_oko"))
            .expect("svg export");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("viewBox=\"0 0 800 800\""));
    }

    #[test]
    fn test_custom_dimensions_keep_plan_viewbox() {
        let exporter = PlanExporter::new(ExportConfig {
            width: Some(400),
            height: Some(300),
            ..ExportConfig::default()
        });
        let svg = exporter.render_to_svg(&plan_with(vec![circle()])).expect("svg");
        assert!(svg.contains("width=\"400\""));
        assert!(svg.contains("height=\"300\""));
        assert!(svg.contains("viewBox=\"0 0 800 800\""));
        assert!(svg.contains("<circle cx=\"50\" cy=\"60\" r=\"20\""));
    }

    #[test]
    fn test_hidden_layers_are_not_exported() {
        let mut plan = plan_with(vec![circle()]);
        plan.layers[0].visible = false;
        let svg = PlanExporter::with_defaults().render_to_svg(&plan).expect("svg");
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_map_backdrop() {
        let exporter = PlanExporter::new(ExportConfig {
            include_map: true,
            ..ExportConfig::default()
        });
        let svg = exporter.render_to_svg(&plan_with(Vec::new())).expect("svg");
        assert!(svg.contains("<image href=\""));
        assert!(svg.contains("nord_oko"));

        let mut unknown = plan_with(Vec::new());
        unknown.map = "atlantis".to_string();
        let svg = exporter.render_to_svg(&unknown).expect("svg");
        assert!(!svg.contains("<image"));
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let exporter = PlanExporter::new(ExportConfig {
            width: Some(0),
            ..ExportConfig::default()
        });
        assert!(exporter.render_to_svg(&Plan::new("x")).is_err());
    }
}
