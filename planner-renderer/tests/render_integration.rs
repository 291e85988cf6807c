//! Integration tests for rendering planner frames (planner-renderer).
//!
//! Drives a planner through real input, renders through both backends and
//! checks what reached the surface.

use planner_core::{decode_plan, Planner, PointerEvent, Tool};
use planner_renderer::{
    BackendType, Canvas2DBackend, DrawCommand, ExportConfig, PlanExporter, RenderBackend,
    Renderer, RendererConfig,
};

/// Press, drag and release with the current tool.
fn drag(planner: &mut Planner, from: (f64, f64), to: (f64, f64)) {
    planner.handle_pointer(PointerEvent::down(from.0, from.1));
    planner.handle_pointer(PointerEvent::moved(to.0, to.1));
    planner.handle_pointer(PointerEvent::up(to.0, to.1));
}

/// Renderer for the given backend with default colors.
fn renderer(backend: BackendType) -> Renderer {
    Renderer::new(RendererConfig {
        preferred_backend: backend,
        ..RendererConfig::default()
    })
    .expect("renderer")
}

/// Parse the Canvas2D renderer output back into commands.
fn commands(renderer: &Renderer) -> Vec<DrawCommand> {
    serde_json::from_str(&renderer.output().expect("output")).expect("display list")
}

// ==========================================================================
// Canvas2D display list
// ==========================================================================

#[test]
fn test_preview_is_drawn_while_dragging() {
    let mut planner = Planner::default();
    planner.set_tool(Tool::Rectangle);
    planner.handle_pointer(PointerEvent::down(10.0, 10.0));
    planner.handle_pointer(PointerEvent::moved(60.0, 40.0));

    let mut renderer = renderer(BackendType::Canvas2D);
    renderer.render(&planner.frame()).expect("frame");
    let rects = commands(&renderer)
        .into_iter()
        .filter(|c| matches!(c, DrawCommand::StrokeRect { .. }))
        .count();
    assert_eq!(rects, 1);
    assert!(planner.current_layer().is_empty());
}

#[test]
fn test_viewport_scaling_is_applied_first() {
    let mut planner = Planner::default();
    planner.set_tool(Tool::Line);
    drag(&mut planner, (0.0, 0.0), (100.0, 100.0));
    planner.set_viewport(400.0, 400.0);

    let mut renderer = renderer(BackendType::Canvas2D);
    renderer.render(&planner.frame()).expect("frame");
    let list = commands(&renderer);
    assert_eq!(list[0], DrawCommand::Clear { width: 400.0, height: 400.0 });
    assert_eq!(list[2], DrawCommand::Scale { sx: 0.5, sy: 0.5 });
}

#[test]
fn test_selection_adds_overlay_after_items() {
    let mut planner = Planner::default();
    planner.set_tool(Tool::Circle);
    drag(&mut planner, (200.0, 200.0), (240.0, 200.0));
    planner.set_tool(Tool::Select);
    drag(&mut planner, (200.0, 200.0), (200.0, 200.0));
    assert_eq!(planner.selected_index(), Some(0));

    let mut backend = Canvas2DBackend::new();
    planner.redraw(&mut backend);
    backend.end_frame().expect("balanced frame");
    let list = backend.last_frame().expect("frame");

    let circle = list
        .iter()
        .position(|c| matches!(c, DrawCommand::StrokeCircle { radius, .. } if (*radius - 40.0).abs() < 1e-9))
        .expect("circle drawn");
    let handles = list
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
        .count();
    assert_eq!(handles, 8);
    let first_handle = list
        .iter()
        .position(|c| matches!(c, DrawCommand::FillRect { .. }))
        .expect("handle");
    assert!(first_handle > circle);
}

// ==========================================================================
// SVG
// ==========================================================================

#[test]
fn test_rotated_item_carries_matrix() {
    let mut planner = Planner::default();
    planner.set_tool(Tool::Rectangle);
    drag(&mut planner, (100.0, 100.0), (200.0, 150.0));
    planner.set_tool(Tool::Select);
    drag(&mut planner, (150.0, 125.0), (150.0, 125.0));
    // Rotation knob sits 30 above the top edge: (150, 70).
    drag(&mut planner, (150.0, 70.0), (230.0, 125.0));
    assert!(planner.current_layer().items[0].angle.abs() > 0.1);
    planner.clear_selection();

    let mut renderer = renderer(BackendType::Svg);
    renderer.render(&planner.frame()).expect("frame");
    let svg = renderer.output().expect("svg");
    assert!(svg.contains("<rect x=\"100\" y=\"100\" width=\"100\" height=\"50\""));
    assert!(svg.contains("matrix("));
}

#[test]
fn test_share_code_exports_to_svg() {
    let mut planner = Planner::default();
    planner.select_map("scarred_city").expect("map");
    planner.set_tool(Tool::Arrow);
    drag(&mut planner, (10.0, 10.0), (90.0, 10.0));
    planner.set_tool(Tool::Text);
    drag(&mut planner, (20.0, 50.0), (20.0, 50.0));
    planner.resolve_text("Rush <B>").expect("text");
    let code = planner.save().expect("save");

    let plan = decode_plan(&code).expect("decode");
    let svg = PlanExporter::new(ExportConfig {
        include_map: true,
        ..ExportConfig::default()
    })
    .render_to_svg(&plan)
    .expect("export");

    assert!(svg.contains("scarred_city_radar"));
    assert!(svg.contains("Rush &lt;B&gt;"));
    assert!(svg.contains("font: 15px Arial"));
    // Shaft plus head.
    assert_eq!(svg.matches("<polyline").count(), 2);
}
