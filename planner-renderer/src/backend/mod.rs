//! Rendering backend implementations.

pub mod canvas2d;
pub mod svg;

use planner_core::Surface;

use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
///
/// A backend is a [`Surface`] the planner's redraw pipeline draws into, plus
/// frame bookkeeping around it.
pub trait RenderBackend: Surface {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// The backend as a drawing surface.
    fn surface(&mut self) -> &mut dyn Surface;

    /// Finish the frame drawn since the last [`Surface::clear`].
    ///
    /// # Errors
    ///
    /// Returns an error if the frame left `save`/`restore` unbalanced.
    fn end_frame(&mut self) -> RenderResult<()>;

    /// Serialized form of the last finished frame.
    ///
    /// # Errors
    ///
    /// Returns an error if no frame has been finished yet or the frame cannot
    /// be serialized.
    fn output(&self) -> RenderResult<String>;

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;
}
