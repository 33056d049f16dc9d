mod frame;
mod marker;
mod null_renderer;
mod primitives;
mod text_metrics;

pub use frame::RenderFrame;
pub use marker::{MarkerGeometry, MarkerShape};
pub use null_renderer::NullRenderer;
pub use primitives::{
    LineDash, LinePrimitive, MarkerPrimitive, PolylinePrimitive, Primitive, RectPrimitive,
    TextHAlign, TextPrimitive, TextVAlign,
};
pub use text_metrics::{estimate_text_height, estimate_text_width};

use crate::error::GvizResult;

/// Output backend for a drawn figure.
///
/// Tracks resolve every parameter and coordinate before this point; a
/// backend only sees device-space primitives in drawing order.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> GvizResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoPdfRenderer, CairoRenderStats};
