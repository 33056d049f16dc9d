use crate::error::GvizResult;
use crate::render::{Primitive, RenderFrame, Renderer};

/// No-op renderer used by tests and headless layout checks.
///
/// It still validates frame content so tests catch invalid geometry before it
/// reaches a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_line_count: usize,
    pub last_polyline_count: usize,
    pub last_rect_count: usize,
    pub last_marker_count: usize,
    pub last_text_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> GvizResult<()> {
        frame.validate()?;
        let mut counts = [0usize; 5];
        for primitive in &frame.primitives {
            let slot = match primitive {
                Primitive::Line(_) => 0,
                Primitive::Polyline(_) => 1,
                Primitive::Rect(_) => 2,
                Primitive::Marker(_) => 3,
                Primitive::Text(_) => 4,
            };
            counts[slot] += 1;
        }
        let [lines, polylines, rects, markers, texts] = counts;
        self.last_line_count = lines;
        self.last_polyline_count = polylines;
        self.last_rect_count = rects;
        self.last_marker_count = markers;
        self.last_text_count = texts;
        self.frames_rendered += 1;
        Ok(())
    }
}
