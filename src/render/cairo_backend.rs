use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use cairo::{Context, PdfSurface};
use pango::FontDescription;
use tracing::debug;

use crate::core::Color;
use crate::error::{GvizError, GvizResult};
use crate::render::{
    LineDash, MarkerGeometry, MarkerPrimitive, Primitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive, TextVAlign,
};

/// Pango sizes fonts in points only when the layout resolution matches PDF units.
const PDF_DPI: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub polylines_drawn: usize,
    pub rects_drawn: usize,
    pub markers_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a multi-page document owned by the caller).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> GvizResult<()>;
}

/// Cairo + Pango + PangoCairo renderer writing one PDF page per frame.
///
/// This renderer supports two modes:
/// - PDF output to `path` through `Renderer::render`
/// - in-place rendering on an external Cairo context through
///   `CairoContextRenderer`
#[derive(Debug)]
pub struct CairoPdfRenderer {
    path: PathBuf,
    background: Option<Color>,
    last_stats: CairoRenderStats,
}

impl CairoPdfRenderer {
    pub fn new(path: impl Into<PathBuf>) -> GvizResult<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(GvizError::InvalidData(
                "pdf output path must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            path,
            background: None,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo-pdf+pango+pangocairo"
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Paints the whole page before drawing; `None` keeps it transparent.
    pub fn set_background(&mut self, color: Option<Color>) -> GvizResult<()> {
        if let Some(color) = color {
            color.validate()?;
        }
        self.background = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> GvizResult<()> {
        frame.validate()?;

        if let Some(background) = self.background {
            apply_color(context, background);
            context
                .paint()
                .map_err(|err| map_backend_error("failed to paint background", err))?;
        }

        let mut stats = CairoRenderStats::default();
        for primitive in &frame.primitives {
            match primitive {
                Primitive::Line(line) => {
                    apply_stroke(context, line.color, line.stroke_width, line.dash);
                    context.move_to(line.x1, line.y1);
                    context.line_to(line.x2, line.y2);
                    context
                        .stroke()
                        .map_err(|err| map_backend_error("failed to stroke line", err))?;
                    stats.lines_drawn += 1;
                }
                Primitive::Polyline(polyline) => {
                    apply_stroke(context, polyline.color, polyline.stroke_width, polyline.dash);
                    let mut points = polyline.points.iter();
                    if let Some((x, y)) = points.next() {
                        context.move_to(*x, *y);
                    }
                    for (x, y) in points {
                        context.line_to(*x, *y);
                    }
                    context
                        .stroke()
                        .map_err(|err| map_backend_error("failed to stroke polyline", err))?;
                    stats.polylines_drawn += 1;
                }
                Primitive::Rect(rect) => {
                    context.rectangle(rect.x, rect.y, rect.width, rect.height);
                    apply_color(context, rect.fill_color);
                    if rect.border_width > 0.0 {
                        context
                            .fill_preserve()
                            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                        apply_stroke(
                            context,
                            rect.border_color,
                            rect.border_width,
                            LineDash::Solid,
                        );
                        context.stroke().map_err(|err| {
                            map_backend_error("failed to stroke rectangle border", err)
                        })?;
                    } else {
                        context
                            .fill()
                            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                    }
                    stats.rects_drawn += 1;
                }
                Primitive::Marker(marker) => {
                    draw_marker(context, marker)?;
                    stats.markers_drawn += 1;
                }
                Primitive::Text(text) => {
                    draw_text(context, text)?;
                    stats.texts_drawn += 1;
                }
            }
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoPdfRenderer {
    fn render(&mut self, frame: &RenderFrame) -> GvizResult<()> {
        frame.validate()?;
        let surface = PdfSurface::new(frame.width, frame.height, &self.path)
            .map_err(|err| map_backend_error("failed to create pdf surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)?;
        drop(context);
        surface.flush();
        surface.finish();

        debug!(
            path = %self.path.display(),
            width = frame.width,
            height = frame.height,
            primitives = frame.primitives.len(),
            "wrote pdf"
        );
        Ok(())
    }
}

impl CairoContextRenderer for CairoPdfRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> GvizResult<()> {
        self.render_with_context(context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_stroke(context: &Context, color: Color, width: f64, dash: LineDash) {
    apply_color(context, color);
    context.set_line_width(width);
    context.set_dash(&dash.pattern(width), 0.0);
}

fn draw_marker(context: &Context, marker: &MarkerPrimitive) -> GvizResult<()> {
    let geometry = marker.shape.geometry(marker.x, marker.y, marker.radius);
    match geometry {
        MarkerGeometry::Circle { cx, cy, radius } => {
            context.new_sub_path();
            context.arc(cx, cy, radius, 0.0, TAU);
        }
        MarkerGeometry::Polygon(points) => {
            let mut points = points.into_iter();
            if let Some((x, y)) = points.next() {
                context.move_to(x, y);
            }
            for (x, y) in points {
                context.line_to(x, y);
            }
            context.close_path();
        }
        MarkerGeometry::Strokes(strokes) => {
            for [(x1, y1), (x2, y2)] in strokes {
                context.move_to(x1, y1);
                context.line_to(x2, y2);
            }
            apply_stroke(context, marker.stroke_color, marker.stroke_width, LineDash::Solid);
            return context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke marker", err));
        }
    }

    apply_color(context, marker.fill_color);
    context
        .fill_preserve()
        .map_err(|err| map_backend_error("failed to fill marker", err))?;
    apply_stroke(context, marker.stroke_color, marker.stroke_width, LineDash::Solid);
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke marker", err))
}

fn draw_text(context: &Context, text: &TextPrimitive) -> GvizResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    pangocairo::functions::context_set_resolution(&layout.context(), PDF_DPI);
    layout.context_changed();

    let font_description =
        FontDescription::from_string(&format!("{} {}", text.font.family, text.font.size));
    layout.set_font_description(Some(&font_description));
    layout.set_text(&text.text);

    let (text_width, text_height) = layout.pixel_size();
    let dx = match text.h_align {
        TextHAlign::Left => 0.0,
        TextHAlign::Center => -f64::from(text_width) / 2.0,
        TextHAlign::Right => -f64::from(text_width),
    };
    let dy = match text.v_align {
        TextVAlign::Top => 0.0,
        TextVAlign::Middle => -f64::from(text_height) / 2.0,
        TextVAlign::Bottom => -f64::from(text_height),
    };

    context
        .save()
        .map_err(|err| map_backend_error("failed to save cairo state", err))?;
    context.translate(text.x, text.y);
    context.rotate(-text.rotation_deg.to_radians());
    apply_color(context, text.color);
    context.move_to(dx, dy);
    pangocairo::functions::show_layout(context, &layout);
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore cairo state", err))
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> GvizError {
    GvizError::Backend(format!("{prefix}: {err}"))
}
