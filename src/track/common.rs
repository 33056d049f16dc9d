use crate::core::{
    Affine, Extent, FrameId, FrameTree, Span, format_number, nice_ticks, tick_target_count,
};
use crate::core::ticks::AXIS_Y_TARGET_SPACING_PT;
use crate::error::{GvizError, GvizResult};
use crate::render::{LinePrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign};

pub(crate) const LABEL_GAP_PT: f64 = 1.5;
const TITLE_INSET_PT: f64 = 2.0;

/// Everything a track needs to draw itself into the figure.
pub(crate) struct DrawContext<'a> {
    pub tree: &'a mut FrameTree,
    pub out: &'a mut RenderFrame,
    /// The track's own frame (track params live in its environment).
    pub track: FrameId,
    /// Panel rectangle in track coordinates (inside the margins).
    pub panel_placement: Extent,
    /// Genomic x range shared by every track.
    pub x_domain: Span,
}

impl DrawContext<'_> {
    pub(crate) fn panel_height(&self) -> f64 {
        self.panel_placement.y.length().abs()
    }

    /// Panel placement with y flipped so that `coords.y.start` lands at the bottom.
    pub(crate) fn panel_placement_y_up(&self) -> Extent {
        Extent::new(
            self.panel_placement.x,
            Span::new(self.panel_placement.y.max(), self.panel_placement.y.min()),
        )
    }
}

/// Outer box of one track: the panel plus its four margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBox {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
}

impl TrackBox {
    pub(crate) fn measure(tree: &FrameTree, track: FrameId) -> GvizResult<Self> {
        let measured = Self {
            width: tree.length(track, "width")?,
            height: tree.length(track, "height")?,
            margin_top: tree.length(track, "margin_top")?,
            margin_bottom: tree.length(track, "margin_bottom")?,
            margin_left: tree.length(track, "margin_left")?,
            margin_right: tree.length(track, "margin_right")?,
        };
        measured.validate()?;
        Ok(measured)
    }

    fn validate(self) -> GvizResult<()> {
        for (key, value) in [
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
        ] {
            if value < 0.0 {
                return Err(GvizError::invalid_parameter(key, "margin must be >= 0"));
            }
        }
        if self.height <= 0.0 {
            return Err(GvizError::invalid_parameter("height", "height must be > 0"));
        }
        if self.width - self.margin_left - self.margin_right <= 0.0 {
            return Err(GvizError::invalid_parameter(
                "width",
                "width must exceed margin_left + margin_right",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn outer_height(self) -> f64 {
        self.margin_top + self.height + self.margin_bottom
    }

    /// Panel rectangle in track coordinates (y grows downward).
    #[must_use]
    pub fn panel_placement(self) -> Extent {
        Extent::from_bounds(
            self.margin_left,
            self.width - self.margin_right,
            self.margin_top,
            self.margin_top + self.height,
        )
    }
}

/// Draws the optional `title` rotated in the track's left margin.
pub(crate) fn draw_title(ctx: &mut DrawContext<'_>) -> GvizResult<()> {
    let Some(title) = ctx.tree.opt_text(ctx.track, "title")? else {
        return Ok(());
    };
    if title.is_empty() {
        return Ok(());
    }
    let title = title.to_owned();
    let font = ctx.tree.font(ctx.track, "title_font")?;
    let color = ctx.tree.color(ctx.track, "title_color")?;

    let track_to_device = ctx.tree.device_transform(ctx.track)?;
    let (x, y) = track_to_device.apply(
        TITLE_INSET_PT,
        (ctx.panel_placement.y.start + ctx.panel_placement.y.end) / 2.0,
    );
    ctx.out.push_text(
        TextPrimitive::new(title, x, y, font, color, TextHAlign::Center, TextVAlign::Top)
            .rotated(90.0),
    );
    Ok(())
}

/// Vertical value axis along the left edge of a y-up panel.
pub(crate) fn draw_y_axis(
    ctx: &mut DrawContext<'_>,
    panel: FrameId,
    y_domain: Span,
) -> GvizResult<()> {
    let line_width = ctx.tree.length(panel, "axis_line_width")?;
    let color = ctx.tree.color(panel, "axis_color")?;
    let font = ctx.tree.font(panel, "axis_font")?;
    let tick_length = ctx.tree.length(panel, "axis_tick_length")?;

    let transform: Affine = ctx.tree.device_transform(panel)?;
    let x = transform.apply_x(ctx.x_domain.start);
    let y_bottom = transform.apply_y(y_domain.start);
    let y_top = transform.apply_y(y_domain.end);
    ctx.out
        .push_line(LinePrimitive::new(x, y_bottom, x, y_top, line_width, color));

    let count = tick_target_count((y_bottom - y_top).abs(), AXIS_Y_TARGET_SPACING_PT, 2, 8);
    let ticks = nice_ticks(y_domain.start, y_domain.end, count);
    for value in &ticks.values {
        let y = transform.apply_y(*value);
        ctx.out
            .push_line(LinePrimitive::new(x - tick_length, y, x, y, line_width, color));
        ctx.out.push_text(TextPrimitive::new(
            format_number(*value, ticks.step),
            x - tick_length - LABEL_GAP_PT,
            y,
            font.clone(),
            color,
            TextHAlign::Right,
            TextVAlign::Middle,
        ));
    }
    Ok(())
}
