use tracing::trace;

use crate::core::ticks::AXIS_X_TARGET_SPACING_PT;
use crate::core::{
    Extent, ParamValue, Params, Span, format_genomic_position, nice_ticks, tick_target_count,
};
use crate::error::GvizResult;
use crate::render::{LinePrimitive, TextHAlign, TextPrimitive, TextVAlign};

use super::common::{DrawContext, LABEL_GAP_PT, draw_title};

/// Horizontal genomic coordinate axis.
///
/// Parameters: `axis_line_width`, `axis_color`, `axis_font`,
/// `axis_tick_length`, `width`, `height`, `margin_top`, `margin_bottom`,
/// `margin_left`, `margin_right`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenomicAxis {
    params: Params,
}

impl GenomicAxis {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn draw(&self, ctx: &mut DrawContext<'_>) -> GvizResult<()> {
        let panel_height = ctx.panel_height();
        let panel = ctx.tree.add_child(
            ctx.track,
            "panel",
            Extent::new(ctx.x_domain, Span::new(0.0, panel_height)),
            ctx.panel_placement,
            Params::new(),
        )?;

        let line_width = ctx.tree.length(panel, "axis_line_width")?;
        let color = ctx.tree.color(panel, "axis_color")?;
        let font = ctx.tree.font(panel, "axis_font")?;
        let tick_length = ctx.tree.length(panel, "axis_tick_length")?;
        let transform = ctx.tree.device_transform(panel)?;

        let (x0, y) = transform.apply(ctx.x_domain.start, 0.0);
        let x1 = transform.apply_x(ctx.x_domain.end);
        ctx.out
            .push_line(LinePrimitive::new(x0, y, x1, y, line_width, color));

        let count = tick_target_count((x1 - x0).abs(), AXIS_X_TARGET_SPACING_PT, 2, 12);
        let ticks = nice_ticks(ctx.x_domain.start, ctx.x_domain.end, count);
        for value in &ticks.values {
            let x = transform.apply_x(*value);
            ctx.out.push_line(LinePrimitive::new(
                x,
                y,
                x,
                y + tick_length,
                line_width,
                color,
            ));
            ctx.out.push_text(TextPrimitive::new(
                format_genomic_position(*value, ticks.step),
                x,
                y + tick_length + LABEL_GAP_PT,
                font.clone(),
                color,
                TextHAlign::Center,
                TextVAlign::Top,
            ));
        }
        trace!(ticks = ticks.values.len(), step = ticks.step, "drew genomic axis");

        draw_title(ctx)
    }
}
