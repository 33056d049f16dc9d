use std::str::FromStr;

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use tracing::trace;

use crate::core::{Affine, Extent, FrameId, FrameTree, ParamValue, Params, Span, fit_domain};
use crate::error::{GvizError, GvizResult};
use crate::render::{
    LineDash, LinePrimitive, MarkerPrimitive, MarkerShape, PolylinePrimitive, RectPrimitive,
    RenderFrame,
};

use super::common::{DrawContext, draw_title, draw_y_axis};

const AUTOSCALE_PADDING_RATIO: f64 = 0.05;
const MARKER_STROKE_RATIO: f64 = 0.3;
const MIN_MARKER_STROKE_PT: f64 = 0.1;
const UNIT: Extent = Extent::from_bounds(0.0, 1.0, 0.0, 1.0);

/// How a layer turns its `(x, y)` values into marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Geom {
    #[default]
    Point,
    Line,
    Col,
}

impl FromStr for Geom {
    type Err = GvizError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "point" => Ok(Self::Point),
            "line" => Ok(Self::Line),
            "col" => Ok(Self::Col),
            other => Err(GvizError::InvalidData(format!("unknown geom `{other}`"))),
        }
    }
}

/// Track of x/y data drawn as one or more layers.
///
/// With a single layer the layer parameters (`x`, `y`, `color`, `fill`,
/// `size`, `linetype`, `alpha`, `shape`, `geom`) are given on the track
/// itself. With several layers each gets its own parameter map; every layer
/// frame is a child of the track's panel, so anything a layer leaves out
/// (typically the shared `x`) is inherited from the track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTrack {
    params: Params,
    layers: Vec<Params>,
}

impl DataTrack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_x(self, x: impl Into<Vec<f64>>) -> Self {
        self.with("x", x.into())
    }

    #[must_use]
    pub fn with_y(self, y: impl Into<Vec<f64>>) -> Self {
        self.with("y", y.into())
    }

    #[must_use]
    pub fn with_layer(mut self, layer: Params) -> Self {
        self.layers.push(layer);
        self
    }

    #[must_use]
    pub fn with_layers(mut self, layers: Vec<Params>) -> Self {
        self.layers.extend(layers);
        self
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub fn layers(&self) -> &[Params] {
        &self.layers
    }

    pub(crate) fn draw(&self, ctx: &mut DrawContext<'_>) -> GvizResult<()> {
        // Provisional coordinates; the y domain depends on layer data that is
        // only reachable once layer frames inherit from the panel.
        let panel = ctx.tree.add_child(
            ctx.track,
            "panel",
            Extent::new(ctx.x_domain, UNIT.y),
            ctx.panel_placement_y_up(),
            Params::new(),
        )?;

        let envs = if self.layers.is_empty() {
            vec![Params::new()]
        } else {
            self.layers.clone()
        };
        let mut layers = Vec::with_capacity(envs.len());
        for (index, env) in envs.into_iter().enumerate() {
            layers.push(ctx.tree.add_child(panel, format!("layer[{index}]"), UNIT, UNIT, env)?);
        }

        let y_domain = resolve_y_domain(ctx.tree, panel, &layers, ctx.x_domain)?;
        ctx.tree.place(
            panel,
            Extent::new(ctx.x_domain, y_domain),
            ctx.panel_placement_y_up(),
        )?;
        let transform = ctx.tree.device_transform(panel)?;
        let bounds = ctx.tree.device_extent(panel)?;

        draw_base_line(ctx.tree, ctx.out, panel, transform, ctx.x_domain, y_domain)?;
        for (index, layer) in layers.iter().enumerate() {
            let style = LayerStyle::resolve(ctx.tree, *layer)?;
            let (xs, ys) = layer_values(ctx.tree, *layer, index)?;
            let before = ctx.out.primitives.len();
            match style.geom {
                Geom::Point => {
                    draw_points(ctx.out, &style, transform, xs, ys, ctx.x_domain, y_domain);
                }
                Geom::Line => draw_line(ctx.out, &style, transform, xs, ys, bounds),
                Geom::Col => {
                    let base = baseline_value(ctx.tree, panel, y_domain)?;
                    draw_cols(ctx.out, &style, transform, xs, ys, ctx.x_domain, y_domain, base);
                }
            }
            trace!(
                layer = index,
                geom = ?style.geom,
                points = xs.len(),
                primitives = ctx.out.primitives.len() - before,
                "drew data layer"
            );
        }

        draw_y_axis(ctx, panel, y_domain)?;
        draw_title(ctx)
    }
}

#[derive(Debug, Clone, Copy)]
struct LayerStyle {
    geom: Geom,
    color: crate::core::Color,
    fill: crate::core::Color,
    size: f64,
    shape: MarkerShape,
    dash: LineDash,
}

impl LayerStyle {
    fn resolve(tree: &FrameTree, layer: FrameId) -> GvizResult<Self> {
        let alpha = tree.number(layer, "alpha")?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(GvizError::invalid_parameter("alpha", "alpha must be in [0, 1]"));
        }
        let size = tree.length(layer, "size")?;
        if size <= 0.0 {
            return Err(GvizError::invalid_parameter("size", "size must be > 0"));
        }

        Ok(Self {
            geom: parse_param(tree, layer, "geom")?,
            color: tree.color(layer, "color")?.with_alpha_factor(alpha),
            fill: tree.color(layer, "fill")?.with_alpha_factor(alpha),
            size,
            shape: parse_param(tree, layer, "shape")?,
            dash: parse_param(tree, layer, "linetype")?,
        })
    }
}

fn parse_param<T>(tree: &FrameTree, frame: FrameId, key: &str) -> GvizResult<T>
where
    T: FromStr<Err = GvizError>,
{
    tree.text(frame, key)?
        .parse()
        .map_err(|err: GvizError| GvizError::invalid_parameter(key, err.to_string()))
}

fn layer_values(tree: &FrameTree, layer: FrameId, index: usize) -> GvizResult<(&[f64], &[f64])> {
    let xs = tree.numbers(layer, "x")?;
    let ys = tree.numbers(layer, "y")?;
    if xs.len() != ys.len() {
        return Err(GvizError::InvalidData(format!(
            "layer {index}: `x` has {} values but `y` has {}",
            xs.len(),
            ys.len()
        )));
    }
    Ok((xs, ys))
}

/// `ymin`/`ymax` when set; otherwise fitted to the visible data of all layers.
/// A lone fixed bound falls back to a unit span when no data lie beyond it.
fn resolve_y_domain(
    tree: &FrameTree,
    panel: FrameId,
    layers: &[FrameId],
    x_domain: Span,
) -> GvizResult<Span> {
    let ymin = tree.opt_number(panel, "ymin")?;
    let ymax = tree.opt_number(panel, "ymax")?;

    let fitted = if let (Some(start), Some(end)) = (ymin, ymax) {
        Span::new(start, end)
    } else {
        let mut visible = Vec::new();
        for (index, layer) in layers.iter().enumerate() {
            let (xs, ys) = layer_values(tree, *layer, index)?;
            visible.extend(
                xs.iter()
                    .zip(ys)
                    .filter(|(x, _)| x_domain.contains(**x))
                    .map(|(_, y)| *y),
            );
            if parse_param::<Geom>(tree, *layer, "geom")? == Geom::Col {
                visible.push(tree.opt_number(panel, "base_line_y")?.unwrap_or(0.0));
            }
        }
        // With one bound fixed, the free bound only sees data on its side.
        visible.retain(|y| ymin.is_none_or(|min| *y > min) && ymax.is_none_or(|max| *y < max));
        fit_domain(visible, AUTOSCALE_PADDING_RATIO).unwrap_or(match (ymin, ymax) {
            (Some(min), None) => Span::new(min, min + 1.0),
            (None, Some(max)) => Span::new(max - 1.0, max),
            _ => Span::new(0.0, 1.0),
        })
    };

    let domain = Span::new(ymin.unwrap_or(fitted.start), ymax.unwrap_or(fitted.end));
    if domain.start >= domain.end {
        return Err(GvizError::InvalidRange {
            start: domain.start,
            end: domain.end,
        });
    }
    domain.validate()?;
    Ok(domain)
}

/// Bars grow from `base_line_y` when set, else from zero, clamped into the panel.
fn baseline_value(tree: &FrameTree, panel: FrameId, y_domain: Span) -> GvizResult<f64> {
    Ok(y_domain.clamp(tree.opt_number(panel, "base_line_y")?.unwrap_or(0.0)))
}

fn draw_base_line(
    tree: &FrameTree,
    out: &mut RenderFrame,
    panel: FrameId,
    transform: Affine,
    x_domain: Span,
    y_domain: Span,
) -> GvizResult<()> {
    let Some(value) = tree.opt_number(panel, "base_line_y")? else {
        return Ok(());
    };
    if !y_domain.contains(value) {
        return Ok(());
    }

    let color = tree.color(panel, "base_line_color")?;
    let width = tree.length(panel, "base_line_width")?;
    let (x0, y) = transform.apply(x_domain.start, value);
    let x1 = transform.apply_x(x_domain.end);
    out.push_line(LinePrimitive::new(x0, y, x1, y, width, color));
    Ok(())
}

fn draw_points(
    out: &mut RenderFrame,
    style: &LayerStyle,
    transform: Affine,
    xs: &[f64],
    ys: &[f64],
    x_domain: Span,
    y_domain: Span,
) {
    let fill = if style.shape == MarkerShape::Dot {
        style.color
    } else {
        style.fill
    };
    for (x, y) in xs.iter().zip(ys) {
        if !x.is_finite() || !y.is_finite() || !x_domain.contains(*x) || !y_domain.contains(*y) {
            continue;
        }
        let (cx, cy) = transform.apply(*x, *y);
        out.push_marker(MarkerPrimitive {
            shape: style.shape,
            x: cx,
            y: cy,
            radius: style.size,
            stroke_color: style.color,
            fill_color: fill,
            stroke_width: (style.size * MARKER_STROKE_RATIO).max(MIN_MARKER_STROKE_PT),
        });
    }
}

fn draw_line(
    out: &mut RenderFrame,
    style: &LayerStyle,
    transform: Affine,
    xs: &[f64],
    ys: &[f64],
    bounds: Extent,
) {
    let points = project_points(transform, xs, ys);
    for run in clip_polyline(&points, bounds) {
        out.push_polyline(PolylinePrimitive {
            points: run,
            stroke_width: style.size,
            color: style.color,
            dash: style.dash,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_cols(
    out: &mut RenderFrame,
    style: &LayerStyle,
    transform: Affine,
    xs: &[f64],
    ys: &[f64],
    x_domain: Span,
    y_domain: Span,
    base: f64,
) {
    let half = style.size / 2.0;
    let base_y = transform.apply_y(base);
    let (edge_a, edge_b) = (
        transform.apply_x(x_domain.start),
        transform.apply_x(x_domain.end),
    );
    let panel_x = Span::new(edge_a.min(edge_b), edge_a.max(edge_b));
    for (x, y) in xs.iter().zip(ys) {
        if !x.is_finite() || !y.is_finite() || !x_domain.contains(*x) {
            continue;
        }
        let (cx, top) = transform.apply(*x, y_domain.clamp(*y));
        let (left, right) = (panel_x.clamp(cx - half), panel_x.clamp(cx + half));
        if right <= left {
            continue;
        }
        out.push_rect(RectPrimitive::from_corners(left, base_y, right, top, style.color));
    }
}

/// Maps data points to device space; non-finite inputs stay non-finite.
pub(crate) fn project_points(transform: Affine, xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    // Large layers project in parallel; the output order is unchanged.
    #[cfg(feature = "parallel-projection")]
    {
        const PARALLEL_MIN_POINTS: usize = 4096;
        if xs.len() >= PARALLEL_MIN_POINTS {
            return xs
                .par_iter()
                .zip(ys.par_iter())
                .map(|(x, y)| transform.apply(*x, *y))
                .collect();
        }
    }

    xs.iter()
        .zip(ys)
        .map(|(x, y)| transform.apply(*x, *y))
        .collect()
}

/// Splits a device-space polyline into runs that lie inside `bounds`.
///
/// Non-finite points break the line; segments crossing the border are cut
/// at the border.
pub(crate) fn clip_polyline(points: &[(f64, f64)], bounds: Extent) -> Vec<Vec<(f64, f64)>> {
    fn flush(runs: &mut Vec<Vec<(f64, f64)>>, current: &mut Vec<(f64, f64)>) {
        if current.len() >= 2 {
            runs.push(std::mem::take(current));
        } else {
            current.clear();
        }
    }

    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let finite =
            from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite();
        let clipped = if finite {
            clip_segment(from, to, bounds)
        } else {
            None
        };

        let Some((start, end)) = clipped else {
            flush(&mut runs, &mut current);
            continue;
        };
        if current.last() != Some(&start) {
            flush(&mut runs, &mut current);
            current.push(start);
        }
        current.push(end);
        if end != to {
            flush(&mut runs, &mut current);
        }
    }
    flush(&mut runs, &mut current);
    runs
}

/// Liang–Barsky clipping of one segment against an axis-aligned rectangle.
/// Endpoints inside the rectangle are returned unchanged.
pub(crate) fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    bounds: Extent,
) -> Option<((f64, f64), (f64, f64))> {
    let (x_min, x_max) = (bounds.x.min(), bounds.x.max());
    let (y_min, y_max) = (bounds.y.min(), bounds.y.max());
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;

    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [
        (-dx, from.0 - x_min),
        (dx, x_max - from.0),
        (-dy, from.1 - y_min),
        (dy, y_max - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| (from.0 + t * dx, from.1 + t * dy);
    let start = if t0 == 0.0 { from } else { at(t0) };
    let end = if t1 == 1.0 { to } else { at(t1) };
    Some((start, end))
}
