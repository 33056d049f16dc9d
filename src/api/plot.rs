use tracing::{debug, trace};

use crate::core::{Extent, FrameId, FrameTree, ParamValue, Params, Span};
use crate::error::{GvizError, GvizResult};
use crate::render::{RenderFrame, Renderer};
use crate::track::common::DrawContext;
use crate::track::{Track, TrackBox};

use super::default_params;

const PROVISIONAL: Extent = Extent::from_bounds(0.0, 1.0, 0.0, 1.0);

/// Figure of stacked tracks sharing the genomic range `xmin..xmax`.
///
/// Figure-level parameters sit between the built-in defaults and the tracks,
/// so anything set here applies to every track that does not override it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPlot {
    x_domain: Span,
    params: Params,
}

/// Frame of one track inside the figure, with its measured box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSlot {
    pub frame: FrameId,
    pub bounds: TrackBox,
    /// Device y of the top edge of the track's outer box.
    pub top: f64,
}

/// Frame tree of a laid out figure.
///
/// After [`TrackPlot::draw`] the tree also holds the panel and layer frames
/// the tracks created while drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    tree: FrameTree,
    figure: FrameId,
    slots: Vec<TrackSlot>,
    width: f64,
    height: f64,
}

impl FigureLayout {
    #[must_use]
    pub fn tree(&self) -> &FrameTree {
        &self.tree
    }

    #[must_use]
    pub fn figure(&self) -> FrameId {
        self.figure
    }

    #[must_use]
    pub fn slots(&self) -> &[TrackSlot] {
        &self.slots
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// A drawn figure: its frame tree and the primitives to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub layout: FigureLayout,
    pub frame: RenderFrame,
}

impl TrackPlot {
    pub fn new(xmin: f64, xmax: f64) -> GvizResult<Self> {
        if !xmin.is_finite() || !xmax.is_finite() || xmin >= xmax {
            return Err(GvizError::InvalidRange {
                start: xmin,
                end: xmax,
            });
        }
        Ok(Self {
            x_domain: Span::new(xmin, xmax),
            params: Params::new(),
        })
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    #[must_use]
    pub fn x_domain(&self) -> Span {
        self.x_domain
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Builds the frame tree: `defaults` root, `figure`, then one frame per
    /// track stacked top to bottom with `track_spacing` between tracks.
    pub fn layout(&self, tracks: &[Track]) -> GvizResult<FigureLayout> {
        if tracks.is_empty() {
            return Err(GvizError::EmptyTrackList);
        }

        let mut tree = FrameTree::new("defaults", PROVISIONAL, default_params())?;
        let root = tree.root();
        let figure = tree.add_child(root, "figure", PROVISIONAL, PROVISIONAL, self.params.clone())?;

        // Track frames must exist before measuring: their sizes may come from
        // the figure or the defaults.
        let mut measured = Vec::with_capacity(tracks.len());
        for (index, track) in tracks.iter().enumerate() {
            let frame = tree.add_child(
                figure,
                format!("track[{index}]:{}", track.kind()),
                PROVISIONAL,
                PROVISIONAL,
                track.params().clone(),
            )?;
            measured.push((frame, TrackBox::measure(&tree, frame)?));
        }

        let spacing = tree.length(figure, "track_spacing")?;
        if spacing < 0.0 {
            return Err(GvizError::invalid_parameter(
                "track_spacing",
                "track_spacing must be >= 0",
            ));
        }

        let width = measured
            .iter()
            .map(|(_, bounds)| bounds.width)
            .fold(0.0_f64, f64::max);
        let mut slots = Vec::with_capacity(measured.len());
        let mut top = 0.0;
        for (frame, bounds) in measured {
            let outer = Extent::from_bounds(0.0, bounds.width, 0.0, bounds.outer_height());
            let placement =
                Extent::from_bounds(0.0, bounds.width, top, top + bounds.outer_height());
            slots.push(TrackSlot { frame, bounds, top });
            top += bounds.outer_height() + spacing;
            tree.place(frame, outer, placement)?;
        }
        let height = top - spacing;

        let page = Extent::from_bounds(0.0, width, 0.0, height);
        tree.place(root, page, page)?;
        tree.place(figure, page, page)?;

        debug!(
            tracks = slots.len(),
            width,
            height,
            frames = tree.len(),
            "laid out figure"
        );
        Ok(FigureLayout {
            tree,
            figure,
            slots,
            width,
            height,
        })
    }

    /// Lays out and draws every track.
    pub fn draw(&self, tracks: &[Track]) -> GvizResult<Figure> {
        let mut layout = self.layout(tracks)?;
        let mut frame = RenderFrame::new(layout.width, layout.height);

        for (track, slot) in tracks.iter().zip(&layout.slots) {
            let before = frame.primitives.len();
            let mut ctx = DrawContext {
                tree: &mut layout.tree,
                out: &mut frame,
                track: slot.frame,
                panel_placement: slot.bounds.panel_placement(),
                x_domain: self.x_domain,
            };
            track.draw(&mut ctx)?;
            trace!(
                kind = track.kind(),
                top = slot.top,
                primitives = frame.primitives.len() - before,
                "drew track"
            );
        }

        debug!(
            tracks = tracks.len(),
            frames = layout.tree.len(),
            primitives = frame.primitives.len(),
            xmin = self.x_domain.start,
            xmax = self.x_domain.end,
            "built figure"
        );
        Ok(Figure { layout, frame })
    }

    pub fn build_render_frame(&self, tracks: &[Track]) -> GvizResult<RenderFrame> {
        Ok(self.draw(tracks)?.frame)
    }

    pub fn render<R: Renderer>(&self, tracks: &[Track], renderer: &mut R) -> GvizResult<()> {
        let frame = self.build_render_frame(tracks)?;
        renderer.render(&frame)
    }
}

/// Draws `tracks` over `xmin..xmax` and writes the figure as a PDF to `path`.
#[cfg(feature = "cairo-backend")]
pub fn plot_tracks(
    tracks: &[Track],
    path: impl AsRef<std::path::Path>,
    xmin: f64,
    xmax: f64,
    params: Params,
) -> GvizResult<()> {
    let plot = TrackPlot::new(xmin, xmax)?.with_params(params);
    let mut renderer = crate::render::CairoPdfRenderer::new(path.as_ref())?;
    plot.render(tracks, &mut renderer)
}
