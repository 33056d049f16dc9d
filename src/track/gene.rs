use std::path::Path;

use tracing::{trace, warn};

use crate::annotation::{Gene, RegionQuery, Strand, load_genes};
use crate::core::{Affine, Color, Extent, Font, FrameId, FrameTree, ParamValue, Params, Span};
use crate::error::GvizResult;
use crate::render::{
    LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign,
    estimate_text_height, estimate_text_width,
};

use super::common::{DrawContext, LABEL_GAP_PT, draw_title};

const ROW_PADDING_PT: f64 = 2.0;
const INTRON_LINE_WIDTH_PT: f64 = 0.5;
const CHEVRON_SPACING_PT: f64 = 8.0;
const CHEVRON_HALF_PT: f64 = 1.5;

/// Gene annotation track for one genomic region.
///
/// Genes come either from the GTF file named by the `gtf` parameter or from
/// [`GeneTrack::with_genes`]. They are packed into rows so that neither
/// bodies nor labels overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneTrack {
    chrom: String,
    start: u64,
    end: u64,
    params: Params,
    genes: Option<Vec<Gene>>,
}

impl GeneTrack {
    #[must_use]
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            params: Params::new(),
            genes: None,
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    #[must_use]
    pub fn with_gtf(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_string_lossy().into_owned();
        self.with("gtf", path)
    }

    /// Uses already loaded genes instead of reading `gtf`.
    #[must_use]
    pub fn with_genes(mut self, genes: Vec<Gene>) -> Self {
        self.genes = Some(genes);
        self
    }

    #[must_use]
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    #[must_use]
    pub fn region(&self) -> (u64, u64) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Preloaded genes overlapping `query`, otherwise the ones read from `gtf`.
    fn genes(
        &self,
        tree: &FrameTree,
        panel: FrameId,
        query: &RegionQuery,
    ) -> GvizResult<Vec<Gene>> {
        let mut genes = match &self.genes {
            Some(genes) => genes
                .iter()
                .filter(|gene| {
                    gene.seqname == query.seqname
                        && gene.start <= query.end
                        && gene.end >= query.start
                })
                .cloned()
                .collect(),
            None => load_genes(Path::new(tree.text(panel, "gtf")?), query)?,
        };
        genes.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
        Ok(genes)
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

        let query = RegionQuery::new(self.chrom.clone(), self.start, self.end)?;
        let genes = self.genes(ctx.tree, panel, &query)?;

        let style = FeatureStyle {
            height: ctx.tree.length(panel, "feature_height")?,
            fill: ctx.tree.color(panel, "feature_fill")?,
            label_font: ctx.tree.font(panel, "feature_label_font")?,
            label_color: ctx.tree.color(panel, "feature_label_color")?,
            label_spacing: ctx.tree.length(panel, "feature_label_spacing")?,
        };
        let transform = ctx.tree.device_transform(panel)?;
        let layout = layout_genes(&genes, &style, transform, ctx.x_domain);

        let row_height = style.row_height();
        let fitting_rows = (panel_height / row_height).floor() as usize;
        let mut dropped = 0_usize;
        for placed in &layout {
            if placed.row >= fitting_rows {
                dropped += 1;
                continue;
            }
            draw_gene(
                ctx.out,
                &style,
                transform,
                placed,
                ctx.x_domain,
                placed.row as f64 * row_height,
            );
        }
        if dropped > 0 {
            warn!(
                chrom = %self.chrom,
                dropped,
                rows = layout.iter().map(|placed| placed.row + 1).max().unwrap_or(0),
                fitting_rows,
                "gene rows exceed track height; increase `height` to show them"
            );
        }
        trace!(genes = layout.len(), dropped, "drew gene track");

        draw_title(ctx)
    }
}

#[derive(Debug, Clone)]
struct FeatureStyle {
    height: f64,
    fill: Color,
    label_font: Font,
    label_color: Color,
    label_spacing: f64,
}

impl FeatureStyle {
    fn row_height(&self) -> f64 {
        self.height + LABEL_GAP_PT + estimate_text_height(&self.label_font) + ROW_PADDING_PT
    }
}

/// A visible gene with its clipped body and row, in device x.
#[derive(Debug, Clone)]
struct PlacedGene<'a> {
    gene: &'a Gene,
    body: Span,
    label_center: f64,
    row: usize,
}

fn layout_genes<'a>(
    genes: &'a [Gene],
    style: &FeatureStyle,
    transform: Affine,
    x_domain: Span,
) -> Vec<PlacedGene<'a>> {
    let mut visible = Vec::new();
    let mut extents = Vec::new();
    for gene in genes {
        let (start, end) = (gene.start as f64, gene.end as f64);
        if end < x_domain.min() || start > x_domain.max() {
            continue;
        }
        let x0 = transform.apply_x(x_domain.clamp(start));
        let x1 = transform.apply_x(x_domain.clamp(end));
        let body = Span::new(x0.min(x1), x0.max(x1));
        let center = (body.start + body.end) / 2.0;
        let half_label = estimate_text_width(gene.label(), &style.label_font) / 2.0;
        extents.push(Span::new(
            body.start.min(center - half_label),
            body.end.max(center + half_label),
        ));
        visible.push(PlacedGene {
            gene,
            body,
            label_center: center,
            row: 0,
        });
    }

    for (placed, row) in visible.iter_mut().zip(pack_rows(&extents, style.label_spacing)) {
        placed.row = row;
    }
    visible
}

/// Greedy first-fit row assignment for extents sorted by left edge.
///
/// A row accepts an extent when its rightmost occupied x plus `spacing` does
/// not exceed the extent's left edge.
pub(crate) fn pack_rows(extents: &[Span], spacing: f64) -> Vec<usize> {
    let mut row_ends: Vec<f64> = Vec::new();
    extents
        .iter()
        .map(|extent| {
            let row = row_ends
                .iter()
                .position(|end| end + spacing <= extent.start)
                .unwrap_or(row_ends.len());
            if row == row_ends.len() {
                row_ends.push(extent.end);
            } else {
                row_ends[row] = extent.end;
            }
            row
        })
        .collect()
}

fn draw_gene(
    out: &mut RenderFrame,
    style: &FeatureStyle,
    transform: Affine,
    placed: &PlacedGene<'_>,
    x_domain: Span,
    row_top: f64,
) {
    let top = transform.apply_y(row_top);
    let bottom = transform.apply_y(row_top + style.height);
    let mid = (top + bottom) / 2.0;
    let body = placed.body;

    out.push_line(LinePrimitive::new(
        body.start,
        mid,
        body.end,
        mid,
        INTRON_LINE_WIDTH_PT,
        style.fill,
    ));
    draw_chevrons(out, placed.gene.strand, body, mid, style.fill);

    let exons: Vec<(u64, u64)> = if placed.gene.exons.is_empty() {
        vec![(placed.gene.start, placed.gene.end)]
    } else {
        placed
            .gene
            .exons
            .iter()
            .map(|exon| (exon.start, exon.end))
            .collect()
    };
    for (start, end) in exons {
        if (end as f64) < x_domain.min() || (start as f64) > x_domain.max() {
            continue;
        }
        let x0 = transform.apply_x(x_domain.clamp(start as f64));
        let x1 = transform.apply_x(x_domain.clamp(end as f64));
        out.push_rect(RectPrimitive::from_corners(x0, top, x1, bottom, style.fill));
    }

    out.push_text(TextPrimitive::new(
        placed.gene.label(),
        placed.label_center,
        bottom.max(top) + LABEL_GAP_PT,
        style.label_font.clone(),
        style.label_color,
        TextHAlign::Center,
        TextVAlign::Top,
    ));
}

fn draw_chevrons(out: &mut RenderFrame, strand: Strand, body: Span, mid: f64, color: Color) {
    let direction = match strand {
        Strand::Forward => 1.0,
        Strand::Reverse => -1.0,
        Strand::Unknown => return,
    };
    let count = (body.length() / CHEVRON_SPACING_PT).floor() as usize;
    for index in 1..count {
        let tip =
            body.start + index as f64 * CHEVRON_SPACING_PT + direction * CHEVRON_HALF_PT / 2.0;
        let tail = tip - direction * CHEVRON_HALF_PT;
        for dy in [-CHEVRON_HALF_PT, CHEVRON_HALF_PT] {
            out.push_line(LinePrimitive::new(
                tail,
                mid + dy,
                tip,
                mid,
                INTRON_LINE_WIDTH_PT,
                color,
            ));
        }
    }
}
