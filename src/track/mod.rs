//! Track objects: each draws one row of the figure into its own frames.

mod axis;
pub(crate) mod common;
mod data;
mod gene;

pub use axis::GenomicAxis;
pub use common::TrackBox;
pub use data::{DataTrack, Geom};
pub use gene::GeneTrack;

use crate::core::Params;
use crate::error::GvizResult;

use common::DrawContext;

#[derive(Debug, Clone, PartialEq)]
pub enum Track {
    Axis(GenomicAxis),
    Data(DataTrack),
    Gene(GeneTrack),
}

impl Track {
    /// Track-level parameters; they form the environment of the track frame.
    #[must_use]
    pub fn params(&self) -> &Params {
        match self {
            Self::Axis(axis) => axis.params(),
            Self::Data(data) => data.params(),
            Self::Gene(gene) => gene.params(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Axis(_) => "axis",
            Self::Data(_) => "data",
            Self::Gene(_) => "gene",
        }
    }

    pub(crate) fn draw(&self, ctx: &mut DrawContext<'_>) -> GvizResult<()> {
        match self {
            Self::Axis(axis) => axis.draw(ctx),
            Self::Data(data) => data.draw(ctx),
            Self::Gene(gene) => gene.draw(ctx),
        }
    }
}

impl From<GenomicAxis> for Track {
    fn from(value: GenomicAxis) -> Self {
        Self::Axis(value)
    }
}

impl From<DataTrack> for Track {
    fn from(value: DataTrack) -> Self {
        Self::Data(value)
    }
}

impl From<GeneTrack> for Track {
    fn from(value: GeneTrack) -> Self {
        Self::Gene(value)
    }
}
