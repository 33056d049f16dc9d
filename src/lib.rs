//! gviz: genomic track plots rendered to PDF.
//!
//! Tracks (a genomic axis, x/y data and gene annotations) share one genomic
//! x range and are stacked vertically. Each track draws into nested
//! reference frames whose parameter environments fall back to the figure's
//! and then to built-in defaults.

pub mod annotation;
pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;
pub mod track;

pub use api::{Figure, FigureConfig, TrackPlot, default_params};
#[cfg(feature = "cairo-backend")]
pub use api::plot_tracks;
pub use error::{GvizError, GvizResult};
pub use track::{DataTrack, GeneTrack, GenomicAxis, Track};
