//! Figure driver: lays out tracks in a frame tree and draws them.

mod config;
mod defaults;
mod plot;

pub use config::{FigureConfig, TrackConfig};
pub use defaults::default_params;
pub use plot::{Figure, FigureLayout, TrackPlot, TrackSlot};

#[cfg(feature = "cairo-backend")]
pub use plot::plot_tracks;
