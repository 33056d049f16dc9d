use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Params;
use crate::error::GvizResult;
use crate::track::{DataTrack, GeneTrack, GenomicAxis, Track};

use super::TrackPlot;

/// JSON description of a figure.
///
/// ```json
/// {
///   "output": "figure.pdf",
///   "xmin": 1000, "xmax": 5000,
///   "params": { "width": "16cm" },
///   "tracks": [
///     { "type": "axis" },
///     { "type": "data", "x": [1200, 2400], "y": [0.5, 2.0], "geom": "col" },
///     { "type": "gene", "chrom": "chr1", "start": 1000, "end": 5000, "gtf": "genes.gtf.gz" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub xmin: f64,
    pub xmax: f64,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    pub tracks: Vec<TrackConfig>,
}

/// One track; every key besides the tag and the listed fields is a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackConfig {
    Axis {
        #[serde(flatten)]
        params: Params,
    },
    Data {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        layers: Vec<Params>,
        #[serde(flatten)]
        params: Params,
    },
    Gene {
        chrom: String,
        start: u64,
        end: u64,
        #[serde(flatten)]
        params: Params,
    },
}

impl TrackConfig {
    #[must_use]
    pub fn into_track(self) -> Track {
        match self {
            Self::Axis { params } => GenomicAxis::with_params(params).into(),
            Self::Data { layers, params } => {
                DataTrack::with_params(params).with_layers(layers).into()
            }
            Self::Gene {
                chrom,
                start,
                end,
                params,
            } => GeneTrack::new(chrom, start, end).with_params(params).into(),
        }
    }
}

impl FigureConfig {
    pub fn from_json_str(input: &str) -> GvizResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GvizResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> GvizResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_plot(self) -> GvizResult<(TrackPlot, Vec<Track>)> {
        let plot = TrackPlot::new(self.xmin, self.xmax)?.with_params(self.params);
        let tracks = self
            .tracks
            .into_iter()
            .map(TrackConfig::into_track)
            .collect();
        Ok((plot, tracks))
    }
}
