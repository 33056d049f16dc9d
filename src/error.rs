use thiserror::Error;

pub type GvizResult<T> = Result<T, GvizError>;

#[derive(Debug, Error)]
pub enum GvizError {
    #[error("invalid page size: width={width}, height={height}")]
    InvalidPageSize { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid range: start={start}, end={end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("invalid parameter `{key}`: {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("parameter `{key}` is not set in frame `{frame}` or any of its ancestors")]
    MissingParameter { key: String, frame: String },

    #[error("unknown reference frame id {0}")]
    UnknownFrame(usize),

    #[error("no tracks to plot")]
    EmptyTrackList,

    #[error("annotation error: {0}")]
    Annotation(String),

    #[error("render backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid figure config: {0}")]
    Config(#[from] serde_json::Error),
}

impl GvizError {
    pub(crate) fn invalid_parameter(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }
}
