use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("unparsable metric timestamp {raw:?}")]
    InvalidTimestamp { raw: String },

    #[error("metric value {value} at {date:?} is not a non-negative number")]
    InvalidValue { date: String, value: f64 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl MetricsError {
    pub fn invalid_timestamp(raw: impl Into<String>) -> Self {
        Self::InvalidTimestamp { raw: raw.into() }
    }

    pub fn invalid_value(date: impl Into<String>, value: f64) -> Self {
        Self::InvalidValue {
            date: date.into(),
            value,
        }
    }
}
