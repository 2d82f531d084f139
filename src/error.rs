//! Error type shared by the session layer and the exporters.
//!
//! The pixel algorithms themselves are total over well-formed input and never
//! return errors; degenerate input (zero-size buffers, seeds outside the image)
//! simply yields empty masks.

pub type CutoutResult<T> = Result<T, CutoutError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CutoutError {
    #[error("invalid pixel buffer: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("setting `{name}` out of range: {value} (allowed {min}..={max})")]
    InvalidSetting {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid settings: {0}")]
    InvalidConfig(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("no selection")]
    NoSelection,

    #[error("selection has not been isolated")]
    NotIsolated,

    #[error("selection is locked after isolate; reset to edit again")]
    SelectionLocked,

    #[error("no contour available for vector export")]
    NoContour,

    #[error("encode error: {0}")]
    Encode(String),
}

impl CutoutError {
    pub fn setting(name: &'static str, value: impl Into<f64>, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        Self::InvalidSetting {
            name,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
