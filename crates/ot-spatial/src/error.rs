//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `ot-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("area dimensions must be finite and non-negative (width {width}, length {length})")]
    InvalidArea { width: f32, length: f32 },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
