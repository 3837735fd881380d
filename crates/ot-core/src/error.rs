//! Framework error type.
//!
//! Sub-crates define their own error enums; `OtError` covers the handful of
//! failures that can happen in `ot-core` itself and is wrapped by the others.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `ot-core`.
#[derive(Debug, Error)]
pub enum OtError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ot-core`.
pub type OtResult<T> = Result<T, OtError>;
