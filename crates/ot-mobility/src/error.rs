use ot_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("agent {0:?} has no movement slot")]
    UnknownAgent(AgentId),

    #[error("walking speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
