use thiserror::Error;

use ot_core::RoomId;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("tuning field `{field}` is invalid: {reason}")]
    InvalidTuning { field: &'static str, reason: String },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

/// Why a worker turned down a meeting invitation.  Neither case changes the
/// worker's state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MeetingRefusal {
    #[error("worker is in the cafeteria")]
    InCafeteria,

    #[error("no free seat in meeting room {0}")]
    NoSeat(RoomId),
}
