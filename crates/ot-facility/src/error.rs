//! Errors raised while assembling facilities and the floor plan.
//!
//! Contention at run time (a full line, no free seat, every meeting room
//! booked) is never an error; those outcomes are ordinary return values.

use thiserror::Error;

use ot_core::{LineId, SeatingId, StationId};

use crate::LinePurpose;

#[derive(Debug, Error)]
pub enum FacilityError {
    #[error("a seating area needs at least one seat")]
    EmptySeatingArea,

    #[error("line {0} has no slots")]
    NoLineSlots(LineId),

    #[error("line {line} service time must be positive, got {secs} s")]
    InvalidServiceTime { line: LineId, secs: f32 },

    #[error("line {0} is not registered")]
    UnknownLine(LineId),

    #[error("seating area {0} is not registered")]
    UnknownSeating(SeatingId),

    #[error("line {line} serves {found:?} but is used as a {expected:?} line")]
    WrongLinePurpose {
        line:     LineId,
        expected: LinePurpose,
        found:    LinePurpose,
    },

    #[error("food station {0} has an empty name")]
    UnnamedStation(StationId),

    #[error("food station {0} is listed more than once")]
    DuplicateStation(StationId),

    #[error("floor plan has no {0}")]
    EmptyRegistry(&'static str),

    #[error("{kind} id {found} does not match the next free id {expected}")]
    IdOutOfOrder {
        kind:     &'static str,
        expected: usize,
        found:    usize,
    },

    #[error("too many {0} for the id type")]
    TooMany(&'static str),

    #[error(transparent)]
    Spatial(#[from] ot_spatial::SpatialError),
}

pub type FacilityResult<T> = Result<T, FacilityError>;
