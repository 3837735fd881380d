use ot_behavior::BehaviorError;
use ot_core::{ManagerId, OtError, WorkerId};
use ot_facility::FacilityError;
use ot_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("desk worker {0} has no desk")]
    MissingDesk(WorkerId),

    #[error("{kind} worker {worker} needs waypoints but the floor plan has none")]
    MissingRoute {
        worker: WorkerId,
        kind:   &'static str,
    },

    #[error("manager {manager} lists unknown worker {worker}")]
    UnknownSubordinate {
        manager: ManagerId,
        worker:  WorkerId,
    },

    #[error("worker {worker} is on the rosters of both {first} and {second}")]
    OverlappingRosters {
        worker: WorkerId,
        first:  ManagerId,
        second: ManagerId,
    },

    #[error(transparent)]
    Config(#[from] OtError),

    #[error("invalid floor plan: {0}")]
    Facility(#[from] FacilityError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
