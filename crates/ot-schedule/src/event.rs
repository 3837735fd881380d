//! Timer payloads.

use ot_core::{AgentId, LineId};

/// The purpose of a timer owned by a worker, manager or visitor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentTimer {
    /// Leave the break room / outside area / conversation and head back.
    ReturnToWork,
    /// A desk worker's next need roll while seated at the desk.
    ResumeWork,
    /// Finished eating; leave the cafeteria.
    LeaveCafeteria,
    /// A manager in the office decides what to do next.
    Think,
    /// A manager waiting in the meeting room re-checks attendance.
    MeetingPoll,
    /// The running meeting is over.
    EndMeeting,
    /// Refresh the manager's target while walking to a subordinate.
    FollowSubordinate,
    /// The manager is done chatting with the subordinate it walked to.
    FinishCheckIn,
}

/// What happens when a timer fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerEvent {
    Agent { agent: AgentId, kind: AgentTimer },
    /// The person at the head of `LineId` has been served.
    LineService(LineId),
}
