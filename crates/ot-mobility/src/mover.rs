//! The `Mover` trait — the only movement interface the state machines see.

use ot_core::{AgentId, Point};

/// Physical movement capability for every body in the simulation.
///
/// The behavior crates only ever ask a mover to head somewhere and then poll
/// whether it got there.  Implementations may process `set_destination`
/// lazily; the tick loop calls [`advance`][Self::advance] once per poll
/// interval before any arrival checks.
pub trait Mover {
    /// Start `agent` walking toward `to`, replacing any previous destination.
    fn set_destination(&mut self, agent: AgentId, to: Point);

    /// `true` when `agent` has no movement pending, is within stopping
    /// distance of its destination, and is not moving.
    fn has_arrived(&self, agent: AgentId) -> bool;

    /// Current position of `agent`.
    fn position(&self, agent: AgentId) -> Point;

    /// The destination most recently given to `agent`.
    fn destination(&self, agent: AgentId) -> Point;

    /// Move every body forward by `dt_secs` seconds.
    fn advance(&mut self, dt_secs: f32);
}
