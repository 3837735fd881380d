//! Per-call context bundle.

use ot_core::{AgentId, AgentRngs, Point, SimClock, Tick};
use ot_facility::{Facilities, Layout};
use ot_mobility::Mover;
use ot_schedule::{AgentTimer, TimerEvent, TimerHandle, TimerQueue};

use crate::Tuning;

/// Everything a state machine may read or change while handling one event.
///
/// Built by the tick loop for each call.  The floor plan and tuning are
/// shared; coordinators, timers, the mover and the per-agent RNGs are
/// borrowed mutably.  Fields are public so handlers can borrow two of them
/// at once (e.g. `ctx.layout` while drawing from `ctx.rngs`).
pub struct Ctx<'a> {
    pub now:        Tick,
    pub clock:      &'a SimClock,
    pub tuning:     &'a Tuning,
    pub layout:     &'a Layout,
    pub facilities: &'a mut Facilities,
    pub timers:     &'a mut TimerQueue,
    pub mover:      &'a mut dyn Mover,
    pub rngs:       &'a mut AgentRngs,
}

impl Ctx<'_> {
    #[inline]
    pub fn walk(&mut self, agent: AgentId, to: Point) {
        self.mover.set_destination(agent, to);
    }

    /// Stop `agent` where it stands.
    pub fn halt(&mut self, agent: AgentId) {
        let here = self.mover.position(agent);
        self.mover.set_destination(agent, here);
    }

    #[inline]
    pub fn position(&self, agent: AgentId) -> Point {
        self.mover.position(agent)
    }

    /// Arm an agent timer `secs` from now in `slot`, replacing whatever the
    /// slot held.
    pub fn schedule(
        &mut self,
        slot:  &mut Option<TimerHandle>,
        agent: AgentId,
        kind:  AgentTimer,
        secs:  f32,
    ) -> TimerHandle {
        let at = self.clock.after_secs(self.now, secs);
        self.timers.schedule(slot, at, TimerEvent::Agent { agent, kind })
    }

    #[inline]
    pub fn cancel(&mut self, slot: &mut Option<TimerHandle>) -> bool {
        self.timers.cancel(slot)
    }
}
