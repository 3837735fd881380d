//! Bounded FIFO service line with an overflow waiting set.
//!
//! # Admission
//!
//! ```text
//! occupants.len() < slots.len()  →  append at slot = occupants.len()
//!                                   (arm the service timer if first)
//! otherwise                      →  add to overflow, caller waits nearby
//! ```
//!
//! # Service
//!
//! Each time the service timer fires the head of the line is served and
//! removed.  If anyone is waiting in overflow, the waiter standing closest to
//! the entrance (first found wins a tie) is promoted to the back of the line.
//! Every remaining occupant is then re-targeted to the slot matching its
//! index, and the timer is re-armed while the line is non-empty.

use tracing::debug;

use ot_core::{AgentId, LineId, Point, SimClock, Tick};
use ot_schedule::{TimerEvent, TimerHandle, TimerQueue};

use crate::{FacilityError, FacilityResult};

/// What a line hands out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinePurpose {
    /// A food station: being served yields an entrée.
    Food,
    /// The cashier: being served settles the bill.
    Payment,
}

/// Result of asking to join a line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Admission {
    /// Joined the line at `slot`; walk to `position`.
    Admitted { slot: usize, position: Point },
    /// Line full; the requester has been put on the overflow list.
    Full,
}

/// Everything that changed when one service interval completed.
///
/// The caller delivers the notifications: `served` gets "service completed",
/// `promoted` (if any) gets "your wait is over", and every entry of `moves`
/// walks to its new slot.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceOutcome {
    pub served:   AgentId,
    pub promoted: Option<AgentId>,
    pub moves:    Vec<(AgentId, Point)>,
}

/// A service line with `slots.len()` physical places to stand.
///
/// Invariant: `occupants.len() <= slots.len()`, and the occupant at index `i`
/// stands (or walks to) `slots[i]`.
#[derive(Debug)]
pub struct Line {
    pub id:           LineId,
    pub purpose:      LinePurpose,
    pub entrance:     Point,
    slots:            Vec<Point>,
    service_secs:     f32,
    occupants:        Vec<AgentId>,
    overflow:         Vec<AgentId>,
    timer:            Option<TimerHandle>,
}

impl Line {
    pub fn new(
        id:           LineId,
        purpose:      LinePurpose,
        entrance:     Point,
        slots:        Vec<Point>,
        service_secs: f32,
    ) -> FacilityResult<Self> {
        if slots.is_empty() {
            return Err(FacilityError::NoLineSlots(id));
        }
        if !(service_secs.is_finite() && service_secs > 0.0) {
            return Err(FacilityError::InvalidServiceTime { line: id, secs: service_secs });
        }
        Ok(Self {
            id,
            purpose,
            entrance,
            slots,
            service_secs,
            occupants: Vec::new(),
            overflow: Vec::new(),
            timer: None,
        })
    }

    /// Ask to join the line.
    pub fn put_in_line(
        &mut self,
        agent:  AgentId,
        timers: &mut TimerQueue,
        clock:  &SimClock,
        now:    Tick,
    ) -> Admission {
        if self.occupants.len() < self.slots.len() {
            self.occupants.push(agent);
            let slot = self.occupants.len() - 1;
            if self.occupants.len() == 1 {
                self.arm(timers, clock, now);
            }
            debug!(line = %self.id, %agent, slot, "joined line");
            Admission::Admitted { slot, position: self.slots[slot] }
        } else {
            self.overflow.push(agent);
            debug!(line = %self.id, %agent, waiting = self.overflow.len(), "line full");
            Admission::Full
        }
    }

    /// Serve the head of the line.
    ///
    /// `fired` must be the handle of the timer that just came due; a handle
    /// that is not this line's current timer is stale and yields `None`.
    /// `position_of` reports where an overflow waiter is standing right now.
    pub fn complete_service(
        &mut self,
        fired:       TimerHandle,
        position_of: impl Fn(AgentId) -> Point,
        timers:      &mut TimerQueue,
        clock:       &SimClock,
        now:         Tick,
    ) -> Option<ServiceOutcome> {
        if self.timer != Some(fired) {
            return None;
        }
        self.timer = None;
        if self.occupants.is_empty() {
            return None;
        }
        let served = self.occupants.remove(0);

        let promoted = self.nearest_waiter(&position_of).map(|idx| {
            let next = self.overflow.remove(idx);
            self.occupants.push(next);
            next
        });

        let moves: Vec<(AgentId, Point)> = self
            .occupants
            .iter()
            .zip(&self.slots)
            .map(|(&agent, &slot)| (agent, slot))
            .collect();

        if !self.occupants.is_empty() {
            self.arm(timers, clock, now);
        }
        debug!(line = %self.id, %served, promoted = ?promoted, queued = self.occupants.len(), "served");
        Some(ServiceOutcome { served, promoted, moves })
    }

    /// Index into `overflow` of the waiter closest to the entrance.
    fn nearest_waiter(&self, position_of: &impl Fn(AgentId) -> Point) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &agent) in self.overflow.iter().enumerate() {
            let d = self.entrance.distance_sq(position_of(agent));
            if best.is_none_or(|(_, min)| d < min) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    fn arm(&mut self, timers: &mut TimerQueue, clock: &SimClock, now: Tick) {
        let at = clock.after_secs(now, self.service_secs);
        timers.schedule(&mut self.timer, at, TimerEvent::LineService(self.id));
    }

    /// Slot index of `agent`, if it is in the line proper.
    pub fn slot_of(&self, agent: AgentId) -> Option<usize> {
        self.occupants.iter().position(|&a| a == agent)
    }

    pub fn occupants(&self) -> &[AgentId] {
        &self.occupants
    }

    pub fn overflow(&self) -> &[AgentId] {
        &self.overflow
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_position(&self, slot: usize) -> Option<Point> {
        self.slots.get(slot).copied()
    }

    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.slots.len()
    }

    /// `true` while a service timer is pending.
    pub fn is_serving(&self) -> bool {
        self.timer.is_some()
    }
}
