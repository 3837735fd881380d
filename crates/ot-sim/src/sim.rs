//! The `Sim` struct and its tick loop.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info, trace};

use ot_behavior::{
    Ctx, Manager, ManagerState, Tuning, Visitor, Worker, WorkerState, interrupt_conversation,
    start_conversation,
};
use ot_core::{AgentId, AgentRngs, LineId, ManagerId, SimClock, SimConfig, Tick, VisitorId, WorkerId};
use ot_facility::{Facilities, Layout};
use ot_mobility::{MobilityEngine, Mover};
use ot_schedule::{AgentTimer, FiredTimer, TimerEvent, TimerHandle, TimerQueue};
use ot_spatial::{ContactPair, ProximityIndex};

use crate::{SimObserver, SimResult, SimView, TickStats};

// ── Roles ─────────────────────────────────────────────────────────────────────

/// Which entity a body belongs to.  Indexed by `AgentId` in [`Sim::roles`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Worker(WorkerId),
    Manager(ManagerId),
    Visitor(VisitorId),
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Worker(_)  => "worker",
            Role::Manager(_) => "manager",
            Role::Visitor(_) => "visitor",
        }
    }
}

/// A visitor whose body is reserved but who has not walked in yet.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PendingVisitor {
    pub id:   VisitorId,
    pub body: AgentId,
    pub at:   Tick,
}

// ── Floor ─────────────────────────────────────────────────────────────────────

/// Everything the state machines act on, kept apart from the entities so a
/// [`Ctx`] can be borrowed alongside one of them.
pub struct Floor {
    pub clock:      SimClock,
    pub tuning:     Tuning,
    pub layout:     Layout,
    pub facilities: Facilities,
    pub timers:     TimerQueue,
    pub mobility:   MobilityEngine,
    pub rngs:       AgentRngs,
}

impl Floor {
    pub fn ctx(&mut self, now: Tick) -> Ctx<'_> {
        Ctx {
            now,
            clock:      &self.clock,
            tuning:     &self.tuning,
            layout:     &self.layout,
            facilities: &mut self.facilities,
            timers:     &mut self.timers,
            mover:      &mut self.mobility,
            rngs:       &mut self.rngs,
        }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick runs five phases in a fixed order:
///
/// 1. **Visitors** — visitors due this tick are placed at the cafeteria door.
/// 2. **Movement** — the mover walks every body for one tick.
/// 3. **Timers** — every live timer due this tick is dispatched, agent timers
///    to their owner and line-service timers through the line.
/// 4. **Arrivals** — every body the mover reports as arrived gets
///    `on_arrival`, in ascending `AgentId` order.
/// 5. **Contacts** — pairs of bodies that newly came within
///    `tuning.contact_radius` of each other start or break up conversations.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config:   SimConfig,
    pub floor:    Floor,
    pub workers:  Vec<Worker>,
    pub managers: Vec<Manager>,

    /// Visitors that have walked in so far, indexed by `VisitorId`.
    pub visitors: Vec<Visitor>,

    /// Owner of every body, indexed by `AgentId`.
    pub roles: Vec<Role>,

    pub(crate) pending:  VecDeque<PendingVisitor>,
    pub(crate) contacts: BTreeSet<ContactPair>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            workers  = self.workers.len(),
            managers = self.managers.len(),
            visitors = self.pending.len() + self.visitors.len(),
            ticks    = self.config.total_ticks,
            "simulation started"
        );
        while self.floor.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.floor.clock.current_tick);
        info!(
            tick     = %self.floor.clock.current_tick,
            meetings = self.managers.iter().map(Manager::meetings_started).sum::<u32>(),
            departed = self.visitors.iter().filter(|v| v.has_departed()).count(),
            "simulation finished"
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.floor.clock.current_tick
    }

    /// Owner of `agent`, if it is a known body.
    #[inline]
    pub fn role(&self, agent: AgentId) -> Option<Role> {
        self.roles.get(agent.index()).copied()
    }

    pub fn view(&self) -> SimView<'_> {
        SimView {
            clock:    &self.floor.clock,
            workers:  &self.workers,
            managers: &self.managers,
            visitors: &self.visitors,
            mobility: &self.floor.mobility,
        }
    }

    /// Head counts for the current state.
    pub fn tick_stats(&self) -> TickStats {
        let mut stats = TickStats::default();
        for w in &self.workers {
            match w.state() {
                WorkerState::Working        => stats.working += 1,
                WorkerState::Cafeteria      => stats.in_cafeteria += 1,
                WorkerState::InMeeting      => stats.in_meeting += 1,
                WorkerState::TalkingToAgent => stats.talking += 1,
                _ => {}
            }
        }
        stats.in_cafeteria += self.visitors.iter().filter(|v| !v.has_departed()).count();
        stats.meetings_running = self
            .managers
            .iter()
            .filter(|m| m.state() == ManagerState::InMeeting)
            .count();
        stats.cafeteria_seats_taken = self
            .floor
            .facilities
            .seating(self.floor.layout.cafeteria_seating())
            .map_or(0, |s| s.taken_count());
        stats
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Send every worker and manager off to work.  Called once by the builder.
    pub(crate) fn start(&mut self) {
        let now = self.now();
        for w in &mut self.workers {
            w.start(&mut self.floor.ctx(now));
        }
        for m in &mut self.managers {
            m.start(&mut self.floor.ctx(now));
        }
    }

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.now();
        observer.on_tick_start(now);
        let stats = self.process_tick(now)?;
        observer.on_tick_end(now, &stats);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.view());
        }
        self.floor.clock.advance();
        Ok(())
    }

    fn process_tick(&mut self, now: Tick) -> SimResult<TickStats> {
        // ── Phase 1: visitors walking in ──────────────────────────────────
        while let Some(next) = self.pending.front().copied() {
            if next.at > now {
                break;
            }
            self.pending.pop_front();
            self.spawn_visitor(next, now)?;
        }

        // ── Phase 2: movement ─────────────────────────────────────────────
        let dt = self.floor.clock.tick_secs();
        self.floor.mobility.advance(dt);

        // ── Phase 3: timers ───────────────────────────────────────────────
        //
        // Timers armed while handling these fire on a later tick, never this
        // one, so a single drain is enough.
        for fired in self.floor.timers.drain_due(now) {
            self.dispatch_timer(fired, now);
        }

        // ── Phase 4: arrivals ─────────────────────────────────────────────
        for i in 0..self.roles.len() {
            let agent = AgentId(i as u32);
            if self.floor.mobility.has_arrived(agent) {
                self.dispatch_arrival(agent, now)?;
            }
        }

        // ── Phase 5: proximity contacts ───────────────────────────────────
        let fresh = self.detect_contacts(now);
        if fresh > 0 {
            trace!(tick = %now, fresh, "new contacts");
        }

        Ok(self.tick_stats())
    }

    fn spawn_visitor(&mut self, pending: PendingVisitor, now: Tick) -> SimResult<()> {
        let door = self.floor.layout.cafeteria_exit();
        self.floor.mobility.store.place(pending.body, door)?;
        let visitor = Visitor::spawn(pending.id, pending.body, &mut self.floor.ctx(now));
        self.visitors.push(visitor);
        Ok(())
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    fn dispatch_timer(&mut self, fired: FiredTimer, now: Tick) {
        match fired.event {
            TimerEvent::Agent { agent, kind } => self.agent_timer(agent, fired.handle, kind, now),
            TimerEvent::LineService(line) => self.line_service(line, fired.handle, now),
        }
    }

    fn agent_timer(&mut self, agent: AgentId, handle: TimerHandle, kind: AgentTimer, now: Tick) {
        match self.role(agent) {
            Some(Role::Worker(id)) => {
                if let Some(w) = self.workers.get_mut(id.index()) {
                    w.on_timer(handle, kind, &mut self.floor.ctx(now));
                }
            }
            Some(Role::Manager(id)) => {
                if let Some(m) = self.managers.get_mut(id.index()) {
                    m.on_timer(handle, kind, &mut self.workers, &mut self.floor.ctx(now));
                }
            }
            Some(Role::Visitor(id)) => {
                if let Some(v) = self.visitors.get_mut(id.index()) {
                    v.on_timer(handle, kind, &mut self.floor.ctx(now));
                }
            }
            None => trace!(%agent, ?kind, "timer for unknown body"),
        }
    }

    /// The head of `line` has been served: tell them, let the nearest waiter
    /// in and shuffle everyone still queued onto their slots.
    fn line_service(&mut self, line: LineId, handle: TimerHandle, now: Tick) {
        let floor = &mut self.floor;
        let Some(queue) = floor.facilities.line_mut(line) else {
            trace!(%line, "service timer for unknown line");
            return;
        };
        let mobility = &floor.mobility;
        let outcome = queue.complete_service(
            handle,
            |agent| mobility.position(agent),
            &mut floor.timers,
            &floor.clock,
            now,
        );
        let Some(outcome) = outcome else {
            trace!(%line, "stale service timer");
            return;
        };

        self.patron_served(outcome.served, line, now);
        if let Some(next) = outcome.promoted {
            self.patron_let_in(next, line);
        }
        for (agent, slot) in outcome.moves {
            self.floor.mobility.set_destination(agent, slot);
        }
    }

    fn patron_served(&mut self, agent: AgentId, line: LineId, now: Tick) {
        match self.role(agent) {
            Some(Role::Worker(id)) => {
                if let Some(w) = self.workers.get_mut(id.index()) {
                    w.on_served(line, &mut self.floor.ctx(now));
                }
            }
            Some(Role::Visitor(id)) => {
                if let Some(v) = self.visitors.get_mut(id.index()) {
                    v.on_served(line, &mut self.floor.ctx(now));
                }
            }
            other => trace!(%agent, ?other, "served body is not a patron"),
        }
    }

    fn patron_let_in(&mut self, agent: AgentId, line: LineId) {
        match self.role(agent) {
            Some(Role::Worker(id)) => {
                if let Some(w) = self.workers.get_mut(id.index()) {
                    w.on_wait_over(line);
                }
            }
            Some(Role::Visitor(id)) => {
                if let Some(v) = self.visitors.get_mut(id.index()) {
                    v.on_wait_over(line);
                }
            }
            other => trace!(%agent, ?other, "promoted body is not a patron"),
        }
    }

    fn dispatch_arrival(&mut self, agent: AgentId, now: Tick) -> SimResult<()> {
        match self.role(agent) {
            Some(Role::Worker(id)) => {
                if let Some(w) = self.workers.get_mut(id.index()) {
                    w.on_arrival(&mut self.floor.ctx(now));
                }
            }
            Some(Role::Manager(id)) => {
                if let Some(m) = self.managers.get_mut(id.index()) {
                    m.on_arrival(&mut self.floor.ctx(now));
                }
            }
            Some(Role::Visitor(id)) => {
                let Some(v) = self.visitors.get_mut(id.index()) else {
                    return Ok(());
                };
                v.on_arrival(&mut self.floor.ctx(now));
                if v.has_departed() {
                    self.floor.mobility.store.despawn(agent)?;
                }
            }
            None => {}
        }
        Ok(())
    }

    // ── Contacts ──────────────────────────────────────────────────────────

    /// Raise an event for every pair that came into contact this tick.
    /// Returns how many pairs did.
    fn detect_contacts(&mut self, now: Tick) -> usize {
        let index = ProximityIndex::build(self.floor.mobility.active_positions());
        let current: BTreeSet<ContactPair> = index
            .pairs_within(self.floor.tuning.contact_radius)
            .into_iter()
            .collect();
        let fresh: Vec<ContactPair> = current.difference(&self.contacts).copied().collect();
        self.contacts = current;

        for &pair in &fresh {
            self.on_contact(pair, now);
        }
        fresh.len()
    }

    fn on_contact(&mut self, pair: ContactPair, now: Tick) {
        match (self.role(pair.a), self.role(pair.b)) {
            (Some(Role::Worker(a)), Some(Role::Worker(b))) => {
                start_conversation(&mut self.workers, a, b, &mut self.floor.ctx(now));
            }
            (Some(Role::Manager(m)), Some(Role::Worker(w)))
            | (Some(Role::Worker(w)), Some(Role::Manager(m))) => {
                if interrupt_conversation(&mut self.workers, w, &mut self.floor.ctx(now)) {
                    debug!(manager = %m, worker = %w, "manager broke up a conversation");
                }
            }
            _ => {}
        }
    }
}
