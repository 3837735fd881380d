//! Simulation observer trait for progress reporting and data collection.

use ot_behavior::{Manager, Visitor, Worker};
use ot_core::{AgentId, Point, SimClock, Tick};
use ot_mobility::{MobilityEngine, Mover};

// ── TickStats ─────────────────────────────────────────────────────────────────

/// Head counts taken at the end of a tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Workers in `Working`.
    pub working:               usize,
    /// Workers in `Cafeteria` plus visitors still inside.
    pub in_cafeteria:          usize,
    /// Workers seated in a running or pending meeting.
    pub in_meeting:            usize,
    /// Workers in `TalkingToAgent`.
    pub talking:               usize,
    pub cafeteria_seats_taken: usize,
    /// Managers in `InMeeting`.
    pub meetings_running:      usize,
}

// ── SimView ───────────────────────────────────────────────────────────────────

/// One row of a position snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySnapshot {
    pub agent:        AgentId,
    pub role:         &'static str,
    /// Worker kind; empty for managers and visitors.
    pub kind:         &'static str,
    pub state:        &'static str,
    pub hunger:       u32,
    pub thirst:       u32,
    pub restlessness: f32,
    pub position:     Point,
}

/// Read-only view of every entity, handed to [`SimObserver::on_snapshot`].
pub struct SimView<'a> {
    pub clock:    &'a SimClock,
    pub workers:  &'a [Worker],
    pub managers: &'a [Manager],
    pub visitors: &'a [Visitor],
    pub mobility: &'a MobilityEngine,
}

impl SimView<'_> {
    /// Every body currently on the floor, in `AgentId` order.
    ///
    /// Visitors that have not walked in yet or have already left are skipped.
    pub fn bodies(&self) -> Vec<BodySnapshot> {
        let mut rows = Vec::with_capacity(self.workers.len() + self.managers.len() + self.visitors.len());

        for w in self.workers {
            // Mid-meal the session holds the live appetite.
            let (hunger, thirst) = match w.cafeteria() {
                Some(session) => (session.hunger(), session.thirst()),
                None => (w.needs.hunger, w.needs.thirst),
            };
            rows.push(BodySnapshot {
                agent:        w.body,
                role:         "worker",
                kind:         w.kind.as_str(),
                state:        w.state_label(),
                hunger,
                thirst,
                restlessness: w.needs.restlessness,
                position:     self.mobility.position(w.body),
            });
        }

        for m in self.managers {
            rows.push(BodySnapshot {
                agent:        m.body,
                role:         "manager",
                kind:         "",
                state:        m.state().as_str(),
                hunger:       0,
                thirst:       0,
                restlessness: 0.0,
                position:     self.mobility.position(m.body),
            });
        }

        for v in self.visitors {
            if !self.mobility.store.is_active(v.body) {
                continue;
            }
            let (hunger, thirst) = v.session().map_or((0, 0), |s| (s.hunger(), s.thirst()));
            rows.push(BodySnapshot {
                agent:        v.body,
                role:         "visitor",
                kind:         "",
                state:        v.state_label(),
                hunger,
                thirst,
                restlessness: 0.0,
                position:     self.mobility.position(v.body),
            });
        }

        rows
    }
}

// ── SimObserver ───────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {} working", stats.working);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with that tick's head counts.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks).
    fn on_snapshot(&mut self, _tick: Tick, _view: &SimView<'_>) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
