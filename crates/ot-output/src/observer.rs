//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ot_core::{SimClock, SimConfig, Tick};
use ot_sim::{SimObserver, SimView, TickStats};

use crate::row::{AgentSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes body snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    clock:      SimClock,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` to turn ticks
    /// into elapsed seconds.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            clock:      config.make_clock(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        let row = TickSummaryRow {
            tick:                  tick.0,
            elapsed_secs:          self.clock.secs_at(tick),
            working:               stats.working as u64,
            in_cafeteria:          stats.in_cafeteria as u64,
            in_meeting:            stats.in_meeting as u64,
            talking:               stats.talking as u64,
            cafeteria_seats_taken: stats.cafeteria_seats_taken as u64,
            meetings_running:      stats.meetings_running as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, view: &SimView<'_>) {
        let rows: Vec<AgentSnapshotRow> = view
            .bodies()
            .into_iter()
            .map(|b| AgentSnapshotRow {
                tick:         tick.0,
                agent_id:     b.agent.0,
                role:         b.role,
                kind:         b.kind,
                state:        b.state,
                hunger:       b.hunger,
                thirst:       b.thirst,
                restlessness: b.restlessness,
                x:            b.position.x,
                z:            b.position.z,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
