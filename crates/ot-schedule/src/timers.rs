//! `TimerQueue` — sparse per-tick queue of cancellable one-shot timers.
//!
//! `BTreeMap` gives O(log W) insert and pop where W is the number of distinct
//! future ticks with at least one pending timer.  Cancellation is O(1): the
//! handle is dropped from the live set and the stale entry is skipped when
//! its tick is drained.

use std::collections::{BTreeMap, HashSet};

use ot_core::Tick;

use crate::TimerEvent;

/// Opaque identity of one scheduled timer.  Never reused within a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// A timer that came due, as returned by [`TimerQueue::drain_due`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub event:  TimerEvent,
    /// The tick the timer was scheduled for.
    pub due:    Tick,
}

/// A priority queue mapping ticks → timers due at that tick.
#[derive(Default)]
pub struct TimerQueue {
    inner:       BTreeMap<Tick, Vec<(TimerHandle, TimerEvent)>>,
    live:        HashSet<TimerHandle>,
    next_handle: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at tick `at`, storing its handle in `slot`.
    ///
    /// Any timer already held in `slot` is cancelled first, so a slot never
    /// refers to more than one pending timer.
    pub fn schedule(
        &mut self,
        slot:  &mut Option<TimerHandle>,
        at:    Tick,
        event: TimerEvent,
    ) -> TimerHandle {
        self.cancel(slot);
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.inner.entry(at).or_default().push((handle, event));
        self.live.insert(handle);
        *slot = Some(handle);
        handle
    }

    /// Cancel the timer held in `slot` (if any) and clear the slot.
    ///
    /// Returns `true` if a still-pending timer was cancelled.
    pub fn cancel(&mut self, slot: &mut Option<TimerHandle>) -> bool {
        match slot.take() {
            Some(handle) => self.live.remove(&handle),
            None => false,
        }
    }

    /// `true` while `handle` is scheduled and has neither fired nor been
    /// cancelled.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Remove and return every live timer due at or before `now`, ordered by
    /// due tick and then by scheduling order.
    pub fn drain_due(&mut self, now: Tick) -> Vec<FiredTimer> {
        let mut fired = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > now {
                break;
            }
            let due = *entry.key();
            for (handle, event) in entry.remove() {
                if self.live.remove(&handle) {
                    fired.push(FiredTimer { handle, event, due });
                }
            }
        }
        fired
    }

    /// The earliest tick holding a live timer, or `None` if nothing is pending.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner
            .iter()
            .find(|(_, timers)| timers.iter().any(|(h, _)| self.live.contains(h)))
            .map(|(tick, _)| *tick)
    }

    /// Number of pending (live) timers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
