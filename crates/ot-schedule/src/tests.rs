//! Unit tests for ot-schedule.

use ot_core::{AgentId, LineId, Tick};

use crate::{AgentTimer, TimerEvent, TimerQueue};

fn ret(agent: u32) -> TimerEvent {
    TimerEvent::Agent { agent: AgentId(agent), kind: AgentTimer::ReturnToWork }
}

#[cfg(test)]
mod timer_queue {
    use super::*;

    #[test]
    fn fires_at_due_tick_only() {
        let mut q = TimerQueue::new();
        let mut slot = None;
        q.schedule(&mut slot, Tick(5), ret(0));
        assert!(q.drain_due(Tick(4)).is_empty());
        let fired = q.drain_due(Tick(5));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].event, ret(0));
        assert_eq!(fired[0].due, Tick(5));
        assert_eq!(Some(fired[0].handle), slot);
        assert!(q.is_empty());
    }

    #[test]
    fn rescheduling_a_slot_cancels_the_old_timer() {
        let mut q = TimerQueue::new();
        let mut slot = None;
        let first = q.schedule(&mut slot, Tick(3), ret(0));
        let second = q.schedule(&mut slot, Tick(6), ret(0));
        assert_ne!(first, second);
        assert!(!q.is_pending(first));
        assert_eq!(q.len(), 1);

        assert!(q.drain_due(Tick(3)).is_empty(), "stale timer must not fire");
        let fired = q.drain_due(Tick(6));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, second);
    }

    #[test]
    fn cancel_clears_slot() {
        let mut q = TimerQueue::new();
        let mut slot = None;
        q.schedule(&mut slot, Tick(2), ret(1));
        assert!(q.cancel(&mut slot));
        assert!(slot.is_none());
        assert!(!q.cancel(&mut slot), "second cancel is a no-op");
        assert!(q.drain_due(Tick(10)).is_empty());
    }

    #[test]
    fn drain_catches_up_on_skipped_ticks() {
        let mut q = TimerQueue::new();
        let (mut a, mut b, mut c) = (None, None, None);
        q.schedule(&mut a, Tick(1), ret(0));
        q.schedule(&mut b, Tick(2), TimerEvent::LineService(LineId(0)));
        q.schedule(&mut c, Tick(9), ret(2));
        let fired = q.drain_due(Tick(4));
        let events: Vec<TimerEvent> = fired.iter().map(|f| f.event).collect();
        assert_eq!(events, vec![ret(0), TimerEvent::LineService(LineId(0))]);
        assert_eq!(q.next_tick(), Some(Tick(9)));
    }

    #[test]
    fn same_tick_keeps_scheduling_order() {
        let mut q = TimerQueue::new();
        let mut slots = [None, None, None];
        for (i, slot) in slots.iter_mut().enumerate() {
            q.schedule(slot, Tick(1), ret(i as u32));
        }
        let agents: Vec<TimerEvent> = q.drain_due(Tick(1)).into_iter().map(|f| f.event).collect();
        assert_eq!(agents, vec![ret(0), ret(1), ret(2)]);
    }

    #[test]
    fn next_tick_skips_cancelled_entries() {
        let mut q = TimerQueue::new();
        let (mut a, mut b) = (None, None);
        q.schedule(&mut a, Tick(1), ret(0));
        q.schedule(&mut b, Tick(7), ret(1));
        q.cancel(&mut a);
        assert_eq!(q.next_tick(), Some(Tick(7)));
        q.cancel(&mut b);
        assert_eq!(q.next_tick(), None);
    }
}
