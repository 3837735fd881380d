//! Unit tests for ot-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, LineId, SeatId, WorkerId};

    #[test]
    fn index_roundtrip() {
        let id = WorkerId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(WorkerId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn narrow_ids_reject_overflow() {
        assert!(SeatId::try_from(70_000usize).is_err());
        assert_eq!(LineId::try_from(3usize).unwrap(), LineId(3));
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(LineId(1).to_string(), "LineId(1)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn squared_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_sq(b), 25.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn within_radius_is_inclusive() {
        let a = Point::new(1.0, 1.0);
        assert!(a.within_sq(Point::new(3.0, 1.0), 4.0));
        assert!(!a.within_sq(Point::new(3.1, 1.0), 4.0));
    }

    #[test]
    fn step_toward_stops_on_target() {
        let start = Point::new(0.0, 0.0);
        let target = Point::new(10.0, 0.0);
        let mid = start.step_toward(target, 4.0);
        assert!((mid.x - 4.0).abs() < 1e-6);
        assert_eq!(mid.z, 0.0);
        assert_eq!(Point::new(9.0, 0.0).step_toward(target, 4.0), target);
        assert_eq!(target.step_toward(target, 4.0), target);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(5) + 3, Tick(8));
        assert_eq!(Tick(5).offset(2), Tick(7));
        assert_eq!(Tick(9).since(Tick(4)), 5);
        assert_eq!(Tick(4).since(Tick(9)), 0);
    }

    #[test]
    fn seconds_round_up_to_whole_ticks() {
        let clock = SimClock::new(200);
        assert_eq!(clock.ticks_for_secs(1.0), 5);
        assert_eq!(clock.ticks_for_secs(0.21), 2);
        assert_eq!(clock.ticks_for_secs(15.0), 75);
    }

    #[test]
    fn zero_delay_is_still_one_tick() {
        let clock = SimClock::new(200);
        assert_eq!(clock.ticks_for_secs(0.0), 1);
        assert_eq!(clock.after_secs(Tick(10), 0.0), Tick(11));
    }

    #[test]
    fn elapsed_seconds() {
        let mut clock = SimClock::new(200);
        for _ in 0..10 {
            clock.advance();
        }
        assert_eq!(clock.current_tick, Tick(10));
        assert!((clock.elapsed_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn config_validation() {
        let mut config = SimConfig::default();
        assert!(config.validate().is_ok());
        config.tick_duration_ms = 0;
        assert!(config.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, AgentRngs};

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::new(7, AgentId(3));
        let mut b = AgentRng::new(7, AgentId(3));
        for _ in 0..16 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn different_agents_differ() {
        let mut a = AgentRng::new(7, AgentId(0));
        let mut b = AgentRng::new(7, AgentId(1));
        let sa: Vec<f32> = (0..8).map(|_| a.draw()).collect();
        let sb: Vec<f32> = (0..8).map(|_| b.draw()).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn draw_is_unit_interval() {
        let mut r = AgentRng::new(1, AgentId(0));
        for _ in 0..1_000 {
            let d = r.draw();
            assert!((0.0..1.0).contains(&d));
        }
    }

    #[test]
    fn secs_between_handles_empty_range() {
        let mut r = AgentRng::new(1, AgentId(0));
        assert_eq!(r.secs_between(5.0, 5.0), 5.0);
        let s = r.secs_between(10.0, 30.0);
        assert!((10.0..30.0).contains(&s));
    }

    #[test]
    fn index_of_empty_is_none() {
        let mut r = AgentRng::new(1, AgentId(0));
        assert_eq!(r.index(0), None);
        assert!(r.index(3).unwrap() < 3);
    }

    #[test]
    fn agent_rngs_len() {
        let rngs = AgentRngs::new(4, 9);
        assert_eq!(rngs.len(), 4);
        assert!(!rngs.is_empty());
    }
}
