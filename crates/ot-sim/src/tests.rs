//! Integration tests for ot-sim.

use ot_behavior::{ManagerState, NeedOdds, Needs, SecsRange, Tuning, VisitorState, WorkerState};
use ot_core::{AgentId, LineId, ManagerId, Point, RoomId, SeatingId, SimConfig, StationId, Tick, WorkerId};
use ot_facility::{Facilities, FloorPlan, FoodStation, Line, LinePurpose, MeetingRoom, SeatingArea};
use ot_mobility::Mover;
use ot_spatial::DestinationArea;

use crate::{
    ManagerSpec, NoopObserver, Role, Sim, SimBuilder, SimError, SimObserver, SimView, TickStats,
    WorkerSpec,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const FOOD: LineId = LineId(0);
const PAY: LineId = LineId(1);
const BREAK_SPOT: Point = Point::new(0.0, -5.0);
const EXIT: Point = Point::new(0.0, 5.0);

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_duration_ms:      200,
        total_ticks,
        seed:                  42,
        output_interval_ticks: 5,
    }
}

fn facilities() -> Facilities {
    let mut f = Facilities::new();
    f.add_seating(SeatingArea::new([Point::new(0.0, 20.0), Point::new(1.0, 20.0)]).unwrap())
        .unwrap();
    f.add_line(
        Line::new(FOOD, LinePurpose::Food, Point::new(10.0, 10.0),
            vec![Point::new(10.0, 11.0), Point::new(10.0, 12.0)], 1.0).unwrap(),
    )
    .unwrap();
    f.add_line(
        Line::new(PAY, LinePurpose::Payment, Point::new(-10.0, 10.0),
            vec![Point::new(-10.0, 11.0), Point::new(-10.0, 12.0)], 1.0).unwrap(),
    )
    .unwrap();
    f.add_room(MeetingRoom::new(RoomId(0), (0..4).map(|i| Point::new(20.0, i as f32))).unwrap())
        .unwrap();
    f
}

fn plan() -> FloorPlan {
    FloorPlan {
        cafeteria_entrance:  Point::new(0.0, 10.0),
        cafeteria_exit:      EXIT,
        waiting_area:        DestinationArea::point(Point::new(5.0, 8.0)),
        snack_area:          DestinationArea::point(Point::new(3.0, 10.0)),
        drink_area:          DestinationArea::point(Point::new(4.0, 10.0)),
        food_stations:       vec![FoodStation { id: StationId(0), name: "Soup".into(), line: FOOD }],
        payment_line:        PAY,
        cafeteria_seating:   SeatingId(0),
        break_drink_points:  vec![Point::new(-5.0, 0.0)],
        break_room:          DestinationArea::point(BREAK_SPOT),
        outside_areas:       vec![DestinationArea::point(Point::new(30.0, 30.0))],
        patrol_waypoints:    vec![Point::new(50.0, 0.0)],
        transport_waypoints: vec![Point::new(0.0, 50.0)],
    }
}

/// Nobody grows needs on their own and managers never leave the office.
fn quiet_tuning() -> Tuning {
    let mut t = Tuning::default();
    t.desk_odds = NeedOdds::new(0.0, 0.0, 0.0);
    t.patrol_odds = NeedOdds::new(0.0, 0.0, 0.0);
    t.transport_odds = NeedOdds::new(0.0, 0.0, 0.0);
    t.check_on_chance = 0.0;
    t.call_meeting_chance = 0.0;
    t
}

fn builder(tuning: Tuning) -> SimBuilder {
    SimBuilder::new(test_config(1_000), plan(), facilities()).tuning(tuning)
}

#[derive(Default)]
struct Recorder {
    starts:    usize,
    stats:     Vec<(Tick, TickStats)>,
    snapshots: Vec<(Tick, Vec<AgentId>)>,
    ended:     Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }

    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        self.stats.push((tick, *stats));
    }

    fn on_snapshot(&mut self, tick: Tick, view: &SimView<'_>) {
        self.snapshots.push((tick, view.bodies().iter().map(|b| b.agent).collect()));
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn bodies_are_numbered_workers_managers_visitors() {
        let mut b = builder(quiet_tuning());
        let w = b.add_worker(WorkerSpec::desk(Point::new(4.0, 0.0)).starting_at(Point::ORIGIN));
        let m = b.add_manager(ManagerSpec::in_office(Point::new(0.0, -20.0), vec![w]));
        b.add_visitor(Tick(10));
        let sim = b.build().unwrap();

        assert_eq!(
            sim.roles,
            vec![Role::Worker(w), Role::Manager(m), Role::Visitor(ot_core::VisitorId(0))]
        );
        assert_eq!(sim.floor.mobility.position(AgentId(0)), Point::ORIGIN);
        assert_eq!(sim.floor.mobility.position(AgentId(1)), Point::new(0.0, -20.0));
        assert!(!sim.floor.mobility.store.is_active(AgentId(2)), "visitor not on the floor yet");
        assert!(sim.visitors.is_empty());
    }

    #[test]
    fn build_sends_everyone_off() {
        let mut b = builder(quiet_tuning());
        b.add_worker(WorkerSpec::desk(Point::new(4.0, 0.0)).starting_at(Point::ORIGIN));
        b.add_manager(ManagerSpec {
            start:        Point::new(0.0, -40.0),
            office:       Point::new(0.0, -20.0),
            subordinates: vec![],
        });
        let sim = b.build().unwrap();

        assert_eq!(sim.workers[0].state(), WorkerState::GoingToWork);
        assert_eq!(sim.floor.mobility.destination(AgentId(0)), Point::new(4.0, 0.0));
        assert_eq!(sim.managers[0].state(), ManagerState::GoingToOffice);
        assert_eq!(sim.floor.mobility.destination(AgentId(1)), Point::new(0.0, -20.0));
    }

    #[test]
    fn desk_worker_without_desk_is_rejected() {
        let mut b = builder(quiet_tuning());
        b.add_worker(WorkerSpec { desk: None, ..WorkerSpec::desk(Point::ORIGIN) });
        let err = b.build().err().unwrap();
        assert!(matches!(err, SimError::MissingDesk(WorkerId(0))));
    }

    #[test]
    fn patrol_without_waypoints_is_rejected() {
        let mut p = plan();
        p.patrol_waypoints.clear();
        let mut b = SimBuilder::new(test_config(10), p, facilities());
        b.add_worker(WorkerSpec::desk(Point::ORIGIN));
        b.add_worker(WorkerSpec::patrol(Point::ORIGIN));
        let err = b.build().err().unwrap();
        assert!(matches!(err, SimError::MissingRoute { worker: WorkerId(1), kind: "patrol" }));
    }

    #[test]
    fn shared_subordinate_is_rejected() {
        let mut b = builder(quiet_tuning());
        let w = b.add_worker(WorkerSpec::desk(Point::ORIGIN));
        b.add_manager(ManagerSpec::in_office(Point::new(0.0, -20.0), vec![w]));
        b.add_manager(ManagerSpec::in_office(Point::new(5.0, -20.0), vec![w]));
        let err = b.build().err().unwrap();
        assert!(matches!(
            err,
            SimError::OverlappingRosters { worker: WorkerId(0), first: ManagerId(0), second: ManagerId(1) }
        ));
    }

    #[test]
    fn unknown_subordinate_is_rejected() {
        let mut b = builder(quiet_tuning());
        b.add_manager(ManagerSpec::in_office(Point::new(0.0, -20.0), vec![WorkerId(3)]));
        let err = b.build().err().unwrap();
        assert!(matches!(err, SimError::UnknownSubordinate { manager: ManagerId(0), worker: WorkerId(3) }));
    }

    #[test]
    fn bad_tuning_is_rejected() {
        let mut t = Tuning::default();
        t.talk_chance = 1.5;
        assert!(matches!(builder(t).build().err().unwrap(), SimError::Behavior(_)));
    }

    #[test]
    fn zero_tick_length_is_rejected() {
        let mut config = test_config(10);
        config.tick_duration_ms = 0;
        let err = SimBuilder::new(config, plan(), facilities()).build().err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        let err = builder(quiet_tuning()).walking_speed(0.0).build().err().unwrap();
        assert!(matches!(err, SimError::Mobility(_)));
    }

    #[test]
    fn empty_outside_list_is_rejected() {
        let mut p = plan();
        p.outside_areas.clear();
        let err = SimBuilder::new(test_config(10), p, facilities()).build().err().unwrap();
        assert!(matches!(err, SimError::Facility(_)));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_loop {
    use super::*;

    #[test]
    fn desk_worker_walks_in_and_works() {
        let desk = Point::new(4.0, 0.0);
        let mut b = builder(quiet_tuning());
        b.add_worker(WorkerSpec::desk(desk).starting_at(Point::ORIGIN));
        let mut sim = b.build().unwrap();

        sim.run_ticks(10, &mut NoopObserver).unwrap();
        assert_eq!(sim.workers[0].state(), WorkerState::Working);
        assert_eq!(sim.floor.mobility.position(AgentId(0)), desk);
        assert_eq!(sim.tick_stats().working, 1);
    }

    #[test]
    fn patrol_walks_toward_its_waypoint() {
        let mut b = builder(quiet_tuning());
        b.add_worker(WorkerSpec::patrol(Point::ORIGIN));
        let mut sim = b.build().unwrap();

        sim.run_ticks(10, &mut NoopObserver).unwrap();
        let here = sim.floor.mobility.position(AgentId(0));
        assert!(here.x > 5.0 && here.x < 50.0, "walking east, got {here:?}");
        assert_eq!(sim.workers[0].state(), WorkerState::Working);
    }

    #[test]
    fn observer_sees_every_tick_and_snapshots_on_interval() {
        let mut b = SimBuilder::new(test_config(20), plan(), facilities()).tuning(quiet_tuning());
        b.add_worker(WorkerSpec::desk(Point::new(2.0, 0.0)));
        let mut sim = b.build().unwrap();

        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.starts, 20);
        assert_eq!(rec.stats.len(), 20);
        assert_eq!(rec.stats[0].0, Tick(0));
        let snap_ticks: Vec<Tick> = rec.snapshots.iter().map(|(t, _)| *t).collect();
        assert_eq!(snap_ticks, vec![Tick(0), Tick(5), Tick(10), Tick(15)]);
        assert_eq!(rec.snapshots[0].1, vec![AgentId(0)]);
        assert_eq!(rec.ended, Some(Tick(20)));
        assert_eq!(sim.now(), Tick(20));
    }

    #[test]
    fn zero_interval_disables_snapshots() {
        let mut config = test_config(10);
        config.output_interval_ticks = 0;
        let mut b = SimBuilder::new(config, plan(), facilities()).tuning(quiet_tuning());
        b.add_worker(WorkerSpec::desk(Point::ORIGIN));
        let mut sim = b.build().unwrap();

        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(rec.snapshots.is_empty());
        assert_eq!(rec.stats.len(), 10);
    }

    #[test]
    fn same_seed_same_run() {
        let run = || {
            let mut t = Tuning::default();
            t.call_meeting_chance = 0.5;
            let mut b = builder(t);
            let a = b.add_worker(WorkerSpec::desk(Point::new(-4.0, 0.0)));
            let c = b.add_worker(WorkerSpec::desk(Point::new(4.0, 0.0)));
            b.add_worker(WorkerSpec::transport(Point::ORIGIN));
            b.add_manager(ManagerSpec::in_office(Point::new(0.0, -20.0), vec![a, c]));
            b.add_visitor(Tick(20));
            let mut sim = b.build().unwrap();
            let mut rec = Recorder::default();
            sim.run_ticks(600, &mut rec).unwrap();
            rec.stats
        };
        assert_eq!(run(), run());
    }
}

// ── Visitors ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod visitors {
    use super::*;

    /// One snack, no drink.
    fn snacking_tuning(stay_chance: f32) -> Tuning {
        let mut t = quiet_tuning();
        t.visitor_hunger_min = 1;
        t.visitor_hunger_max = 2;
        t.visitor_thirst_chance = 0.0;
        t.visitor_stay_chance = stay_chance;
        t
    }

    #[test]
    fn visitor_appears_on_its_tick() {
        let mut b = builder(snacking_tuning(0.0));
        b.add_visitor(Tick(3));
        let mut sim = b.build().unwrap();

        sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert!(sim.visitors.is_empty());
        assert!(!sim.floor.mobility.store.is_active(AgentId(0)));

        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.visitors.len(), 1);
        assert_eq!(sim.visitors[0].state(), VisitorState::InCafeteria);
        assert!(sim.floor.mobility.store.is_active(AgentId(0)));
        assert_eq!(sim.tick_stats().in_cafeteria, 1);
    }

    #[test]
    fn passing_visitor_pays_and_departs() {
        let mut b = builder(snacking_tuning(0.0));
        b.add_visitor(Tick(0));
        let mut sim = b.build().unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(400, &mut rec).unwrap();

        let v = &sim.visitors[0];
        assert!(v.has_departed());
        assert_eq!(v.state_label(), "Departed");
        assert!(!sim.floor.mobility.store.is_active(v.body));
        assert_eq!(sim.floor.mobility.position(v.body), EXIT);
        assert!(sim.view().bodies().is_empty(), "departed visitors leave the output");
        assert!(rec.snapshots[0].1.contains(&v.body));
        assert_eq!(sim.tick_stats().in_cafeteria, 0);
        assert!(rec.stats.iter().all(|(_, s)| s.cafeteria_seats_taken == 0), "never sat down");
    }

    #[test]
    fn staying_visitor_takes_a_seat_then_frees_it() {
        let mut b = builder(snacking_tuning(1.0));
        b.add_visitor(Tick(0));
        let mut sim = b.build().unwrap();

        let mut rec = Recorder::default();
        // Snack, pay, 30 s at the table, walk out.
        sim.run_ticks(600, &mut rec).unwrap();

        assert!(rec.stats.iter().any(|(_, s)| s.cafeteria_seats_taken == 1));
        assert!(sim.visitors[0].has_departed());
        assert_eq!(sim.tick_stats().cafeteria_seats_taken, 0);
    }
}

// ── Meetings ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod meetings {
    use super::*;

    #[test]
    fn manager_holds_a_meeting_with_the_roster() {
        let mut t = quiet_tuning();
        t.call_meeting_chance = 1.0;
        let mut b = builder(t);
        let a = b.add_worker(WorkerSpec::desk(Point::new(-4.0, 0.0)));
        let c = b.add_worker(WorkerSpec::desk(Point::new(4.0, 0.0)));
        b.add_manager(ManagerSpec::in_office(Point::new(0.0, -20.0), vec![a, c]));
        let mut sim = b.build().unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(400, &mut rec).unwrap();

        assert!(sim.managers[0].meetings_started() >= 1);
        assert!(
            rec.stats.iter().any(|(_, s)| s.meetings_running == 1 && s.in_meeting == 2),
            "both subordinates seated while the meeting ran"
        );
        // The meeting starts only once everyone invited is seated.
        let first_running = rec.stats.iter().position(|(_, s)| s.meetings_running == 1).unwrap();
        assert_eq!(rec.stats[first_running].1.in_meeting, 2);
    }
}

// ── Contacts ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod contacts {
    use super::*;

    /// Two very restless desk workers who both head straight for the break
    /// room, optionally with a manager walking up to an office beside it.
    /// Worker 1 sits further away, so it is still walking when the two first
    /// come within reach.
    fn break_room_scene(with_manager: bool) -> Sim {
        let mut t = quiet_tuning();
        t.restless_break_room_chance = 1.0;
        t.break_room_stay = SecsRange::new(100.0, 200.0);
        t.talk_secs = 60.0;
        let mut b = builder(t);
        let restless = Needs::new(0, 0, 1_000.0);
        b.add_worker(WorkerSpec::desk(Point::new(-10.0, 0.0)).with_needs(restless));
        b.add_worker(WorkerSpec::desk(Point::new(20.0, 0.0)).with_needs(restless));
        if with_manager {
            b.add_manager(ManagerSpec {
                start:        Point::new(0.0, -75.0),
                office:       Point::new(0.0, -6.0),
                subordinates: vec![],
            });
        }
        b.build().unwrap()
    }

    /// Let both settle in the break room, then pull worker 1 out so that
    /// walking back in is a new contact.
    fn settle_then_step_out(sim: &mut Sim, rec: &mut Recorder) {
        sim.run_ticks(40, rec).unwrap();
        assert_eq!(sim.workers[0].state(), WorkerState::InBreakRoom);
        assert_eq!(sim.workers[1].state(), WorkerState::InBreakRoom);
        assert_eq!(sim.tick_stats().talking, 0, "they met while still walking in");

        let body = sim.workers[1].body;
        sim.floor.mobility.store.place(body, Point::new(0.0, -20.0)).unwrap();
    }

    #[test]
    fn conversation_starts_on_a_fresh_contact() {
        let mut sim = break_room_scene(false);
        let mut rec = Recorder::default();
        settle_then_step_out(&mut sim, &mut rec);

        sim.run_ticks(40, &mut rec).unwrap();
        assert_eq!(sim.workers[0].state(), WorkerState::TalkingToAgent);
        assert_eq!(sim.workers[1].state(), WorkerState::TalkingToAgent);
        assert_eq!(sim.workers[0].partner(), Some(WorkerId(1)));
        assert_eq!(sim.workers[1].partner(), Some(WorkerId(0)));
        assert_eq!(sim.tick_stats().talking, 2);
    }

    #[test]
    fn manager_breaks_up_the_conversation() {
        let mut sim = break_room_scene(true);
        let mut rec = Recorder::default();
        settle_then_step_out(&mut sim, &mut rec);

        sim.run_ticks(70, &mut rec).unwrap();
        let talked = rec.stats.iter().position(|(_, s)| s.talking == 2);
        assert!(talked.is_some(), "the conversation started");
        // Left alone they would talk for 60 s (300 ticks).
        for w in &sim.workers {
            assert_ne!(w.state(), WorkerState::TalkingToAgent);
            assert_eq!(w.partner(), None);
        }
        assert_eq!(sim.managers[0].state(), ManagerState::InOffice);
    }
}
