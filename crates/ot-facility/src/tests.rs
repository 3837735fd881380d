//! Unit tests for ot-facility.

use std::collections::HashMap;

use ot_core::{AgentId, AgentRng, LineId, ManagerId, Point, RoomId, SeatId, SeatingId, SimClock, StationId, Tick};
use ot_schedule::{TimerEvent, TimerQueue};
use ot_spatial::DestinationArea;

use crate::{
    Admission, Facilities, FacilityError, FloorPlan, FoodStation, Layout, Line, LinePurpose,
    MeetingRoom, SeatingArea,
};

fn rng(seed: u64) -> AgentRng {
    AgentRng::new(seed, AgentId(0))
}

fn row(n: usize) -> Vec<Point> {
    (0..n).map(|i| Point::new(i as f32, 0.0)).collect()
}

/// A two-slot line at the origin whose slots run along +x.
fn two_slot_line() -> Line {
    Line::new(
        LineId(0),
        LinePurpose::Food,
        Point::ORIGIN,
        vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0)],
        1.0,
    )
    .unwrap()
}

/// Drain the queue up to `now` and return the handle of the line-service timer.
fn fire_service(timers: &mut TimerQueue, now: Tick) -> ot_schedule::TimerHandle {
    let fired = timers.drain_due(now);
    assert_eq!(fired.len(), 1, "exactly one service timer due");
    assert!(matches!(fired[0].event, TimerEvent::LineService(_)));
    fired[0].handle
}

#[cfg(test)]
mod seating {
    use super::*;

    #[test]
    fn empty_area_is_rejected() {
        let err = SeatingArea::new(Vec::new()).unwrap_err();
        assert!(matches!(err, FacilityError::EmptySeatingArea));
    }

    #[test]
    fn acquires_every_seat_once_then_misses() {
        let mut area = SeatingArea::new(row(4)).unwrap();
        let mut r = rng(1);
        let mut got: Vec<SeatId> = (0..4).filter_map(|_| area.acquire(&mut r)).collect();
        got.sort();
        assert_eq!(got, vec![SeatId(0), SeatId(1), SeatId(2), SeatId(3)]);
        assert_eq!(area.taken_count(), 4);
        assert_eq!(area.acquire(&mut r), None);
    }

    #[test]
    fn release_frees_exactly_that_seat() {
        let mut area = SeatingArea::new(row(3)).unwrap();
        let mut r = rng(2);
        let seats: Vec<SeatId> = (0..3).filter_map(|_| area.acquire(&mut r)).collect();
        assert!(area.release(seats[1]));
        assert!(!area.release(seats[1]), "double release reports false");
        assert_eq!(area.taken_count(), 2);
        assert_eq!(area.acquire(&mut r), Some(seats[1]));
    }

    #[test]
    fn reset_clears_all() {
        let mut area = SeatingArea::new(row(3)).unwrap();
        let mut r = rng(3);
        while area.acquire(&mut r).is_some() {}
        area.reset();
        assert_eq!(area.taken_count(), 0);
    }

    #[test]
    fn probe_wraps_from_random_start() {
        // Only seat 0 is free; any start index must wrap around to it.
        for seed in 0..20 {
            let mut area = SeatingArea::new(row(5)).unwrap();
            let mut r = rng(seed);
            while area.acquire(&mut r).is_some() {}
            area.release(SeatId(0));
            assert_eq!(area.acquire(&mut r), Some(SeatId(0)));
        }
    }

    #[test]
    fn single_seat_two_concurrent_requests() {
        use std::sync::{Arc, Mutex};
        use std::thread;

        let area = Arc::new(Mutex::new(SeatingArea::new(row(1)).unwrap()));
        let handles: Vec<_> = (0..2u32)
            .map(|i| {
                let area = Arc::clone(&area);
                thread::spawn(move || {
                    let mut r = AgentRng::new(7, AgentId(i));
                    area.lock().unwrap().acquire(&mut r)
                })
            })
            .collect();
        let results: Vec<Option<SeatId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_some()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_none()).count(), 1);
        assert_eq!(area.lock().unwrap().taken_count(), 1);
    }
}

#[cfg(test)]
mod line {
    use super::*;

    #[test]
    fn invalid_lines_are_rejected() {
        assert!(matches!(
            Line::new(LineId(3), LinePurpose::Food, Point::ORIGIN, vec![], 1.0),
            Err(FacilityError::NoLineSlots(LineId(3)))
        ));
        assert!(matches!(
            Line::new(LineId(0), LinePurpose::Payment, Point::ORIGIN, row(1), 0.0),
            Err(FacilityError::InvalidServiceTime { .. })
        ));
    }

    #[test]
    fn capacity_two_three_requesters() {
        let clock = SimClock::new(200);
        let mut timers = TimerQueue::new();
        let mut line = two_slot_line();
        let (a, b, c) = (AgentId(1), AgentId(2), AgentId(3));

        assert_eq!(
            line.put_in_line(a, &mut timers, &clock, Tick(0)),
            Admission::Admitted { slot: 0, position: Point::new(1.0, 0.0) }
        );
        assert_eq!(
            line.put_in_line(b, &mut timers, &clock, Tick(0)),
            Admission::Admitted { slot: 1, position: Point::new(2.0, 0.0) }
        );
        assert_eq!(line.put_in_line(c, &mut timers, &clock, Tick(0)), Admission::Full);
        assert_eq!(line.occupants(), &[a, b]);
        assert_eq!(line.overflow(), &[c]);
        assert_eq!(timers.len(), 1, "timer armed once, on the first occupant");

        // 1 s at 200 ms/tick.
        let handle = fire_service(&mut timers, Tick(5));
        let out = line
            .complete_service(handle, |_| Point::new(0.5, 0.5), &mut timers, &clock, Tick(5))
            .unwrap();

        assert_eq!(out.served, a);
        assert_eq!(out.promoted, Some(c));
        assert_eq!(out.moves, vec![(b, Point::new(1.0, 0.0)), (c, Point::new(2.0, 0.0))]);
        assert_eq!(line.slot_of(b), Some(0));
        assert_eq!(line.slot_of(c), Some(1));
        assert!(line.overflow().is_empty());
        assert!(line.is_serving(), "re-armed while occupied");
    }

    #[test]
    fn promotes_the_waiter_nearest_the_entrance() {
        let clock = SimClock::new(200);
        let mut timers = TimerQueue::new();
        let mut line = two_slot_line();
        let ids: Vec<AgentId> = (1..=5).map(AgentId).collect();
        for &id in &ids {
            line.put_in_line(id, &mut timers, &clock, Tick(0));
        }
        // Waiters 3, 4, 5 stand at distances 9, 2, 5 from the entrance.
        let positions: HashMap<AgentId, Point> = [
            (AgentId(3), Point::new(9.0, 0.0)),
            (AgentId(4), Point::new(0.0, 2.0)),
            (AgentId(5), Point::new(-5.0, 0.0)),
        ]
        .into_iter()
        .collect();
        let at = |a: AgentId| positions.get(&a).copied().unwrap_or(Point::ORIGIN);

        let handle = fire_service(&mut timers, Tick(5));
        let out = line.complete_service(handle, at, &mut timers, &clock, Tick(5)).unwrap();
        assert_eq!(out.promoted, Some(AgentId(4)));

        let handle = fire_service(&mut timers, Tick(10));
        let out = line.complete_service(handle, at, &mut timers, &clock, Tick(10)).unwrap();
        assert_eq!(out.served, AgentId(2));
        assert_eq!(out.promoted, Some(AgentId(5)));
        assert_eq!(line.overflow(), &[AgentId(3)]);
    }

    #[test]
    fn equal_distance_keeps_the_earliest_waiter() {
        let clock = SimClock::new(200);
        let mut timers = TimerQueue::new();
        let mut line = two_slot_line();
        for id in 1..=4 {
            line.put_in_line(AgentId(id), &mut timers, &clock, Tick(0));
        }
        let handle = fire_service(&mut timers, Tick(5));
        let out = line
            .complete_service(handle, |_| Point::new(3.0, 4.0), &mut timers, &clock, Tick(5))
            .unwrap();
        assert_eq!(out.promoted, Some(AgentId(3)));
    }

    #[test]
    fn occupants_never_exceed_capacity() {
        let clock = SimClock::new(200);
        let mut timers = TimerQueue::new();
        let mut line = two_slot_line();
        let mut now = Tick(0);
        for id in 0..10 {
            line.put_in_line(AgentId(id), &mut timers, &clock, now);
            assert!(line.occupants().len() <= line.capacity());
        }
        while line.is_serving() {
            now = timers.next_tick().unwrap();
            let handle = fire_service(&mut timers, now);
            line.complete_service(handle, |_| Point::ORIGIN, &mut timers, &clock, now);
            assert!(line.occupants().len() <= line.capacity());
        }
        assert!(line.occupants().is_empty());
        assert!(line.overflow().is_empty());
    }

    #[test]
    fn foreign_handle_is_ignored() {
        let clock = SimClock::new(200);
        let mut timers = TimerQueue::new();
        let mut line = two_slot_line();
        line.put_in_line(AgentId(1), &mut timers, &clock, Tick(0));

        let mut other = None;
        let foreign = timers.schedule(&mut other, Tick(1), TimerEvent::LineService(LineId(9)));
        assert!(line.complete_service(foreign, |_| Point::ORIGIN, &mut timers, &clock, Tick(1)).is_none());
        assert_eq!(line.occupants(), &[AgentId(1)]);
    }
}

#[cfg(test)]
mod meeting_room {
    use super::*;

    #[test]
    fn claim_is_exclusive_until_release() {
        let mut room = MeetingRoom::new(RoomId(0), row(4)).unwrap();
        assert!(room.claim(ManagerId(0)));
        assert!(!room.claim(ManagerId(1)));
        assert_eq!(room.holder(), Some(ManagerId(0)));
        room.release();
        assert!(!room.is_taken());
        assert!(room.claim(ManagerId(1)));
    }

    #[test]
    fn barrier_opens_only_when_all_arrive() {
        let mut room = MeetingRoom::new(RoomId(0), row(6)).unwrap();
        room.claim(ManagerId(0));
        room.set_invited(3);
        assert!(!room.all_arrived());
        room.mark_arrived();
        room.mark_arrived();
        assert!(!room.all_arrived());
        room.mark_arrived();
        assert!(room.all_arrived());
    }

    #[test]
    fn release_resets_seats_and_counters() {
        let mut room = MeetingRoom::new(RoomId(0), row(3)).unwrap();
        let mut r = rng(4);
        room.claim(ManagerId(0));
        room.acquire_seat(&mut r).unwrap();
        room.acquire_seat(&mut r).unwrap();
        room.set_invited(1);
        room.mark_arrived();
        room.release();
        assert_eq!(room.seats().taken_count(), 0);
        assert_eq!(room.arrived(), 0);
        assert_eq!(room.invited(), 0);
    }

    #[test]
    fn arrivals_on_a_free_room_are_ignored() {
        let mut room = MeetingRoom::new(RoomId(0), row(2)).unwrap();
        room.mark_arrived();
        assert_eq!(room.arrived(), 0);
    }
}

#[cfg(test)]
mod facilities {
    use super::*;

    #[test]
    fn free_meeting_room_is_first_by_id() {
        let mut f = Facilities::new();
        for i in 0..3 {
            f.add_room(MeetingRoom::new(RoomId(i), row(2)).unwrap()).unwrap();
        }
        assert_eq!(f.free_meeting_room(), Some(RoomId(0)));
        f.room_mut(RoomId(0)).unwrap().claim(ManagerId(0));
        assert_eq!(f.free_meeting_room(), Some(RoomId(1)));
        f.room_mut(RoomId(1)).unwrap().claim(ManagerId(1));
        f.room_mut(RoomId(2)).unwrap().claim(ManagerId(2));
        assert_eq!(f.free_meeting_room(), None);
        assert_eq!(f.rooms_in_use(), 3);
    }

    #[test]
    fn out_of_order_ids_are_rejected() {
        let mut f = Facilities::new();
        let err = f.add_room(MeetingRoom::new(RoomId(1), row(2)).unwrap()).unwrap_err();
        assert!(matches!(err, FacilityError::IdOutOfOrder { expected: 0, found: 1, .. }));
    }
}

#[cfg(test)]
mod layout {
    use super::*;

    fn facilities() -> Facilities {
        let mut f = Facilities::new();
        f.add_seating(SeatingArea::new(row(4)).unwrap()).unwrap();
        f.add_line(Line::new(LineId(0), LinePurpose::Food, Point::ORIGIN, row(3), 2.0).unwrap())
            .unwrap();
        f.add_line(Line::new(LineId(1), LinePurpose::Payment, Point::ORIGIN, row(3), 2.0).unwrap())
            .unwrap();
        f
    }

    fn plan() -> FloorPlan {
        FloorPlan {
            cafeteria_entrance:  Point::new(0.0, 10.0),
            cafeteria_exit:      Point::new(0.0, 12.0),
            waiting_area:        DestinationArea::new(Point::new(5.0, 10.0), 2.0, 2.0).unwrap(),
            snack_area:          DestinationArea::point(Point::new(3.0, 10.0)),
            drink_area:          DestinationArea::point(Point::new(4.0, 10.0)),
            food_stations:       vec![FoodStation { id: StationId(0), name: "Grill".into(), line: LineId(0) }],
            payment_line:        LineId(1),
            cafeteria_seating:   SeatingId(0),
            break_drink_points:  vec![Point::new(-5.0, 0.0)],
            break_room:          DestinationArea::new(Point::new(-5.0, 0.0), 4.0, 4.0).unwrap(),
            outside_areas:       vec![DestinationArea::new(Point::new(20.0, 20.0), 10.0, 10.0).unwrap()],
            patrol_waypoints:    vec![],
            transport_waypoints: vec![Point::new(8.0, -8.0)],
        }
    }

    #[test]
    fn valid_plan_builds() {
        let layout = Layout::new(plan(), &facilities()).unwrap();
        let mut r = rng(5);
        assert_eq!(layout.random_food_station(&mut r).line, LineId(0));
        assert!(layout.break_room().contains(layout.random_break_room_point(&mut r)));
        assert_eq!(layout.random_patrol_waypoint(&mut r), None);
        assert_eq!(layout.random_transport_waypoint(&mut r), Some(Point::new(8.0, -8.0)));
        assert!(!layout.has_patrol_route());
    }

    #[test]
    fn empty_lists_are_rejected() {
        let mut p = plan();
        p.outside_areas.clear();
        assert!(matches!(
            Layout::new(p, &facilities()),
            Err(FacilityError::EmptyRegistry("outside areas"))
        ));
    }

    #[test]
    fn line_purpose_is_checked() {
        let mut p = plan();
        p.payment_line = LineId(0);
        assert!(matches!(
            Layout::new(p, &facilities()),
            Err(FacilityError::WrongLinePurpose { expected: LinePurpose::Payment, .. })
        ));
        let mut p = plan();
        p.food_stations[0].line = LineId(7);
        assert!(matches!(Layout::new(p, &facilities()), Err(FacilityError::UnknownLine(LineId(7)))));
    }

    #[test]
    fn unnamed_station_is_rejected() {
        let mut p = plan();
        p.food_stations[0].name = "  ".into();
        assert!(matches!(
            Layout::new(p, &facilities()),
            Err(FacilityError::UnnamedStation(StationId(0)))
        ));
    }

    #[test]
    fn repeated_station_id_is_rejected() {
        let mut p = plan();
        p.food_stations.push(FoodStation { id: StationId(0), name: "Salad".into(), line: LineId(0) });
        assert!(matches!(
            Layout::new(p, &facilities()),
            Err(FacilityError::DuplicateStation(StationId(0)))
        ));
    }
}
