//! Floor plan: the fixed points and areas the state machines walk between.
//!
//! [`FloorPlan`] is the plain description a host fills in; [`Layout`] is the
//! same data after it has been checked against a [`Facilities`] instance.
//! The state machines only ever see a `Layout`, so every id it hands out is
//! known to resolve and every list it samples from is non-empty.

use std::collections::BTreeSet;

use ot_core::{AgentRng, LineId, Point, SeatingId, StationId};
use ot_spatial::DestinationArea;

use crate::{Facilities, FacilityError, FacilityResult, LinePurpose};

/// A named counter in the cafeteria, served through its own line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoodStation {
    pub id:   StationId,
    pub name: String,
    pub line: LineId,
}

/// Unvalidated floor-plan description.
#[derive(Clone, Debug)]
pub struct FloorPlan {
    pub cafeteria_entrance:  Point,
    pub cafeteria_exit:      Point,
    pub waiting_area:        DestinationArea,
    pub snack_area:          DestinationArea,
    pub drink_area:          DestinationArea,
    pub food_stations:       Vec<FoodStation>,
    pub payment_line:        LineId,
    pub cafeteria_seating:   SeatingId,
    pub break_drink_points:  Vec<Point>,
    pub break_room:          DestinationArea,
    pub outside_areas:       Vec<DestinationArea>,
    /// Security rounds.  May be empty if nobody patrols.
    pub patrol_waypoints:    Vec<Point>,
    /// Warehouse drop points.  May be empty if nobody hauls.
    pub transport_waypoints: Vec<Point>,
}

/// A validated [`FloorPlan`].
#[derive(Clone, Debug)]
pub struct Layout {
    plan: FloorPlan,
}

impl Layout {
    /// Check `plan` against `facilities`.
    ///
    /// Fails if a required list is empty, a station is unnamed or repeated, or
    /// a line or seating id does not resolve to an instance of the right kind.
    pub fn new(plan: FloorPlan, facilities: &Facilities) -> FacilityResult<Self> {
        if plan.food_stations.is_empty() {
            return Err(FacilityError::EmptyRegistry("food stations"));
        }
        if plan.break_drink_points.is_empty() {
            return Err(FacilityError::EmptyRegistry("break-room drink points"));
        }
        if plan.outside_areas.is_empty() {
            return Err(FacilityError::EmptyRegistry("outside areas"));
        }
        let mut seen = BTreeSet::new();
        for station in &plan.food_stations {
            if station.name.trim().is_empty() {
                return Err(FacilityError::UnnamedStation(station.id));
            }
            if !seen.insert(station.id) {
                return Err(FacilityError::DuplicateStation(station.id));
            }
            expect_line(facilities, station.line, LinePurpose::Food)?;
        }
        expect_line(facilities, plan.payment_line, LinePurpose::Payment)?;
        if facilities.seating(plan.cafeteria_seating).is_none() {
            return Err(FacilityError::UnknownSeating(plan.cafeteria_seating));
        }
        Ok(Self { plan })
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    // ── Fixed points ──────────────────────────────────────────────────────

    pub fn cafeteria_entrance(&self) -> Point {
        self.plan.cafeteria_entrance
    }

    pub fn cafeteria_exit(&self) -> Point {
        self.plan.cafeteria_exit
    }

    pub fn payment_line(&self) -> LineId {
        self.plan.payment_line
    }

    pub fn cafeteria_seating(&self) -> SeatingId {
        self.plan.cafeteria_seating
    }

    pub fn station(&self, id: StationId) -> Option<&FoodStation> {
        self.plan.food_stations.iter().find(|s| s.id == id)
    }

    pub fn break_room(&self) -> &DestinationArea {
        &self.plan.break_room
    }

    pub fn has_patrol_route(&self) -> bool {
        !self.plan.patrol_waypoints.is_empty()
    }

    pub fn has_transport_route(&self) -> bool {
        !self.plan.transport_waypoints.is_empty()
    }

    // ── Random selection ──────────────────────────────────────────────────

    pub fn random_food_station(&self, rng: &mut AgentRng) -> &FoodStation {
        let i = rng.index(self.plan.food_stations.len()).unwrap_or(0);
        &self.plan.food_stations[i]
    }

    pub fn random_break_drink_point(&self, rng: &mut AgentRng) -> Point {
        let i = rng.index(self.plan.break_drink_points.len()).unwrap_or(0);
        self.plan.break_drink_points[i]
    }

    pub fn random_break_room_point(&self, rng: &mut AgentRng) -> Point {
        self.plan.break_room.sample(rng)
    }

    /// Index of a uniformly chosen outside area.
    pub fn random_outside_area(&self, rng: &mut AgentRng) -> usize {
        rng.index(self.plan.outside_areas.len()).unwrap_or(0)
    }

    pub fn outside_area(&self, index: usize) -> Option<&DestinationArea> {
        self.plan.outside_areas.get(index)
    }

    pub fn random_waiting_point(&self, rng: &mut AgentRng) -> Point {
        self.plan.waiting_area.sample(rng)
    }

    pub fn random_snack_point(&self, rng: &mut AgentRng) -> Point {
        self.plan.snack_area.sample(rng)
    }

    pub fn random_drink_point(&self, rng: &mut AgentRng) -> Point {
        self.plan.drink_area.sample(rng)
    }

    pub fn random_patrol_waypoint(&self, rng: &mut AgentRng) -> Option<Point> {
        rng.choose(&self.plan.patrol_waypoints).copied()
    }

    pub fn random_transport_waypoint(&self, rng: &mut AgentRng) -> Option<Point> {
        rng.choose(&self.plan.transport_waypoints).copied()
    }
}

fn expect_line(facilities: &Facilities, id: LineId, expected: LinePurpose) -> FacilityResult<()> {
    let line = facilities.line(id).ok_or(FacilityError::UnknownLine(id))?;
    if line.purpose != expected {
        return Err(FacilityError::WrongLinePurpose { line: id, expected, found: line.purpose });
    }
    Ok(())
}
