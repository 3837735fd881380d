//! Straight-line reference mover.

use ot_core::{AgentId, Point};

use crate::{MobilityStore, Mover};

/// Default walking speed in units per second.
pub const DEFAULT_SPEED: f32 = 3.5;

/// Default stopping distance in units.
pub const DEFAULT_STOPPING_DISTANCE: f32 = 0.1;

/// Walks every active body toward its destination at constant speed.
///
/// A body whose remaining distance drops to `stopping_distance` or below is
/// snapped onto its destination and stopped.
pub struct MobilityEngine {
    pub store:             MobilityStore,
    pub stopping_distance: f32,
}

impl MobilityEngine {
    pub fn new(agent_count: usize) -> Self {
        Self {
            store:             MobilityStore::new(agent_count, DEFAULT_SPEED),
            stopping_distance: DEFAULT_STOPPING_DISTANCE,
        }
    }

    pub fn with_speed(agent_count: usize, speed: f32) -> Self {
        Self {
            store:             MobilityStore::new(agent_count, speed),
            stopping_distance: DEFAULT_STOPPING_DISTANCE,
        }
    }

    /// `true` if `agent` is currently walking.
    #[inline]
    pub fn is_moving(&self, agent: AgentId) -> bool {
        self.store.states[agent.index()].moving
    }

    /// Positions of every active body, in id order.
    pub fn active_positions(&self) -> impl Iterator<Item = (AgentId, Point)> + '_ {
        self.store
            .states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (AgentId(i as u32), s.position))
    }
}

impl Mover for MobilityEngine {
    fn set_destination(&mut self, agent: AgentId, to: Point) {
        let stop_sq = self.stopping_distance * self.stopping_distance;
        let state = &mut self.store.states[agent.index()];
        state.destination = to;
        state.moving = state.position.distance_sq(to) > stop_sq;
        if !state.moving {
            state.position = to;
        }
    }

    fn has_arrived(&self, agent: AgentId) -> bool {
        let state = &self.store.states[agent.index()];
        state.active
            && !state.moving
            && state.remaining_sq() <= self.stopping_distance * self.stopping_distance
    }

    fn position(&self, agent: AgentId) -> Point {
        self.store.states[agent.index()].position
    }

    fn destination(&self, agent: AgentId) -> Point {
        self.store.states[agent.index()].destination
    }

    fn advance(&mut self, dt_secs: f32) {
        let stop = self.stopping_distance;
        for state in self.store.states.iter_mut().filter(|s| s.active && s.moving) {
            let next = state.position.step_toward(state.destination, state.speed * dt_secs);
            state.position = next;
            if next.distance_sq(state.destination) <= stop * stop {
                state.position = state.destination;
                state.moving = false;
            }
        }
    }
}
