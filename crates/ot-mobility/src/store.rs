//! The `MobilityStore` — per-body movement state indexed by `AgentId`.

use ot_core::{AgentId, Point};

use crate::{MobilityError, MobilityResult, MovementState};

/// Holds movement state for every body.
///
/// The `states` vector is indexed by `AgentId` and never shrinks; despawned
/// bodies keep their slot with `active = false` so ids stay stable.
pub struct MobilityStore {
    pub states: Vec<MovementState>,
}

impl MobilityStore {
    /// `count` bodies standing at the origin with `speed`.
    pub fn new(count: usize, speed: f32) -> Self {
        Self {
            states: vec![MovementState::stationary(Point::ORIGIN, speed); count],
        }
    }

    fn state_mut(&mut self, agent: AgentId) -> MobilityResult<&mut MovementState> {
        self.states
            .get_mut(agent.index())
            .ok_or(MobilityError::UnknownAgent(agent))
    }

    /// Teleport `agent` to `at` and stop it there.
    pub fn place(&mut self, agent: AgentId, at: Point) -> MobilityResult<()> {
        let state = self.state_mut(agent)?;
        state.position = at;
        state.destination = at;
        state.moving = false;
        state.active = true;
        Ok(())
    }

    /// Override the walking speed of one body.
    pub fn set_speed(&mut self, agent: AgentId, speed: f32) -> MobilityResult<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(MobilityError::InvalidSpeed(speed));
        }
        self.state_mut(agent)?.speed = speed;
        Ok(())
    }

    /// Remove `agent` from the floor.  Its slot is kept.
    pub fn despawn(&mut self, agent: AgentId) -> MobilityResult<()> {
        let state = self.state_mut(agent)?;
        state.active = false;
        state.moving = false;
        Ok(())
    }

    #[inline]
    pub fn is_active(&self, agent: AgentId) -> bool {
        self.states.get(agent.index()).is_some_and(|s| s.active)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
