//! Worker needs.

use ot_core::AgentRng;

use crate::NeedOdds;

/// Accumulated discomfort.  All three levels are non-negative.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Needs {
    pub hunger:       u32,
    pub thirst:       u32,
    pub restlessness: f32,
}

impl Needs {
    pub fn new(hunger: u32, thirst: u32, restlessness: f32) -> Self {
        Self { hunger, thirst, restlessness: restlessness.max(0.0) }
    }

    /// One independent Bernoulli trial per need; each success adds a level.
    pub fn roll(&mut self, odds: &NeedOdds, rng: &mut AgentRng) {
        if rng.draw() < odds.hunger {
            self.hunger += 1;
        }
        if rng.draw() < odds.thirst {
            self.thirst += 1;
        }
        if rng.draw() < odds.restlessness {
            self.restlessness += 1.0;
        }
    }

    /// Shed `amount` restlessness.  Returns `true` once it has reached zero.
    pub fn decay_restlessness(&mut self, amount: f32) -> bool {
        self.restlessness -= amount;
        if self.restlessness <= 0.0 {
            self.restlessness = 0.0;
            true
        } else {
            false
        }
    }

    pub fn quench(&mut self) {
        self.thirst = self.thirst.saturating_sub(1);
    }
}
