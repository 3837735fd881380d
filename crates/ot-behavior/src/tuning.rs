//! Behavioral constants.
//!
//! Every probability, delay and radius the state machines use lives in
//! [`Tuning`].  `Tuning::default()` reproduces the reference office; a host
//! may override any field (the demo binary reads them from JSON).

use ot_core::AgentRng;

use crate::{BehaviorError, BehaviorResult};

/// A half-open interval of seconds, `[lo, hi)`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecsRange {
    pub lo: f32,
    pub hi: f32,
}

impl SecsRange {
    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub fn sample(&self, rng: &mut AgentRng) -> f32 {
        rng.secs_between(self.lo, self.hi)
    }
}

/// Per-tick odds that a working worker grows one level of each need.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeedOdds {
    pub hunger:       f32,
    pub thirst:       f32,
    pub restlessness: f32,
}

impl NeedOdds {
    pub const fn new(hunger: f32, thirst: f32, restlessness: f32) -> Self {
        Self { hunger, thirst, restlessness }
    }
}

/// How long a seated patron eats: `secs_per_hunger` for every level of
/// hunger it walked in with, plus `thirst_secs` if it was thirsty.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EatRate {
    pub secs_per_hunger: f32,
    pub thirst_secs:     f32,
}

impl EatRate {
    pub fn duration(&self, hunger: u32, thirst: u32) -> f32 {
        let drink = if thirst > 0 { self.thirst_secs } else { 0.0 };
        hunger as f32 * self.secs_per_hunger + drink
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tuning {
    // ── Diversions ────────────────────────────────────────────────────────
    /// `P(cafeteria) = hunger × this`.
    pub hunger_divert_per_level:    f32,
    /// `P(break-room drink) = thirst × this`.
    pub thirst_divert_per_level:    f32,
    /// `P(break) = restlessness × this`.
    pub restless_divert_per_level:  f32,
    /// Share of restless breaks taken in the break room rather than outside.
    pub restless_break_room_chance: f32,

    // ── Need growth per worker kind ───────────────────────────────────────
    pub desk_odds:      NeedOdds,
    pub patrol_odds:    NeedOdds,
    pub transport_odds: NeedOdds,
    /// Desk workers re-roll their needs after this long at the desk.
    pub resume_work:    SecsRange,

    // ── Breaks ────────────────────────────────────────────────────────────
    pub break_room_stay:    SecsRange,
    pub outside_stay:       SecsRange,
    /// Restlessness shed on every wander step during a break.
    pub restlessness_decay: f32,
    pub talk_chance:        f32,
    pub talk_secs:          f32,
    /// Squared distance from the assigned seat that counts as "arrived".
    pub meeting_arrival_radius_sq: f32,

    // ── Cafeteria ─────────────────────────────────────────────────────────
    pub worker_eat:              EatRate,
    pub visitor_eat:             EatRate,
    /// Restlessness a worker sheds by visiting the cafeteria.
    pub cafeteria_restless_relief: f32,
    /// Visitors arrive with hunger drawn from `[min, max)`.
    pub visitor_hunger_min:      u32,
    pub visitor_hunger_max:      u32,
    pub visitor_thirst_chance:   f32,
    pub visitor_stay_chance:     f32,

    // ── Managers ──────────────────────────────────────────────────────────
    pub think:               SecsRange,
    pub check_on_chance:     f32,
    pub call_meeting_chance: f32,
    /// Number of subordinates visited per round, drawn from `[min, max)`.
    pub check_count_min:     u32,
    pub check_count_max:     u32,
    pub follow_refresh_secs: f32,
    pub check_in_radius_sq:  f32,
    pub check_in_hold_secs:  f32,
    pub office_radius_sq:    f32,
    pub meeting_length:      SecsRange,
    pub meeting_poll_secs:   f32,

    // ── Proximity ─────────────────────────────────────────────────────────
    /// Two bodies closer than this are in contact.
    pub contact_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            hunger_divert_per_level:    0.07,
            thirst_divert_per_level:    0.08,
            restless_divert_per_level:  0.1,
            restless_break_room_chance: 0.3,

            desk_odds:      NeedOdds::new(0.1, 0.1, 0.15),
            patrol_odds:    NeedOdds::new(0.15, 0.15, 0.05),
            transport_odds: NeedOdds::new(0.2, 0.2, 0.05),
            resume_work:    SecsRange::new(5.0, 10.0),

            break_room_stay:           SecsRange::new(10.0, 30.0),
            outside_stay:              SecsRange::new(15.0, 40.0),
            restlessness_decay:        0.1,
            talk_chance:               1.0,
            talk_secs:                 15.0,
            meeting_arrival_radius_sq: 4.0,

            worker_eat:                EatRate { secs_per_hunger: 10.0, thirst_secs: 5.0 },
            visitor_eat:               EatRate { secs_per_hunger: 30.0, thirst_secs: 20.0 },
            cafeteria_restless_relief: 2.0,
            visitor_hunger_min:        1,
            visitor_hunger_max:        5,
            visitor_thirst_chance:     0.7,
            visitor_stay_chance:       0.9,

            think:               SecsRange::new(5.0, 10.0),
            check_on_chance:     0.3,
            call_meeting_chance: 0.1,
            check_count_min:     2,
            check_count_max:     4,
            follow_refresh_secs: 0.5,
            check_in_radius_sq:  4.0,
            check_in_hold_secs:  2.0,
            office_radius_sq:    4.0,
            meeting_length:      SecsRange::new(20.0, 30.0),
            meeting_poll_secs:   0.2,

            contact_radius: 1.5,
        }
    }
}

impl Tuning {
    /// Reject values the state machines cannot work with.
    pub fn validate(&self) -> BehaviorResult<()> {
        let chances = [
            ("restless_break_room_chance", self.restless_break_room_chance),
            ("talk_chance", self.talk_chance),
            ("visitor_thirst_chance", self.visitor_thirst_chance),
            ("visitor_stay_chance", self.visitor_stay_chance),
            ("check_on_chance", self.check_on_chance),
            ("call_meeting_chance", self.call_meeting_chance),
        ];
        for (field, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, format!("{p} is not a probability")));
            }
        }

        let ranges = [
            ("resume_work", self.resume_work),
            ("break_room_stay", self.break_room_stay),
            ("outside_stay", self.outside_stay),
            ("think", self.think),
            ("meeting_length", self.meeting_length),
        ];
        for (field, r) in ranges {
            if !(r.lo.is_finite() && r.hi.is_finite() && r.lo >= 0.0 && r.lo <= r.hi) {
                return Err(invalid(field, format!("[{}, {}) is not a valid interval", r.lo, r.hi)));
            }
        }

        let positive = [
            ("talk_secs", self.talk_secs),
            ("follow_refresh_secs", self.follow_refresh_secs),
            ("meeting_poll_secs", self.meeting_poll_secs),
            ("contact_radius", self.contact_radius),
        ];
        for (field, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(invalid(field, format!("{v} must be positive")));
            }
        }

        if self.visitor_hunger_min == 0 || self.visitor_hunger_min >= self.visitor_hunger_max {
            return Err(invalid(
                "visitor_hunger_min",
                format!("[{}, {}) must be a non-empty range above zero", self.visitor_hunger_min, self.visitor_hunger_max),
            ));
        }
        if self.check_count_min == 0 || self.check_count_min >= self.check_count_max {
            return Err(invalid(
                "check_count_min",
                format!("[{}, {}) must be a non-empty range above zero", self.check_count_min, self.check_count_max),
            ));
        }
        Ok(())
    }

    /// Need-growth odds for a worker kind.
    pub fn odds(&self, kind: crate::WorkerKind) -> NeedOdds {
        match kind {
            crate::WorkerKind::Desk      => self.desk_odds,
            crate::WorkerKind::Patrol    => self.patrol_odds,
            crate::WorkerKind::Transport => self.transport_odds,
        }
    }
}

fn invalid(field: &'static str, reason: String) -> BehaviorError {
    BehaviorError::InvalidTuning { field, reason }
}
