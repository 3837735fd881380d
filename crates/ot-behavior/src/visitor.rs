//! Cafeteria visitors.
//!
//! A visitor spawns at the cafeteria entrance with its own appetite, runs a
//! [`CafeteriaSession`], walks to the exit and is gone.

use tracing::{debug, trace};

use ot_core::{AgentId, LineId, VisitorId};
use ot_schedule::{AgentTimer, TimerHandle};

use crate::{CafeteriaSession, Ctx, SessionStep};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VisitorState {
    InCafeteria,
    LeavingCafeteria,
    /// Reached the exit; the body should be removed.
    Departed,
}

impl VisitorState {
    pub fn as_str(self) -> &'static str {
        match self {
            VisitorState::InCafeteria      => "InCafeteria",
            VisitorState::LeavingCafeteria => "LeavingCafeteria",
            VisitorState::Departed         => "Departed",
        }
    }
}

#[derive(Debug)]
pub struct Visitor {
    pub id:         VisitorId,
    pub body:       AgentId,
    state:          VisitorState,
    staying_to_eat: bool,
    session:        Option<CafeteriaSession>,
}

impl Visitor {
    /// Draw an appetite and walk in.
    pub fn spawn(id: VisitorId, body: AgentId, ctx: &mut Ctx<'_>) -> Self {
        let t = ctx.tuning;
        let rng = ctx.rngs.get_mut(body);
        let hunger = rng.gen_range(t.visitor_hunger_min..t.visitor_hunger_max);
        let thirst = u32::from(rng.draw() <= t.visitor_thirst_chance);
        let staying_to_eat = rng.draw() <= t.visitor_stay_chance;
        debug!(visitor = %id, hunger, thirst, staying_to_eat, "visitor arrived");
        let session = CafeteriaSession::begin(body, hunger, thirst, staying_to_eat, t.visitor_eat, ctx);
        Self {
            id,
            body,
            state: VisitorState::InCafeteria,
            staying_to_eat,
            session: Some(session),
        }
    }

    pub fn state(&self) -> VisitorState {
        self.state
    }

    pub fn state_label(&self) -> &'static str {
        match (&self.state, &self.session) {
            (VisitorState::InCafeteria, Some(session)) => session.state().as_str(),
            (state, _) => state.as_str(),
        }
    }

    pub fn session(&self) -> Option<&CafeteriaSession> {
        self.session.as_ref()
    }

    pub fn staying_to_eat(&self) -> bool {
        self.staying_to_eat
    }

    pub fn has_departed(&self) -> bool {
        self.state == VisitorState::Departed
    }

    // ── Events ────────────────────────────────────────────────────────────

    pub fn on_arrival(&mut self, ctx: &mut Ctx<'_>) {
        match self.state {
            VisitorState::InCafeteria => {
                let step = match self.session.as_mut() {
                    Some(session) => session.on_arrival(self.body, ctx),
                    None => SessionStep::Leave,
                };
                self.apply(step, ctx);
            }
            VisitorState::LeavingCafeteria => {
                debug!(visitor = %self.id, "visitor departed");
                self.state = VisitorState::Departed;
            }
            VisitorState::Departed => trace!(visitor = %self.id, "arrival after departure"),
        }
    }

    pub fn on_timer(&mut self, handle: TimerHandle, kind: AgentTimer, ctx: &mut Ctx<'_>) {
        let step = match (kind, self.session.as_mut()) {
            (AgentTimer::LeaveCafeteria, Some(session)) => session.on_timer(handle),
            _ => SessionStep::Stay,
        };
        self.apply(step, ctx);
    }

    pub fn on_wait_over(&mut self, line: LineId) {
        if let Some(session) = self.session.as_mut() {
            session.on_wait_over(self.body, line);
        }
    }

    pub fn on_served(&mut self, line: LineId, ctx: &mut Ctx<'_>) {
        let step = match self.session.as_mut() {
            Some(session) => session.on_served(self.body, line, ctx),
            None => SessionStep::Stay,
        };
        self.apply(step, ctx);
    }

    fn apply(&mut self, step: SessionStep, ctx: &mut Ctx<'_>) {
        if step != SessionStep::Leave {
            return;
        }
        if let Some(mut session) = self.session.take() {
            session.finish(self.body, ctx);
        }
        debug!(visitor = %self.id, "visitor leaving");
        self.state = VisitorState::LeavingCafeteria;
        let exit = ctx.layout.cafeteria_exit();
        ctx.walk(self.body, exit);
    }
}
