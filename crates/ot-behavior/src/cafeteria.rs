//! The cafeteria sub-machine.
//!
//! A [`CafeteriaSession`] runs from the moment a patron walks in until it
//! decides to leave.  Workers embed one while diverted to eat; visitors embed
//! one for their whole life.  The owner decides what "leaving" means, so
//! every handler here returns a [`SessionStep`] instead of acting on it.
//!
//! # Item acquisition
//!
//! After entering and after every item, the next step is chosen fresh:
//!
//! ```text
//! hunger ≥ 2     →  random food station, queue for an entrée   (hunger −2)
//! hunger == 1    →  snack counter, no queue                    (hunger −1)
//! thirst > 0     →  drink counter, no queue                    (thirst = 0)
//! otherwise      →  payment line, then a seat (or leave)
//! ```
//!
//! Hunger and thirst only ever go down, so the sequence always ends at the
//! payment line.

use tracing::{debug, trace, warn};

use ot_core::{AgentId, LineId, Point, SeatId, StationId};
use ot_facility::{Admission, LinePurpose};
use ot_schedule::{AgentTimer, TimerHandle};

use crate::{Ctx, EatRate};

pub const SNACK_ITEM: &str = "Snack";
pub const DRINK_ITEM: &str = "Drink";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CafeteriaState {
    EnteringCafeteria,
    /// Walking to a line's entrance to ask for admission.
    CheckingLine,
    WaitingForFood,
    WaitingToPay,
    InLineForFood,
    InLineToPay,
    ObtainingSnack,
    ObtainingDrink,
    MovingToSeat,
    Eating,
}

impl CafeteriaState {
    pub fn as_str(self) -> &'static str {
        match self {
            CafeteriaState::EnteringCafeteria => "EnteringCafeteria",
            CafeteriaState::CheckingLine      => "CheckingLine",
            CafeteriaState::WaitingForFood    => "WaitingForFood",
            CafeteriaState::WaitingToPay      => "WaitingToPay",
            CafeteriaState::InLineForFood     => "InLineForFood",
            CafeteriaState::InLineToPay       => "InLineToPay",
            CafeteriaState::ObtainingSnack    => "ObtainingSnack",
            CafeteriaState::ObtainingDrink    => "ObtainingDrink",
            CafeteriaState::MovingToSeat      => "MovingToSeat",
            CafeteriaState::Eating            => "Eating",
        }
    }

    fn waiting_for(purpose: LinePurpose) -> Self {
        match purpose {
            LinePurpose::Food    => CafeteriaState::WaitingForFood,
            LinePurpose::Payment => CafeteriaState::WaitingToPay,
        }
    }

    fn in_line_for(purpose: LinePurpose) -> Self {
        match purpose {
            LinePurpose::Food    => CafeteriaState::InLineForFood,
            LinePurpose::Payment => CafeteriaState::InLineToPay,
        }
    }
}

/// What the owner should do after a session handler returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionStep {
    Stay,
    Leave,
}

#[derive(Debug)]
pub struct CafeteriaSession {
    state:          CafeteriaState,
    initial_hunger: u32,
    initial_thirst: u32,
    hunger:         u32,
    thirst:         u32,
    staying_to_eat: bool,
    eat:            EatRate,
    items:          Vec<String>,
    line:           Option<LineId>,
    station:        Option<StationId>,
    seat:           Option<SeatId>,
    timer:          Option<TimerHandle>,
}

impl CafeteriaSession {
    /// Walk in with the given needs and head for the entrance.
    pub fn begin(
        body:           AgentId,
        hunger:         u32,
        thirst:         u32,
        staying_to_eat: bool,
        eat:            EatRate,
        ctx:            &mut Ctx<'_>,
    ) -> Self {
        let entrance = ctx.layout.cafeteria_entrance();
        ctx.walk(body, entrance);
        debug!(%body, hunger, thirst, staying_to_eat, "entering cafeteria");
        Self {
            state: CafeteriaState::EnteringCafeteria,
            initial_hunger: hunger,
            initial_thirst: thirst,
            hunger,
            thirst,
            staying_to_eat,
            eat,
            items: Vec::new(),
            line: None,
            station: None,
            seat: None,
            timer: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> CafeteriaState {
        self.state
    }

    pub fn hunger(&self) -> u32 {
        self.hunger
    }

    pub fn thirst(&self) -> u32 {
        self.thirst
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Items obtained so far, one per line, or `None` if there are none.
    pub fn items_label(&self) -> String {
        if self.items.is_empty() {
            "None".to_owned()
        } else {
            self.items.join("\n")
        }
    }

    pub fn seat(&self) -> Option<SeatId> {
        self.seat
    }

    pub fn line(&self) -> Option<LineId> {
        self.line
    }

    /// Seconds this patron will spend eating once seated.
    pub fn eating_secs(&self) -> f32 {
        self.eat.duration(self.initial_hunger, self.initial_thirst)
    }

    // ── Events ────────────────────────────────────────────────────────────

    pub fn on_arrival(&mut self, body: AgentId, ctx: &mut Ctx<'_>) -> SessionStep {
        match self.state {
            CafeteriaState::EnteringCafeteria => self.choose_next_item(body, ctx),
            CafeteriaState::CheckingLine => self.ask_for_admission(body, ctx),
            CafeteriaState::WaitingForFood | CafeteriaState::WaitingToPay => {
                let spot = ctx.layout.random_waiting_point(ctx.rngs.get_mut(body));
                ctx.walk(body, spot);
                SessionStep::Stay
            }
            CafeteriaState::ObtainingSnack => {
                self.hunger = self.hunger.saturating_sub(1);
                self.items.push(SNACK_ITEM.to_owned());
                self.choose_next_item(body, ctx)
            }
            CafeteriaState::ObtainingDrink => {
                self.thirst = 0;
                self.items.push(DRINK_ITEM.to_owned());
                self.choose_next_item(body, ctx)
            }
            CafeteriaState::MovingToSeat => {
                self.set_state(body, CafeteriaState::Eating);
                let secs = self.eating_secs();
                ctx.schedule(&mut self.timer, body, AgentTimer::LeaveCafeteria, secs);
                SessionStep::Stay
            }
            CafeteriaState::InLineForFood | CafeteriaState::InLineToPay | CafeteriaState::Eating => {
                trace!(%body, state = self.state.as_str(), "arrival ignored");
                SessionStep::Stay
            }
        }
    }

    /// The line promoted this patron out of its overflow list.
    pub fn on_wait_over(&mut self, body: AgentId, line: LineId) {
        if self.line != Some(line) {
            return;
        }
        let next = match self.state {
            CafeteriaState::WaitingForFood => CafeteriaState::InLineForFood,
            CafeteriaState::WaitingToPay   => CafeteriaState::InLineToPay,
            _ => return,
        };
        self.set_state(body, next);
    }

    /// The line finished serving this patron.
    pub fn on_served(&mut self, body: AgentId, line: LineId, ctx: &mut Ctx<'_>) -> SessionStep {
        if self.line != Some(line) {
            warn!(%body, %line, "served by a line it was not queued in");
            return SessionStep::Stay;
        }
        self.line = None;
        match self.state {
            CafeteriaState::InLineForFood => {
                self.hunger = self.hunger.saturating_sub(2);
                if let Some(station) = self.station.take().and_then(|id| ctx.layout.station(id)) {
                    self.items.push(station.name.clone());
                }
                self.choose_next_item(body, ctx)
            }
            CafeteriaState::InLineToPay => self.find_seat(body, ctx),
            other => {
                warn!(%body, state = other.as_str(), "served outside a line state");
                SessionStep::Stay
            }
        }
    }

    /// A `LeaveCafeteria` timer fired.
    pub fn on_timer(&mut self, handle: TimerHandle) -> SessionStep {
        if self.timer != Some(handle) || self.state != CafeteriaState::Eating {
            return SessionStep::Stay;
        }
        self.timer = None;
        SessionStep::Leave
    }

    /// Give back the seat (if any) and drop any pending timer.  Returns the
    /// residual `(hunger, thirst)` the patron did not get to satisfy.
    pub fn finish(&mut self, body: AgentId, ctx: &mut Ctx<'_>) -> (u32, u32) {
        ctx.cancel(&mut self.timer);
        if let Some(seat) = self.seat.take() {
            let seating = ctx.layout.cafeteria_seating();
            if let Some(area) = ctx.facilities.seating_mut(seating) {
                area.release(seat);
            }
        }
        debug!(%body, items = self.items.len(), "leaving cafeteria");
        (self.hunger, self.thirst)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn choose_next_item(&mut self, body: AgentId, ctx: &mut Ctx<'_>) -> SessionStep {
        if self.hunger >= 2 {
            let station = ctx.layout.random_food_station(ctx.rngs.get_mut(body));
            let (station_id, line) = (station.id, station.line);
            self.station = Some(station_id);
            self.head_for_line(body, line, ctx);
        } else if self.hunger == 1 {
            let spot = ctx.layout.random_snack_point(ctx.rngs.get_mut(body));
            self.set_state(body, CafeteriaState::ObtainingSnack);
            ctx.walk(body, spot);
        } else if self.thirst > 0 {
            let spot = ctx.layout.random_drink_point(ctx.rngs.get_mut(body));
            self.set_state(body, CafeteriaState::ObtainingDrink);
            ctx.walk(body, spot);
        } else {
            let line = ctx.layout.payment_line();
            self.head_for_line(body, line, ctx);
        }
        SessionStep::Stay
    }

    fn head_for_line(&mut self, body: AgentId, line: LineId, ctx: &mut Ctx<'_>) {
        let entrance = ctx
            .facilities
            .line(line)
            .map_or_else(|| ctx.layout.cafeteria_entrance(), |l| l.entrance);
        self.line = Some(line);
        self.set_state(body, CafeteriaState::CheckingLine);
        ctx.walk(body, entrance);
    }

    fn ask_for_admission(&mut self, body: AgentId, ctx: &mut Ctx<'_>) -> SessionStep {
        let Some(id) = self.line else {
            return self.choose_next_item(body, ctx);
        };
        let Some(line) = ctx.facilities.line_mut(id) else {
            warn!(%body, line = %id, "line vanished; leaving");
            return SessionStep::Leave;
        };
        let purpose = line.purpose;
        match line.put_in_line(body, ctx.timers, ctx.clock, ctx.now) {
            Admission::Admitted { position, .. } => {
                self.set_state(body, CafeteriaState::in_line_for(purpose));
                ctx.walk(body, position);
            }
            Admission::Full => {
                self.set_state(body, CafeteriaState::waiting_for(purpose));
                let spot = ctx.layout.random_waiting_point(ctx.rngs.get_mut(body));
                ctx.walk(body, spot);
            }
        }
        SessionStep::Stay
    }

    fn find_seat(&mut self, body: AgentId, ctx: &mut Ctx<'_>) -> SessionStep {
        if !self.staying_to_eat {
            return SessionStep::Leave;
        }
        let seating = ctx.layout.cafeteria_seating();
        let rng = ctx.rngs.get_mut(body);
        let claimed: Option<(SeatId, Point)> = ctx.facilities.seating_mut(seating).and_then(|area| {
            let seat = area.acquire(rng)?;
            area.position(seat).map(|p| (seat, p))
        });
        match claimed {
            Some((seat, position)) => {
                self.seat = Some(seat);
                self.set_state(body, CafeteriaState::MovingToSeat);
                ctx.walk(body, position);
                SessionStep::Stay
            }
            None => {
                debug!(%body, "no free cafeteria seat");
                SessionStep::Leave
            }
        }
    }

    fn set_state(&mut self, body: AgentId, next: CafeteriaState) {
        debug!(%body, from = self.state.as_str(), to = next.as_str(), "cafeteria state");
        self.state = next;
    }
}
