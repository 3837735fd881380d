//! The worker state machine.
//!
//! ```text
//!            ┌──────────── ReturnToWork ◄──────────────────────────┐
//!            ▼                                                     │
//!      GoingToWork ──arrive──► Working ──CheckActionsToDo──┬─► Cafeteria
//!                                                          ├─► GoingToBreakRoom ─► InBreakRoom
//!                                                          └─► GoingOutside ─────► Outside
//!
//!      InBreakRoom / Outside ──contact──► TalkingToAgent
//!      any but Cafeteria     ──invite───► GoingToMeeting ─► InMeeting
//! ```
//!
//! A worker owns a single timer slot.  Every timer it arms (`ReturnToWork`,
//! `ResumeWork`) belongs to the state it was armed in, and
//! [`return_to_work`][Worker::return_to_work] and
//! [`go_to_meeting`][Worker::go_to_meeting] cancel it, so a timer that fires
//! after the worker moved on finds its handle no longer in the slot.  The
//! cafeteria session keeps its own slot for `LeaveCafeteria`.

use tracing::{debug, trace};

use ot_core::{AgentId, LineId, Point, RoomId, SeatId, WorkerId};
use ot_schedule::{AgentTimer, TimerHandle};

use crate::{CafeteriaSession, Ctx, MeetingRefusal, Needs, SessionStep, WorkerKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WorkerState {
    GoingToWork,
    Working,
    GoingToBreakRoom,
    InBreakRoom,
    GoingOutside,
    Outside,
    TalkingToAgent,
    GoingToMeeting,
    InMeeting,
    Cafeteria,
}

impl WorkerState {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkerState::GoingToWork      => "GoingToWork",
            WorkerState::Working          => "Working",
            WorkerState::GoingToBreakRoom => "GoingToBreakRoom",
            WorkerState::InBreakRoom      => "InBreakRoom",
            WorkerState::GoingOutside     => "GoingOutside",
            WorkerState::Outside          => "Outside",
            WorkerState::TalkingToAgent   => "TalkingToAgent",
            WorkerState::GoingToMeeting   => "GoingToMeeting",
            WorkerState::InMeeting        => "InMeeting",
            WorkerState::Cafeteria        => "Cafeteria",
        }
    }
}

/// The seat a worker was given for a meeting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeetingSeat {
    pub room:     RoomId,
    pub seat:     SeatId,
    pub position: Point,
}

#[derive(Debug)]
pub struct Worker {
    pub id:   WorkerId,
    /// The body this worker moves and draws randomness through.
    pub body: AgentId,
    pub kind: WorkerKind,
    /// Fixed work spot; required for `WorkerKind::Desk`.
    pub desk: Option<Point>,
    pub needs: Needs,

    pub(crate) state:        WorkerState,
    pub(crate) timer:        Option<TimerHandle>,
    pub(crate) partner:      Option<WorkerId>,
    pub(crate) meeting:      Option<MeetingSeat>,
    pub(crate) outside_area: usize,
    pub(crate) cafeteria:    Option<CafeteriaSession>,
}

impl Worker {
    pub fn new(id: WorkerId, body: AgentId, kind: WorkerKind, desk: Option<Point>) -> Self {
        Self {
            id,
            body,
            kind,
            desk,
            needs: Needs::default(),
            state: WorkerState::GoingToWork,
            timer: None,
            partner: None,
            meeting: None,
            outside_area: 0,
            cafeteria: None,
        }
    }

    pub fn with_needs(mut self, needs: Needs) -> Self {
        self.needs = needs;
        self
    }

    /// Head to work for the first time.
    pub fn start(&mut self, ctx: &mut Ctx<'_>) {
        self.return_to_work(ctx);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Presentation label: the worker state, or the cafeteria sub-state while
    /// in the cafeteria.
    pub fn state_label(&self) -> &'static str {
        match (&self.state, &self.cafeteria) {
            (WorkerState::Cafeteria, Some(session)) => session.state().as_str(),
            (state, _) => state.as_str(),
        }
    }

    pub fn partner(&self) -> Option<WorkerId> {
        self.partner
    }

    pub fn meeting_seat(&self) -> Option<MeetingSeat> {
        self.meeting
    }

    pub fn cafeteria(&self) -> Option<&CafeteriaSession> {
        self.cafeteria.as_ref()
    }

    pub fn in_cafeteria(&self) -> bool {
        self.state == WorkerState::Cafeteria
    }

    pub fn is_talking(&self) -> bool {
        self.state == WorkerState::TalkingToAgent
    }

    /// Only workers on a break strike up conversations.
    pub fn can_socialize(&self) -> bool {
        matches!(self.state, WorkerState::InBreakRoom | WorkerState::Outside)
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some()
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Drop whatever the worker is doing and head back to work.
    ///
    /// Cancels any pending timer first, so calling it twice is harmless.
    pub fn return_to_work(&mut self, ctx: &mut Ctx<'_>) {
        ctx.cancel(&mut self.timer);
        self.partner = None;
        self.meeting = None;
        self.set_state(WorkerState::GoingToWork);
        (self.kind.hooks().on_enter_work)(self, ctx);
    }

    /// Diversion policy.  Returns `true` if the worker was diverted.
    ///
    /// Hunger is tried first, then thirst, then restlessness; the first
    /// trial that succeeds wins and the rest are not drawn.
    pub fn check_actions_to_do(&mut self, ctx: &mut Ctx<'_>) -> bool {
        if matches!(
            self.state,
            WorkerState::InMeeting | WorkerState::GoingToMeeting | WorkerState::Cafeteria
        ) {
            return false;
        }
        let t = ctx.tuning;

        if self.needs.hunger > 0 {
            let p = self.needs.hunger as f32 * t.hunger_divert_per_level;
            if ctx.rngs.get_mut(self.body).draw() < p {
                self.enter_cafeteria(ctx);
                return true;
            }
        }
        if self.needs.thirst > 0 {
            let p = self.needs.thirst as f32 * t.thirst_divert_per_level;
            if ctx.rngs.get_mut(self.body).draw() < p {
                ctx.cancel(&mut self.timer);
                self.set_state(WorkerState::GoingToBreakRoom);
                let spot = ctx.layout.random_break_drink_point(ctx.rngs.get_mut(self.body));
                ctx.walk(self.body, spot);
                return true;
            }
        }
        if self.needs.restlessness > 0.0 {
            let p = self.needs.restlessness * t.restless_divert_per_level;
            let rng = ctx.rngs.get_mut(self.body);
            if rng.draw() < p {
                ctx.timers.cancel(&mut self.timer);
                if rng.draw() <= t.restless_break_room_chance {
                    self.set_state(WorkerState::GoingToBreakRoom);
                    let spot = ctx.layout.random_break_room_point(rng);
                    ctx.walk(self.body, spot);
                } else {
                    self.set_state(WorkerState::GoingOutside);
                    self.outside_area = ctx.layout.random_outside_area(rng);
                    let spot = self.outside_spot(ctx);
                    ctx.walk(self.body, spot);
                }
                return true;
            }
        }
        false
    }

    /// A manager asks this worker to a meeting in `room`.
    ///
    /// Refused without any state change while in the cafeteria or when the
    /// room has no free seat.  On success the seat is held until the room is
    /// released.
    pub fn go_to_meeting(&mut self, room: RoomId, ctx: &mut Ctx<'_>) -> Result<SeatId, MeetingRefusal> {
        if self.state == WorkerState::Cafeteria {
            return Err(MeetingRefusal::InCafeteria);
        }
        let rng = ctx.rngs.get_mut(self.body);
        let meeting_room = ctx.facilities.room_mut(room).ok_or(MeetingRefusal::NoSeat(room))?;
        let seat = meeting_room.acquire_seat(rng).ok_or(MeetingRefusal::NoSeat(room))?;
        let position = meeting_room.seat_position(seat).ok_or(MeetingRefusal::NoSeat(room))?;

        ctx.cancel(&mut self.timer);
        self.partner = None;
        self.meeting = Some(MeetingSeat { room, seat, position });
        self.set_state(WorkerState::GoingToMeeting);
        ctx.walk(self.body, position);
        Ok(seat)
    }

    /// Start a conversation with `partner`.  Both sides call this.
    pub(crate) fn talk_to(&mut self, partner: WorkerId, ctx: &mut Ctx<'_>) {
        self.partner = Some(partner);
        self.set_state(WorkerState::TalkingToAgent);
        ctx.halt(self.body);
        let secs = ctx.tuning.talk_secs;
        ctx.schedule(&mut self.timer, self.body, AgentTimer::ReturnToWork, secs);
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// The mover reports this worker stopped at its destination.
    pub fn on_arrival(&mut self, ctx: &mut Ctx<'_>) {
        match self.state {
            WorkerState::GoingToWork => {
                self.set_state(WorkerState::Working);
                (self.kind.hooks().on_work_tick)(self, true, ctx);
            }
            WorkerState::Working => (self.kind.hooks().on_work_tick)(self, false, ctx),
            WorkerState::GoingToBreakRoom => {
                self.set_state(WorkerState::InBreakRoom);
                self.wander_break_room(ctx);
                self.needs.quench();
                let secs = ctx.tuning.break_room_stay.sample(ctx.rngs.get_mut(self.body));
                ctx.schedule(&mut self.timer, self.body, AgentTimer::ReturnToWork, secs);
            }
            WorkerState::InBreakRoom => {
                self.wander_break_room(ctx);
                self.wind_down(ctx);
            }
            WorkerState::GoingOutside => {
                self.set_state(WorkerState::Outside);
                let secs = ctx.tuning.outside_stay.sample(ctx.rngs.get_mut(self.body));
                ctx.schedule(&mut self.timer, self.body, AgentTimer::ReturnToWork, secs);
                let spot = self.outside_spot(ctx);
                ctx.walk(self.body, spot);
            }
            WorkerState::Outside => {
                let spot = self.outside_spot(ctx);
                ctx.walk(self.body, spot);
                self.wind_down(ctx);
            }
            WorkerState::GoingToMeeting => {
                let Some(seat) = self.meeting else { return };
                let here = ctx.position(self.body);
                if here.within_sq(seat.position, ctx.tuning.meeting_arrival_radius_sq) {
                    self.set_state(WorkerState::InMeeting);
                    if let Some(room) = ctx.facilities.room_mut(seat.room) {
                        room.mark_arrived();
                    }
                }
            }
            WorkerState::Cafeteria => {
                let step = match self.cafeteria.as_mut() {
                    Some(session) => session.on_arrival(self.body, ctx),
                    None => SessionStep::Leave,
                };
                if step == SessionStep::Leave {
                    self.leave_cafeteria(ctx);
                }
            }
            WorkerState::TalkingToAgent | WorkerState::InMeeting => {
                trace!(worker = %self.id, state = self.state.as_str(), "arrival ignored");
            }
        }
    }

    /// One of this worker's timers fired.
    pub fn on_timer(&mut self, handle: TimerHandle, kind: AgentTimer, ctx: &mut Ctx<'_>) {
        if kind == AgentTimer::LeaveCafeteria {
            let step = match self.cafeteria.as_mut() {
                Some(session) => session.on_timer(handle),
                None => SessionStep::Stay,
            };
            if step == SessionStep::Leave {
                self.leave_cafeteria(ctx);
            } else {
                trace!(worker = %self.id, "stale LeaveCafeteria");
            }
            return;
        }
        if self.timer != Some(handle) {
            trace!(worker = %self.id, ?kind, "stale timer");
            return;
        }
        self.timer = None;
        match (kind, self.state) {
            (
                AgentTimer::ReturnToWork,
                WorkerState::InBreakRoom | WorkerState::Outside | WorkerState::TalkingToAgent,
            ) => self.return_to_work(ctx),
            (AgentTimer::ResumeWork, WorkerState::Working) => {
                (self.kind.hooks().on_work_tick)(self, true, ctx);
            }
            (kind, state) => {
                trace!(worker = %self.id, ?kind, state = state.as_str(), "timer no longer applies");
            }
        }
    }

    /// A line this worker was waiting beside let it in.
    pub fn on_wait_over(&mut self, line: LineId) {
        if let Some(session) = self.cafeteria.as_mut() {
            session.on_wait_over(self.body, line);
        }
    }

    /// A line finished serving this worker.
    pub fn on_served(&mut self, line: LineId, ctx: &mut Ctx<'_>) {
        let step = match self.cafeteria.as_mut() {
            Some(session) => session.on_served(self.body, line, ctx),
            None => return,
        };
        if step == SessionStep::Leave {
            self.leave_cafeteria(ctx);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    pub(crate) fn set_state(&mut self, next: WorkerState) {
        if self.state != next {
            debug!(worker = %self.id, from = self.state.as_str(), to = next.as_str(), "worker state");
        }
        self.state = next;
    }

    pub(crate) fn roll_needs(&mut self, ctx: &mut Ctx<'_>) {
        let odds = ctx.tuning.odds(self.kind);
        self.needs.roll(&odds, ctx.rngs.get_mut(self.body));
    }

    fn enter_cafeteria(&mut self, ctx: &mut Ctx<'_>) {
        ctx.cancel(&mut self.timer);
        self.set_state(WorkerState::Cafeteria);
        let eat = ctx.tuning.worker_eat;
        self.cafeteria = Some(CafeteriaSession::begin(
            self.body,
            self.needs.hunger,
            self.needs.thirst,
            true,
            eat,
            ctx,
        ));
    }

    fn leave_cafeteria(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(mut session) = self.cafeteria.take() {
            let (hunger, thirst) = session.finish(self.body, ctx);
            self.needs.hunger = hunger;
            self.needs.thirst = thirst;
        }
        let relief = ctx.tuning.cafeteria_restless_relief;
        self.needs.restlessness = (self.needs.restlessness - relief).max(0.0);
        self.return_to_work(ctx);
    }

    fn wander_break_room(&mut self, ctx: &mut Ctx<'_>) {
        let spot = ctx.layout.random_break_room_point(ctx.rngs.get_mut(self.body));
        ctx.walk(self.body, spot);
    }

    fn outside_spot(&self, ctx: &mut Ctx<'_>) -> Point {
        match ctx.layout.outside_area(self.outside_area) {
            Some(area) => area.sample(ctx.rngs.get_mut(self.body)),
            None => ctx.position(self.body),
        }
    }

    /// Shed restlessness on a break; head back once it is gone.
    fn wind_down(&mut self, ctx: &mut Ctx<'_>) {
        if self.needs.decay_restlessness(ctx.tuning.restlessness_decay) {
            self.return_to_work(ctx);
        }
    }
}
