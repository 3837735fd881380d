//! The manager state machine.
//!
//! A manager sits in its office and every few seconds considers two
//! independent trials: visit some subordinates, or (only if the first trial
//! failed) call a meeting.  Neither may succeed, in which case it keeps
//! thinking.
//!
//! # Meetings
//!
//! ```text
//! CallMeeting:  free room? ──no──► GoingToOffice
//!                  │ yes
//!               claim room, take a seat ──no seat──► release room, GoingToOffice
//!                  │
//!               invite every subordinate; accepted ones form `invited`
//!                  ▼
//!             GoingToMeeting ──arrive──► all invited arrived? ──yes──► InMeeting
//!                                              │ no                      │ EndMeeting
//!                                       WaitingToStartMeeting ──poll──┘  ▼
//!                                                         release invited, free room,
//!                                                         GoingToOffice
//! ```

use tracing::{debug, trace};

use ot_core::{AgentId, ManagerId, Point, RoomId, WorkerId};
use ot_schedule::{AgentTimer, TimerHandle};

use crate::{Ctx, Worker};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ManagerState {
    GoingToOffice,
    InOffice,
    CheckingOnSubordinates,
    GoingToMeeting,
    WaitingToStartMeeting,
    InMeeting,
}

impl ManagerState {
    pub fn as_str(self) -> &'static str {
        match self {
            ManagerState::GoingToOffice          => "GoingToOffice",
            ManagerState::InOffice               => "InOffice",
            ManagerState::CheckingOnSubordinates => "CheckingOnSubordinates",
            ManagerState::GoingToMeeting         => "GoingToMeeting",
            ManagerState::WaitingToStartMeeting  => "WaitingToStartMeeting",
            ManagerState::InMeeting              => "InMeeting",
        }
    }
}

#[derive(Debug)]
pub struct Manager {
    pub id:     ManagerId,
    pub body:   AgentId,
    pub office: Point,
    subordinates: Vec<WorkerId>,

    pub(crate) state: ManagerState,
    room:        Option<RoomId>,
    invited:     Vec<WorkerId>,
    checks_left: u32,
    visiting:    Option<WorkerId>,
    holding:     bool,
    /// Think / MeetingPoll / EndMeeting / FinishCheckIn.
    pub(crate) timer: Option<TimerHandle>,
    /// FollowSubordinate.
    follow:      Option<TimerHandle>,
    meetings_started: u32,
}

impl Manager {
    pub fn new(id: ManagerId, body: AgentId, office: Point, subordinates: Vec<WorkerId>) -> Self {
        Self {
            id,
            body,
            office,
            subordinates,
            state: ManagerState::GoingToOffice,
            room: None,
            invited: Vec::new(),
            checks_left: 0,
            visiting: None,
            holding: false,
            timer: None,
            follow: None,
            meetings_started: 0,
        }
    }

    pub fn start(&mut self, ctx: &mut Ctx<'_>) {
        self.go_to_office(ctx);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn subordinates(&self) -> &[WorkerId] {
        &self.subordinates
    }

    /// Subordinates who accepted the current meeting.
    pub fn invited(&self) -> &[WorkerId] {
        &self.invited
    }

    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    pub fn visiting(&self) -> Option<WorkerId> {
        self.visiting
    }

    /// How many meetings this manager has started so far.
    pub fn meetings_started(&self) -> u32 {
        self.meetings_started
    }

    // ── Events ────────────────────────────────────────────────────────────

    pub fn on_arrival(&mut self, ctx: &mut Ctx<'_>) {
        match self.state {
            ManagerState::GoingToOffice => {
                let here = ctx.position(self.body);
                if here.within_sq(self.office, ctx.tuning.office_radius_sq) {
                    self.set_state(ManagerState::InOffice);
                    self.think_later(ctx);
                }
            }
            ManagerState::CheckingOnSubordinates if !self.holding => {
                let here = ctx.position(self.body);
                let target = ctx.mover.destination(self.body);
                if here.within_sq(target, ctx.tuning.check_in_radius_sq) {
                    ctx.cancel(&mut self.follow);
                    self.holding = true;
                    let secs = ctx.tuning.check_in_hold_secs;
                    ctx.schedule(&mut self.timer, self.body, AgentTimer::FinishCheckIn, secs);
                }
            }
            ManagerState::GoingToMeeting => {
                if self.meeting_can_start(ctx) {
                    self.start_meeting(ctx);
                } else {
                    self.set_state(ManagerState::WaitingToStartMeeting);
                    let secs = ctx.tuning.meeting_poll_secs;
                    ctx.schedule(&mut self.timer, self.body, AgentTimer::MeetingPoll, secs);
                }
            }
            _ => trace!(manager = %self.id, state = self.state.as_str(), "arrival ignored"),
        }
    }

    pub fn on_timer(
        &mut self,
        handle:  TimerHandle,
        kind:    AgentTimer,
        workers: &mut [Worker],
        ctx:     &mut Ctx<'_>,
    ) {
        let slot = if kind == AgentTimer::FollowSubordinate { &mut self.follow } else { &mut self.timer };
        if *slot != Some(handle) {
            trace!(manager = %self.id, ?kind, "stale timer");
            return;
        }
        *slot = None;

        match (kind, self.state) {
            (AgentTimer::Think, ManagerState::InOffice) => self.think(workers, ctx),
            (AgentTimer::FollowSubordinate, ManagerState::CheckingOnSubordinates) => {
                self.follow_subordinate(workers, ctx);
            }
            (AgentTimer::FinishCheckIn, ManagerState::CheckingOnSubordinates) => {
                self.holding = false;
                self.checks_left = self.checks_left.saturating_sub(1);
                if self.checks_left == 0 {
                    self.go_to_office(ctx);
                } else {
                    self.pick_subordinate(workers, ctx);
                }
            }
            (AgentTimer::MeetingPoll, ManagerState::WaitingToStartMeeting) => {
                if self.meeting_can_start(ctx) {
                    self.start_meeting(ctx);
                } else {
                    let secs = ctx.tuning.meeting_poll_secs;
                    ctx.schedule(&mut self.timer, self.body, AgentTimer::MeetingPoll, secs);
                }
            }
            (AgentTimer::EndMeeting, ManagerState::InMeeting) => self.end_meeting(workers, ctx),
            (kind, state) => {
                trace!(manager = %self.id, ?kind, state = state.as_str(), "timer no longer applies");
            }
        }
    }

    // ── Office ────────────────────────────────────────────────────────────

    pub fn go_to_office(&mut self, ctx: &mut Ctx<'_>) {
        ctx.cancel(&mut self.timer);
        ctx.cancel(&mut self.follow);
        self.visiting = None;
        self.holding = false;
        self.set_state(ManagerState::GoingToOffice);
        ctx.walk(self.body, self.office);
    }

    fn think_later(&mut self, ctx: &mut Ctx<'_>) {
        let secs = ctx.tuning.think.sample(ctx.rngs.get_mut(self.body));
        ctx.schedule(&mut self.timer, self.body, AgentTimer::Think, secs);
    }

    /// Two independent draws: the meeting trial only runs when the check-in
    /// trial fails.
    fn think(&mut self, workers: &mut [Worker], ctx: &mut Ctx<'_>) {
        let (check_on, call_meeting) = (ctx.tuning.check_on_chance, ctx.tuning.call_meeting_chance);
        let rng = ctx.rngs.get_mut(self.body);
        if rng.draw() <= check_on {
            self.check_on_subordinates(workers, ctx);
        } else if rng.draw() <= call_meeting {
            self.call_meeting(workers, ctx);
        } else {
            self.think_later(ctx);
        }
    }

    // ── Checking on subordinates ──────────────────────────────────────────

    fn check_on_subordinates(&mut self, workers: &[Worker], ctx: &mut Ctx<'_>) {
        if self.subordinates.is_empty() {
            self.think_later(ctx);
            return;
        }
        let (lo, hi) = (ctx.tuning.check_count_min, ctx.tuning.check_count_max);
        self.checks_left = ctx.rngs.get_mut(self.body).gen_range(lo..hi);
        self.set_state(ManagerState::CheckingOnSubordinates);
        self.pick_subordinate(workers, ctx);
    }

    fn pick_subordinate(&mut self, workers: &[Worker], ctx: &mut Ctx<'_>) {
        let Some(&target) = ctx.rngs.get_mut(self.body).choose(&self.subordinates) else {
            self.go_to_office(ctx);
            return;
        };
        debug!(manager = %self.id, worker = %target, left = self.checks_left, "checking on subordinate");
        self.visiting = Some(target);
        self.holding = false;
        self.follow_subordinate(workers, ctx);
    }

    /// Re-target the subordinate's current position and keep following.
    fn follow_subordinate(&mut self, workers: &[Worker], ctx: &mut Ctx<'_>) {
        let Some(worker) = self.visiting.and_then(|w| workers.get(w.index())) else {
            self.go_to_office(ctx);
            return;
        };
        let there = ctx.position(worker.body);
        ctx.walk(self.body, there);
        let secs = ctx.tuning.follow_refresh_secs;
        ctx.schedule(&mut self.follow, self.body, AgentTimer::FollowSubordinate, secs);
    }

    // ── Meetings ──────────────────────────────────────────────────────────

    /// Book a room and invite the whole roster.  Falls back to the office if
    /// no room is free or the manager cannot get a seat in it.
    pub fn call_meeting(&mut self, workers: &mut [Worker], ctx: &mut Ctx<'_>) {
        let Some(room_id) = ctx.facilities.free_meeting_room() else {
            debug!(manager = %self.id, "no free meeting room");
            self.go_to_office(ctx);
            return;
        };
        let rng = ctx.rngs.get_mut(self.body);
        let Some(room) = ctx.facilities.room_mut(room_id) else {
            self.go_to_office(ctx);
            return;
        };
        if !room.claim(self.id) {
            self.go_to_office(ctx);
            return;
        }
        let Some(seat) = room.acquire_seat(rng).and_then(|s| room.seat_position(s)) else {
            debug!(manager = %self.id, room = %room_id, "no seat for the host");
            room.release();
            self.go_to_office(ctx);
            return;
        };

        ctx.cancel(&mut self.timer);
        self.room = Some(room_id);
        self.set_state(ManagerState::GoingToMeeting);
        ctx.walk(self.body, seat);

        self.invited.clear();
        for &id in &self.subordinates {
            let Some(worker) = workers.get_mut(id.index()) else { continue };
            match worker.go_to_meeting(room_id, ctx) {
                Ok(_) => self.invited.push(id),
                Err(refusal) => debug!(manager = %self.id, worker = %id, %refusal, "invitation refused"),
            }
        }
        if let Some(room) = ctx.facilities.room_mut(room_id) {
            room.set_invited(self.invited.len());
        }
        debug!(manager = %self.id, room = %room_id, invited = self.invited.len(), "meeting called");
    }

    fn meeting_can_start(&self, ctx: &Ctx<'_>) -> bool {
        self.room
            .and_then(|r| ctx.facilities.room(r))
            .is_some_and(|room| room.arrived() == self.invited.len())
    }

    fn start_meeting(&mut self, ctx: &mut Ctx<'_>) {
        self.set_state(ManagerState::InMeeting);
        self.meetings_started += 1;
        let secs = ctx.tuning.meeting_length.sample(ctx.rngs.get_mut(self.body));
        ctx.schedule(&mut self.timer, self.body, AgentTimer::EndMeeting, secs);
    }

    fn end_meeting(&mut self, workers: &mut [Worker], ctx: &mut Ctx<'_>) {
        for id in std::mem::take(&mut self.invited) {
            if let Some(worker) = workers.get_mut(id.index()) {
                worker.return_to_work(ctx);
            }
        }
        if let Some(room) = self.room.take() {
            if let Some(room) = ctx.facilities.room_mut(room) {
                room.release();
            }
        }
        self.go_to_office(ctx);
    }

    fn set_state(&mut self, next: ManagerState) {
        if self.state != next {
            debug!(manager = %self.id, from = self.state.as_str(), to = next.as_str(), "manager state");
        }
        self.state = next;
    }
}
