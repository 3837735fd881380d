//! `ot-behavior` — the state machines that drive every person in the office.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`context`]   | `Ctx<'a>` — everything a state machine may touch during a call  |
//! | [`tuning`]    | `Tuning`, `NeedOdds`, `SecsRange`, `EatRate` — every constant    |
//! | [`needs`]     | `Needs` — hunger, thirst, restlessness                          |
//! | [`kind`]      | `WorkerKind` and its `{on_enter_work, on_work_tick}` hook table |
//! | [`worker`]    | `Worker`, `WorkerState` — the generic worker state machine      |
//! | [`cafeteria`] | `CafeteriaSession` — the embedded cafeteria sub-machine         |
//! | [`social`]    | conversation start and manager interruption between workers     |
//! | [`manager`]   | `Manager`, `ManagerState` — oversight and meeting orchestration |
//! | [`visitor`]   | `Visitor` — a patron who only ever exists inside the cafeteria  |
//! | [`error`]     | `BehaviorError`, `MeetingRefusal`, `BehaviorResult<T>`          |
//!
//! # Driving the machines
//!
//! The tick loop in ot-sim owns every entity and calls three kinds of entry
//! point, always with a fresh [`Ctx`]:
//!
//! 1. **Arrival** — `on_arrival` whenever the mover reports the body is
//!    stopped at its destination.  This is level-triggered: a body parked at
//!    its destination reports arrival on every poll, and the handlers are
//!    written for that.
//! 2. **Timers** — `on_timer` with the fired `TimerHandle`.  Each entity keeps
//!    its pending handles in `Option<TimerHandle>` slots; a handle that no
//!    longer matches its slot is stale and ignored.
//! 3. **Coordinator callbacks** — line service and promotion, meeting
//!    invitations and proximity contacts.
//!
//! Entities refer to each other only by id.  Calls that touch two entities
//! (a manager inviting its roster, two workers starting to talk) take the
//! owning slice and borrow one element at a time.

pub mod cafeteria;
pub mod context;
pub mod error;
pub mod kind;
pub mod manager;
pub mod needs;
pub mod social;
pub mod tuning;
pub mod visitor;
pub mod worker;


pub use cafeteria::{CafeteriaSession, CafeteriaState, SessionStep};
pub use context::Ctx;
pub use error::{BehaviorError, BehaviorResult, MeetingRefusal};
pub use kind::{KindHooks, WorkerKind};
pub use manager::{Manager, ManagerState};
pub use needs::Needs;
pub use social::{interrupt_conversation, start_conversation};
pub use tuning::{EatRate, NeedOdds, SecsRange, Tuning};
pub use visitor::{Visitor, VisitorState};
pub use worker::{Worker, WorkerState};
