//! Worker kinds.
//!
//! The three kinds share one state machine and differ only in what "going to
//! work" and "working" mean.  Each kind is a row in a static table of two
//! hooks, looked up by tag:
//!
//! | Kind        | `on_enter_work`                          | `on_work_tick`                                     |
//! |-------------|------------------------------------------|----------------------------------------------------|
//! | `Desk`      | walk to the assigned desk                | first time: roll, check, re-arm `ResumeWork`       |
//! | `Patrol`    | start working at once, pick a waypoint   | new waypoint; on later ticks roll and check        |
//! | `Transport` | start working at once, pick a drop point | new drop point; on later ticks roll and check      |

use tracing::warn;

use ot_schedule::AgentTimer;

use crate::{Ctx, Worker, WorkerState};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorkerKind {
    /// Sits at a fixed desk.
    Desk,
    /// Security guard walking between waypoints.
    Patrol,
    /// Warehouse worker hauling between drop points.
    Transport,
}

/// The per-kind behavior table.
pub struct KindHooks {
    /// Called on every `ReturnToWork`, after the state is set to `GoingToWork`.
    pub on_enter_work: fn(&mut Worker, &mut Ctx<'_>),
    /// Called on arrival while working (`first == false`), on the
    /// `GoingToWork → Working` transition (`first == true`), and when a desk
    /// worker's `ResumeWork` timer fires (`first == true`).
    pub on_work_tick:  fn(&mut Worker, bool, &mut Ctx<'_>),
}

static DESK: KindHooks = KindHooks { on_enter_work: desk_enter_work, on_work_tick: desk_work_tick };
static PATROL: KindHooks = KindHooks { on_enter_work: roam_enter_work, on_work_tick: patrol_work_tick };
static TRANSPORT: KindHooks = KindHooks { on_enter_work: roam_enter_work, on_work_tick: transport_work_tick };

impl WorkerKind {
    pub fn hooks(self) -> &'static KindHooks {
        match self {
            WorkerKind::Desk      => &DESK,
            WorkerKind::Patrol    => &PATROL,
            WorkerKind::Transport => &TRANSPORT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkerKind::Desk      => "desk",
            WorkerKind::Patrol    => "patrol",
            WorkerKind::Transport => "transport",
        }
    }
}

// ── Desk ──────────────────────────────────────────────────────────────────────

fn desk_enter_work(w: &mut Worker, ctx: &mut Ctx<'_>) {
    match w.desk {
        Some(desk) => ctx.walk(w.body, desk),
        None => warn!(worker = %w.id, "desk worker has no desk"),
    }
}

fn desk_work_tick(w: &mut Worker, first: bool, ctx: &mut Ctx<'_>) {
    if !first {
        return;
    }
    w.roll_needs(ctx);
    if !w.check_actions_to_do(ctx) {
        let secs = ctx.tuning.resume_work.sample(ctx.rngs.get_mut(w.body));
        ctx.schedule(&mut w.timer, w.body, AgentTimer::ResumeWork, secs);
    }
}

// ── Patrol / transport ────────────────────────────────────────────────────────

fn roam_enter_work(w: &mut Worker, ctx: &mut Ctx<'_>) {
    w.set_state(WorkerState::Working);
    (w.kind.hooks().on_work_tick)(w, true, ctx);
}

fn patrol_work_tick(w: &mut Worker, first: bool, ctx: &mut Ctx<'_>) {
    match ctx.layout.random_patrol_waypoint(ctx.rngs.get_mut(w.body)) {
        Some(waypoint) => ctx.walk(w.body, waypoint),
        None => warn!(worker = %w.id, "no patrol waypoints"),
    }
    if !first {
        w.roll_needs(ctx);
        w.check_actions_to_do(ctx);
    }
}

fn transport_work_tick(w: &mut Worker, first: bool, ctx: &mut Ctx<'_>) {
    match ctx.layout.random_transport_waypoint(ctx.rngs.get_mut(w.body)) {
        Some(waypoint) => ctx.walk(w.body, waypoint),
        None => warn!(worker = %w.id, "no transport waypoints"),
    }
    if !first {
        w.roll_needs(ctx);
        w.check_actions_to_do(ctx);
    }
}
