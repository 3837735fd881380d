//! `ot-schedule` — delayed, cancellable callbacks keyed to an entity.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`event`]   | `TimerEvent`, `AgentTimer` — what fires                    |
//! | [`timers`]  | `TimerQueue` (`BTreeMap<Tick, Vec<..>>`), `TimerHandle`    |
//!
//! # Handle model
//!
//! Every entity keeps one `Option<TimerHandle>` field per timer purpose
//! (a worker's pending "return to work", a line's next service, …).
//! Scheduling always goes through [`TimerQueue::schedule`], which cancels
//! whatever handle is already in that field before inserting the new one.
//! When a timer fires, the owner compares the fired handle with the one in
//! its field; a mismatch means the timer went stale and the event is dropped.

pub mod event;
pub mod timers;

#[cfg(test)]
mod tests;

pub use event::{AgentTimer, TimerEvent};
pub use timers::{FiredTimer, TimerHandle, TimerQueue};
