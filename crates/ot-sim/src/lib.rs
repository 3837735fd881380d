//! `ot-sim` — tick loop orchestrator for the office_twin simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Visitors  — visitors due this tick appear at the cafeteria door.
//!   ② Movement  — the mover walks every active body for one tick.
//!   ③ Timers    — drain live timers due this tick:
//!                   Agent { agent, kind } → owner.on_timer
//!                   LineService(line)     → line.complete_service, then
//!                                           on_served / on_wait_over / slot moves
//!   ④ Arrivals  — on_arrival for every body stopped at its destination,
//!                 ascending AgentId.
//!   ⑤ Contacts  — R-tree pairs within contact_radius; pairs not in contact
//!                 last tick start a conversation (worker + worker) or break
//!                 one up (manager + worker).
//! ```
//!
//! Everything is single-threaded and deterministic for a given seed.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ot_core::{Point, SimConfig};
//! use ot_sim::{NoopObserver, SimBuilder, WorkerSpec};
//!
//! let mut builder = SimBuilder::new(SimConfig::default(), plan, facilities);
//! builder.add_worker(WorkerSpec::desk(Point::new(2.0, 0.0)));
//! let mut sim = builder.build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::{ManagerSpec, SimBuilder, WorkerSpec};
pub use error::{SimError, SimResult};
pub use observer::{BodySnapshot, NoopObserver, SimObserver, SimView, TickStats};
pub use sim::{Floor, Role, Sim};
