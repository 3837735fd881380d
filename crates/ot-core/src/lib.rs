//! `ot-core` — foundational types for the `office_twin` simulation.
//!
//! This crate is a dependency of every other `ot-*` crate.  It has no `ot-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `WorkerId`, `ManagerId`, `VisitorId`, facility ids |
//! | [`geo`]         | `Point` on the floor plane, squared distances               |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                             |
//! | [`rng`]         | `AgentRng` (per-agent), `AgentRngs`                         |
//! | [`error`]       | `OtError`, `OtResult`                                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{OtError, OtResult};
pub use geo::Point;
pub use ids::{AgentId, LineId, ManagerId, RoomId, SeatId, SeatingId, StationId, VisitorId, WorkerId};
pub use rng::{AgentRng, AgentRngs};
pub use time::{SimClock, SimConfig, Tick};
