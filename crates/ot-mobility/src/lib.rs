//! `ot-mobility` — the mover capability the state machines delegate physical
//! movement to, plus a reference implementation.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`mover`]   | `Mover` trait — `set_destination`, `has_arrived`, `position`      |
//! | [`state`]   | `MovementState` — per-body kinematic state                        |
//! | [`store`]   | `MobilityStore` — `Vec<MovementState>` indexed by `AgentId`       |
//! | [`engine`]  | `MobilityEngine` — straight-line movement at constant speed       |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                              |
//!
//! # Movement model
//!
//! Navigation meshes and obstacle avoidance are outside this workspace.  The
//! reference engine walks each body in a straight line toward its destination
//! at its own speed and snaps it onto the destination once it is within the
//! stopping distance.  Arrival is *level-triggered*: a body standing on its
//! destination reports `has_arrived() == true` on every poll until it is given
//! somewhere new to go.

pub mod engine;
pub mod error;
pub mod mover;
pub mod state;
pub mod store;


pub use engine::MobilityEngine;
pub use error::{MobilityError, MobilityResult};
pub use mover::Mover;
pub use state::MovementState;
pub use store::MobilityStore;
