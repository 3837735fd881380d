//! `ot-facility` — coordinators for the building's scarce resources.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`seat`]      | `Seat`, `SeatingArea` — exclusive-occupancy seat pool        |
//! | [`line`]      | `Line` — bounded FIFO service queue with overflow admission  |
//! | [`meeting`]   | `MeetingRoom` — seats plus a rendezvous arrival counter      |
//! | [`facilities`]| `Facilities` — owner of every coordinator instance           |
//! | [`layout`]    | `FloorPlan`, `Layout` — validated registry of fixed spots     |
//! | [`error`]     | `FacilityError`, `FacilityResult<T>`                         |
//!
//! # Ownership
//!
//! A coordinator's mutable fields (`taken` flags, occupant lists, arrival
//! counters) are private and change only through its own methods.  Workers
//! and managers hold ids (`SeatId`, `LineId`, `RoomId`) and go through
//! [`Facilities`] to reach the instance.  Every acquisition is a single
//! `&mut self` call, so check-then-set is atomic; a multi-threaded host wraps
//! each instance in its own lock.

pub mod error;
pub mod facilities;
pub mod layout;
pub mod line;
pub mod meeting;
pub mod seat;

#[cfg(test)]
mod tests;

pub use error::{FacilityError, FacilityResult};
pub use facilities::Facilities;
pub use layout::{FloorPlan, FoodStation, Layout};
pub use line::{Admission, Line, LinePurpose, ServiceOutcome};
pub use meeting::MeetingRoom;
pub use seat::{Seat, SeatingArea};
