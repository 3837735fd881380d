//! `ot-spatial` — point sampling inside rectangular areas and proximity
//! detection between bodies.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`area`]      | `DestinationArea` — uniform point sampler over a rectangle |
//! | [`proximity`] | `ProximityIndex` (R-tree), `ContactPair`                  |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod area;
pub mod error;
pub mod proximity;


pub use area::DestinationArea;
pub use error::{SpatialError, SpatialResult};
pub use proximity::{ContactPair, ProximityIndex};
