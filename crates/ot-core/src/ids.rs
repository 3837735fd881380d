//! Strongly typed, zero-cost identifier wrappers.
//!
//! Entities never hold references to each other; they hold one of these ids
//! and look the target up in its owning collection.  The inner integer is
//! `pub` to allow direct indexing via `id.0 as usize`, but callers should
//! prefer the `.index()` helper.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a moving body (worker, manager or visitor) in the mover's
    /// storage and in `AgentRngs`.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a worker in the simulation's worker collection.
    pub struct WorkerId(u32);
}

typed_id! {
    /// Index of a manager in the simulation's manager collection.
    pub struct ManagerId(u32);
}

typed_id! {
    /// Index of a cafeteria visitor.
    pub struct VisitorId(u32);
}

typed_id! {
    /// Index of a seat inside one `SeatingArea`.
    pub struct SeatId(u16);
}

typed_id! {
    /// Index of a stand-alone seating area (e.g. the cafeteria tables).
    pub struct SeatingId(u16);
}

typed_id! {
    /// Index of a service line.
    pub struct LineId(u16);
}

typed_id! {
    /// Index of a meeting room.
    pub struct RoomId(u16);
}

typed_id! {
    /// Index of a cafeteria food station.
    pub struct StationId(u16);
}
