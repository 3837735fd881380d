//! Exclusive-occupancy seat pools.

use tracing::trace;

use ot_core::{AgentRng, Point, SeatId};

use crate::{FacilityError, FacilityResult};

/// One seat: a position and whether somebody holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Seat {
    pub position: Point,
    taken:        bool,
}

impl Seat {
    pub fn new(position: Point) -> Self {
        Self { position, taken: false }
    }

    #[inline]
    pub fn is_taken(&self) -> bool {
        self.taken
    }
}

/// A fixed, ordered pool of seats created once at startup.
///
/// `taken` is `true` exactly while some agent holds the seat: it is set by
/// [`acquire`][Self::acquire] and cleared by [`release`][Self::release] or
/// [`reset`][Self::reset], and nothing else touches it.
#[derive(Debug, Clone)]
pub struct SeatingArea {
    seats: Vec<Seat>,
}

impl SeatingArea {
    pub fn new(positions: impl IntoIterator<Item = Point>) -> FacilityResult<Self> {
        let seats: Vec<Seat> = positions.into_iter().map(Seat::new).collect();
        if seats.is_empty() {
            return Err(FacilityError::EmptySeatingArea);
        }
        if seats.len() > u16::MAX as usize {
            return Err(FacilityError::TooMany("seats"));
        }
        Ok(Self { seats })
    }

    /// Claim a free seat.
    ///
    /// Probing starts at a uniformly random index and walks the pool in order
    /// (wrapping) until it finds a free seat, which is marked taken before
    /// returning.  `None` means every seat is occupied.
    pub fn acquire(&mut self, rng: &mut AgentRng) -> Option<SeatId> {
        let n = self.seats.len();
        let start = rng.index(n)?;
        for i in 0..n {
            let idx = (start + i) % n;
            let seat = &mut self.seats[idx];
            if !seat.taken {
                seat.taken = true;
                trace!(seat = idx, "seat acquired");
                return Some(SeatId(idx as u16));
            }
        }
        None
    }

    /// Give a seat back.  Returns `false` if it was not held (or out of range).
    pub fn release(&mut self, seat: SeatId) -> bool {
        match self.seats.get_mut(seat.index()) {
            Some(s) if s.taken => {
                s.taken = false;
                true
            }
            _ => false,
        }
    }

    /// Free every seat at once.
    pub fn reset(&mut self) {
        for seat in &mut self.seats {
            seat.taken = false;
        }
    }

    pub fn position(&self, seat: SeatId) -> Option<Point> {
        self.seats.get(seat.index()).map(|s| s.position)
    }

    pub fn is_taken(&self, seat: SeatId) -> bool {
        self.seats.get(seat.index()).is_some_and(Seat::is_taken)
    }

    /// Number of seats currently held.
    pub fn taken_count(&self) -> usize {
        self.seats.iter().filter(|s| s.taken).count()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}
