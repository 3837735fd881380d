//! Meeting rooms: a seat pool plus a rendezvous barrier.

use tracing::debug;

use ot_core::{AgentRng, ManagerId, Point, RoomId, SeatId};

use crate::{FacilityResult, SeatingArea};

/// A room a manager can book for a meeting.
///
/// The meeting may start once `arrived == invited`.  `arrived` only grows
/// while the room is held and is zeroed by [`release`][Self::release].
#[derive(Debug, Clone)]
pub struct MeetingRoom {
    pub id:   RoomId,
    seats:    SeatingArea,
    taken:    bool,
    arrived:  usize,
    invited:  usize,
    holder:   Option<ManagerId>,
}

impl MeetingRoom {
    pub fn new(id: RoomId, seats: impl IntoIterator<Item = Point>) -> FacilityResult<Self> {
        Ok(Self {
            id,
            seats: SeatingArea::new(seats)?,
            taken: false,
            arrived: 0,
            invited: 0,
            holder: None,
        })
    }

    /// Book the room for `manager`.  Returns `false` if it is already booked.
    pub fn claim(&mut self, manager: ManagerId) -> bool {
        if self.taken {
            return false;
        }
        self.taken = true;
        self.holder = Some(manager);
        self.arrived = 0;
        self.invited = 0;
        debug!(room = %self.id, %manager, "meeting room claimed");
        true
    }

    /// Record how many attendees (excluding the host) accepted.
    pub fn set_invited(&mut self, count: usize) {
        self.invited = count;
    }

    /// An invited attendee has reached their seat.
    pub fn mark_arrived(&mut self) {
        if self.taken {
            self.arrived += 1;
        }
    }

    /// Barrier condition: everyone who accepted has arrived.
    pub fn all_arrived(&self) -> bool {
        self.arrived >= self.invited
    }

    /// Take a seat inside the room.
    pub fn acquire_seat(&mut self, rng: &mut AgentRng) -> Option<SeatId> {
        self.seats.acquire(rng)
    }

    pub fn seat_position(&self, seat: SeatId) -> Option<Point> {
        self.seats.position(seat)
    }

    /// Unbook the room: free every seat and zero the barrier counters.
    pub fn release(&mut self) {
        debug!(room = %self.id, holder = ?self.holder, "meeting room released");
        self.seats.reset();
        self.taken = false;
        self.holder = None;
        self.arrived = 0;
        self.invited = 0;
    }

    #[inline]
    pub fn is_taken(&self) -> bool {
        self.taken
    }

    pub fn holder(&self) -> Option<ManagerId> {
        self.holder
    }

    pub fn arrived(&self) -> usize {
        self.arrived
    }

    pub fn invited(&self) -> usize {
        self.invited
    }

    pub fn seats(&self) -> &SeatingArea {
        &self.seats
    }
}
