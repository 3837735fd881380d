//! `Facilities` — owner of every coordinator instance.

use ot_core::{LineId, RoomId, SeatingId};

use crate::{FacilityError, FacilityResult, Line, MeetingRoom, SeatingArea};

/// Every seat pool, line and meeting room in the building, indexed by id.
///
/// Ids are dense: the value returned by each `add_*` is the index of the new
/// instance.
#[derive(Debug, Default)]
pub struct Facilities {
    seating: Vec<SeatingArea>,
    lines:   Vec<Line>,
    rooms:   Vec<MeetingRoom>,
}

impl Facilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_seating(&mut self, area: SeatingArea) -> FacilityResult<SeatingId> {
        let id = SeatingId::try_from(self.seating.len())
            .map_err(|_| FacilityError::TooMany("seating areas"))?;
        self.seating.push(area);
        Ok(id)
    }

    /// Add a line.  Its `id` must equal the next free line id.
    pub fn add_line(&mut self, line: Line) -> FacilityResult<LineId> {
        if line.id.index() != self.lines.len() {
            return Err(FacilityError::IdOutOfOrder {
                kind:     "line",
                expected: self.lines.len(),
                found:    line.id.index(),
            });
        }
        let id = line.id;
        self.lines.push(line);
        Ok(id)
    }

    /// Add a meeting room.  Its `id` must equal the next free room id.
    pub fn add_room(&mut self, room: MeetingRoom) -> FacilityResult<RoomId> {
        if room.id.index() != self.rooms.len() {
            return Err(FacilityError::IdOutOfOrder {
                kind:     "meeting room",
                expected: self.rooms.len(),
                found:    room.id.index(),
            });
        }
        let id = room.id;
        self.rooms.push(room);
        Ok(id)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn seating(&self, id: SeatingId) -> Option<&SeatingArea> {
        self.seating.get(id.index())
    }

    pub fn seating_mut(&mut self, id: SeatingId) -> Option<&mut SeatingArea> {
        self.seating.get_mut(id.index())
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id.index())
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.lines.get_mut(id.index())
    }

    pub fn room(&self, id: RoomId) -> Option<&MeetingRoom> {
        self.rooms.get(id.index())
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut MeetingRoom> {
        self.rooms.get_mut(id.index())
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn rooms(&self) -> &[MeetingRoom] {
        &self.rooms
    }

    /// First meeting room (by id) that is not booked.
    pub fn free_meeting_room(&self) -> Option<RoomId> {
        self.rooms.iter().find(|r| !r.is_taken()).map(|r| r.id)
    }

    /// Number of rooms currently booked.
    pub fn rooms_in_use(&self) -> usize {
        self.rooms.iter().filter(|r| r.is_taken()).count()
    }
}
