//! Plain data row types written by output backends.

/// What one body was doing at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub tick:         u64,
    pub agent_id:     u32,
    /// `worker`, `manager` or `visitor`.
    pub role:         &'static str,
    /// Worker kind; empty for managers and visitors.
    pub kind:         &'static str,
    /// State label, or the cafeteria sub-state while in the cafeteria.
    pub state:        &'static str,
    pub hunger:       u32,
    pub thirst:       u32,
    pub restlessness: f32,
    pub x:            f32,
    pub z:            f32,
}

/// Head counts for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:                  u64,
    pub elapsed_secs:          f64,
    pub working:               u64,
    pub in_cafeteria:          u64,
    pub in_meeting:            u64,
    pub talking:               u64,
    pub cafeteria_seats_taken: u64,
    pub meetings_running:      u64,
}
