//! DTOs for participants_sea adapter.

use time::OffsetDateTime;

use crate::entities::venue_participants::ParticipantMode;

/// Outcome of one roll to persist, guarded by the roll count the caller read.
#[derive(Debug, Clone)]
pub struct ParticipantRollUpdate {
    pub id: i64,
    pub expected_roll_count: i32,
    pub position: i32,
    pub condition: i32,
    pub mode: ParticipantMode,
    pub won: bool,
    pub game_over: bool,
    /// Only written when `Some`; an existing stamp is never overwritten.
    pub finished_at: Option<OffsetDateTime>,
}
