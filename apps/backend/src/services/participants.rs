//! Participant lifecycle: entering a venue and applying rolls.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::domain::rules::{apply_roll as roll_rules, RaceMode, RollOutcome};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind, InvalidStateKind};
use crate::repos::participants::{self, Participant, RollWrite};
use crate::repos::venues;
use crate::services::dice::DiceRoller;
use crate::services::rounds;

/// What a roll did, plus the participant as stored afterwards.
#[derive(Debug, Clone)]
pub struct RollReport {
    pub dice: u8,
    pub outcome: RollOutcome,
    pub participant: Participant,
}

pub(crate) fn not_a_participant(venue_id: i64) -> DomainError {
    DomainError::forbidden(
        ForbiddenKind::NotAParticipant,
        format!("Not in venue {venue_id}; enter first"),
    )
}

/// The caller's participant row, or `Forbidden` if they never entered.
pub async fn require_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    user_id: i64,
) -> Result<Participant, AppError> {
    participants::find_participant(conn, venue_id, user_id)
        .await?
        .ok_or_else(|| not_a_participant(venue_id).into())
}

/// Enters `user_id` into the venue. Calling it again returns the existing row untouched.
pub async fn join<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    user_id: i64,
) -> Result<Participant, AppError> {
    let venue = venues::require_venue(conn, venue_id).await?;

    let (participant, created) = participants::ensure_participant(conn, venue.id, user_id).await?;
    rounds::ensure_round_exists(conn, venue.id).await?;

    if created {
        info!(venue_id, user_id, round_number = venue.current_round, "Participant entered venue");
    } else {
        debug!(venue_id, user_id, "Participant re-entered venue");
    }
    Ok(participant)
}

/// Draws one dice and moves the caller's racer.
///
/// Does not check for round completion; callers run
/// [`rounds::maybe_snapshot_round`] after this commits.
pub async fn apply_roll<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    user_id: i64,
    requested_mode: &str,
    dice: &dyn DiceRoller,
) -> Result<RollReport, AppError> {
    venues::require_venue(conn, venue_id).await?;
    let current = require_participant(conn, venue_id, user_id).await?;

    if current.won {
        return Err(DomainError::invalid_state(InvalidStateKind::AlreadyWon, "Already won").into());
    }
    if current.game_over {
        return Err(DomainError::invalid_state(InvalidStateKind::GameOver, "Game over").into());
    }

    let mode = RaceMode::normalize(requested_mode);
    let face = dice.roll();
    let outcome = roll_rules(mode, face, current.position, current.condition);

    let finishing = (outcome.won || outcome.game_over) && current.finished_at.is_none();
    let write = RollWrite {
        position: outcome.new_position,
        condition: outcome.new_condition,
        mode,
        won: outcome.won,
        game_over: outcome.game_over,
        finished_at: finishing.then(OffsetDateTime::now_utc),
    };

    let participant = participants::record_roll(conn, &current, write).await?;

    debug!(
        venue_id,
        user_id,
        dice = face,
        mode = %mode,
        steps = outcome.steps,
        position = outcome.new_position,
        condition = outcome.new_condition,
        "Roll applied"
    );
    if finishing {
        info!(
            venue_id,
            user_id,
            won = outcome.won,
            game_over = outcome.game_over,
            roll_count = participant.roll_count,
            "Participant finished"
        );
    }

    Ok(RollReport {
        dice: face,
        outcome,
        participant,
    })
}
