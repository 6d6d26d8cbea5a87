//! Round coordination: round rows, completion snapshots and race restarts.
//!
//! Completion is never stored. A round is complete when every participant
//! has a `finished_at` and a result snapshot exists for the venue's current
//! round; both facts are read from the tables each time.

use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::domain::ranking::{rank_results, RankingEntry, RoundResult};
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind, InvalidStateKind};
use crate::repos::participants::{self, NamedParticipant};
use crate::repos::rounds::{self, Round};
use crate::repos::{round_results, venues};
use crate::services::participants::require_participant;

/// What a call to [`maybe_snapshot_round`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    NoParticipants,
    InProgress,
    AlreadySnapshotted,
    /// This call stored `rows` results for `round_number`.
    Written { round_number: i32, rows: u64 },
}

pub(crate) fn all_finished(participants: &[NamedParticipant]) -> bool {
    !participants.is_empty() && participants.iter().all(|p| p.participant.is_finished())
}

/// Round row for the venue's current round, created if missing.
pub async fn ensure_round_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<Round, AppError> {
    let venue = venues::require_venue(conn, venue_id).await?;
    let (round, created) = rounds::ensure_round(conn, venue.id, venue.current_round).await?;
    if created {
        info!(venue_id, round_number = round.round_number, "Round started");
    }
    Ok(round)
}

/// Stores the ranking snapshot once every participant has finished.
///
/// Only the caller that takes the round's `snapshotted_at` claim writes rows,
/// so one (venue, round) never ends up with results from two rosters. Run it
/// inside a transaction: the claim and the rows commit together.
pub async fn maybe_snapshot_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<SnapshotOutcome, AppError> {
    let venue = venues::require_venue(conn, venue_id).await?;
    let roster = participants::list_named(conn, venue.id).await?;

    if roster.is_empty() {
        return Ok(SnapshotOutcome::NoParticipants);
    }
    if !all_finished(&roster) {
        return Ok(SnapshotOutcome::InProgress);
    }
    if round_results::snapshot_exists(conn, venue.id, venue.current_round).await? {
        return Ok(SnapshotOutcome::AlreadySnapshotted);
    }

    let round = rounds::find_round(conn, venue.id, venue.current_round)
        .await?
        .ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!(
                    "venue {} has participants but no row for round {}",
                    venue.id, venue.current_round
                ),
            )
        })?;

    if !rounds::claim_snapshot(conn, venue.id, round.round_number).await? {
        debug!(venue_id, round_number = round.round_number, "Snapshot claimed by another request");
        return Ok(SnapshotOutcome::AlreadySnapshotted);
    }

    let results = roster
        .into_iter()
        .map(|named| {
            let p = named.participant;
            let duration_seconds = p
                .finished_at
                .map(|finished| (finished - round.started_at).as_seconds_f64())
                .unwrap_or(0.0);
            RoundResult {
                user_id: p.user_id,
                username: named.username,
                won: p.won,
                roll_count: p.roll_count,
                duration_seconds,
            }
        })
        .collect();

    let rows = round_results::insert_snapshot(conn, venue.id, venue.current_round, results).await?;
    if rows == 0 {
        debug!(venue_id, round_number = venue.current_round, "Snapshot already written by another request");
        return Ok(SnapshotOutcome::AlreadySnapshotted);
    }

    info!(venue_id, round_number = venue.current_round, rows, "Round snapshot written");
    Ok(SnapshotOutcome::Written {
        round_number: venue.current_round,
        rows,
    })
}

/// Moves the venue to its next round and puts everyone back on the start line.
///
/// Must run inside one transaction: the counter update, the new round row and
/// the participant reset commit together or not at all.
pub async fn start_new_race<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    caller_id: i64,
) -> Result<i32, AppError> {
    let venue = venues::require_venue(conn, venue_id).await?;
    require_participant(conn, venue.id, caller_id).await?;

    let roster = participants::list_named(conn, venue.id).await?;
    if roster.is_empty() {
        return Err(DomainError::invalid_state(
            InvalidStateKind::NoParticipants,
            "Venue has no participants",
        )
        .into());
    }
    if !all_finished(&roster) {
        return Err(DomainError::invalid_state(
            InvalidStateKind::RoundIncomplete,
            "Round not finished yet",
        )
        .into());
    }
    if !round_results::snapshot_exists(conn, venue.id, venue.current_round).await? {
        return Err(DomainError::invalid_state(
            InvalidStateKind::RankingMissing,
            "Ranking for this round has not been computed yet",
        )
        .into());
    }

    let advanced = venues::advance_round(conn, venue.id, venue.current_round).await?;
    rounds::ensure_round(conn, advanced.id, advanced.current_round).await?;
    let reset = participants::reset_all(conn, advanced.id).await?;

    info!(
        venue_id,
        caller_id,
        round_number = advanced.current_round,
        participants_reset = reset,
        "New race started"
    );
    Ok(advanced.current_round)
}

/// Ranking of a stored snapshot; empty when the round has none.
pub async fn ranking_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<Vec<RankingEntry>, AppError> {
    let results = round_results::list_results(conn, venue_id, round_number).await?;
    Ok(rank_results(results))
}
