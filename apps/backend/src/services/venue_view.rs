//! Read-side projections of a venue for its participants.

use sea_orm::ConnectionTrait;

use crate::domain::ranking::RankingEntry;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::participants::{self, NamedParticipant};
use crate::repos::rounds::{self, Round};
use crate::repos::{round_results, venues};
use crate::services::participants::require_participant;
use crate::services::rounds::{all_finished, maybe_snapshot_round, ranking_for};

#[derive(Debug, Clone)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub current_round: i32,
    pub round_complete: bool,
    pub participants: Vec<NamedParticipant>,
    /// Present only when `round_complete`.
    pub ranking: Option<Vec<RankingEntry>>,
}

/// Venue state as seen by one of its participants.
///
/// A finished round whose snapshot was never written (the writer failed after
/// its roll committed) gets the snapshot here, before completion is judged.
pub async fn get_venue_detail<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    caller_id: i64,
) -> Result<VenueDetail, AppError> {
    venues::require_venue(conn, venue_id).await?;
    require_participant(conn, venue_id, caller_id).await?;

    maybe_snapshot_round(conn, venue_id).await?;

    // Re-read after the snapshot so the counter and rows are from one view.
    let venue = venues::require_venue(conn, venue_id).await?;
    let roster = participants::list_named(conn, venue.id).await?;
    let round_complete = all_finished(&roster)
        && round_results::snapshot_exists(conn, venue.id, venue.current_round).await?;

    let ranking = if round_complete {
        Some(ranking_for(conn, venue.id, venue.current_round).await?)
    } else {
        None
    };

    Ok(VenueDetail {
        id: venue.id,
        name: venue.name,
        current_round: venue.current_round,
        round_complete,
        participants: roster,
        ranking,
    })
}

pub async fn list_rounds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    caller_id: i64,
) -> Result<Vec<Round>, AppError> {
    venues::require_venue(conn, venue_id).await?;
    require_participant(conn, venue_id, caller_id).await?;
    Ok(rounds::list_rounds(conn, venue_id).await?)
}

/// Ranking for a past or current round. A round without a snapshot yields an empty list.
///
/// Published results are readable by any signed-in user, not just the venue's racers.
pub async fn round_results<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<Vec<RankingEntry>, AppError> {
    venues::require_venue(conn, venue_id).await?;

    if rounds::find_round(conn, venue_id, round_number).await?.is_none() {
        return Err(DomainError::not_found(
            NotFoundKind::Round,
            format!("Round {round_number} not found in venue {venue_id}"),
        )
        .into());
    }
    ranking_for(conn, venue_id, round_number).await
}
