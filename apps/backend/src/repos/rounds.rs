//! Round repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::rounds_sea as rounds_adapter;
use crate::entities::venue_rounds;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub venue_id: i64,
    pub round_number: i32,
    pub started_at: OffsetDateTime,
    pub snapshotted_at: Option<OffsetDateTime>,
}

impl From<venue_rounds::Model> for Round {
    fn from(model: venue_rounds::Model) -> Self {
        Self {
            venue_id: model.venue_id,
            round_number: model.round_number,
            started_at: model.started_at,
            snapshotted_at: model.snapshotted_at,
        }
    }
}

pub async fn find_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<Option<Round>, DomainError> {
    let round = rounds_adapter::find_round(conn, venue_id, round_number).await?;
    Ok(round.map(Round::from))
}

pub async fn ensure_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<(Round, bool), DomainError> {
    let (round, created) = rounds_adapter::ensure_round(conn, venue_id, round_number).await?;
    Ok((Round::from(round), created))
}

/// Takes the per-round snapshot claim; `false` if it was already taken.
pub async fn claim_snapshot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<bool, DomainError> {
    Ok(rounds_adapter::claim_snapshot(conn, venue_id, round_number).await?)
}

pub async fn list_rounds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<Vec<Round>, DomainError> {
    let rounds = rounds_adapter::list_by_venue(conn, venue_id).await?;
    Ok(rounds.into_iter().map(Round::from).collect())
}
