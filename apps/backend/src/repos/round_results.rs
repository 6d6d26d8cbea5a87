//! Round result (ranking snapshot) repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::round_results_sea as results_adapter;
use crate::domain::ranking::RoundResult;
use crate::entities::venue_round_results;
use crate::errors::domain::DomainError;

impl From<venue_round_results::Model> for RoundResult {
    fn from(model: venue_round_results::Model) -> Self {
        Self {
            user_id: model.user_id,
            username: model.username,
            won: model.won,
            roll_count: model.roll_count,
            duration_seconds: model.duration_seconds,
        }
    }
}

pub async fn snapshot_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<bool, DomainError> {
    Ok(results_adapter::exists_for_round(conn, venue_id, round_number).await?)
}

/// Stores the snapshot; rows already present are skipped. Returns rows written.
pub async fn insert_snapshot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
    results: Vec<RoundResult>,
) -> Result<u64, DomainError> {
    let rows = results
        .into_iter()
        .map(|r| results_adapter::RoundResultCreate {
            venue_id,
            round_number,
            user_id: r.user_id,
            username: r.username,
            won: r.won,
            roll_count: r.roll_count,
            duration_seconds: r.duration_seconds,
        })
        .collect();
    Ok(results_adapter::insert_snapshot(conn, rows).await?)
}

pub async fn list_results<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<Vec<RoundResult>, DomainError> {
    let rows = results_adapter::list_for_round(conn, venue_id, round_number).await?;
    Ok(rows.into_iter().map(RoundResult::from).collect())
}
