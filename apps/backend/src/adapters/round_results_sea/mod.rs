//! SeaORM adapter for round result snapshots.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::venue_round_results;

pub mod dto;

pub use dto::RoundResultCreate;

pub async fn exists_for_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<bool, sea_orm::DbErr> {
    let n = venue_round_results::Entity::find()
        .filter(venue_round_results::Column::VenueId.eq(venue_id))
        .filter(venue_round_results::Column::RoundNumber.eq(round_number))
        .count(conn)
        .await?;
    Ok(n > 0)
}

/// Inserts the snapshot rows, skipping any (venue, round, user) already present.
/// Returns how many rows this call actually wrote.
pub async fn insert_snapshot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: Vec<RoundResultCreate>,
) -> Result<u64, sea_orm::DbErr> {
    if rows.is_empty() {
        return Ok(0);
    }

    let now = time::OffsetDateTime::now_utc();
    let actives = rows.into_iter().map(|r| venue_round_results::ActiveModel {
        id: NotSet,
        venue_id: Set(r.venue_id),
        round_number: Set(r.round_number),
        user_id: Set(r.user_id),
        username: Set(r.username),
        won: Set(r.won),
        roll_count: Set(r.roll_count),
        duration_seconds: Set(r.duration_seconds),
        created_at: Set(now),
    });

    venue_round_results::Entity::insert_many(actives)
        .on_conflict(
            OnConflict::columns([
                venue_round_results::Column::VenueId,
                venue_round_results::Column::RoundNumber,
                venue_round_results::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

pub async fn list_for_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<Vec<venue_round_results::Model>, sea_orm::DbErr> {
    venue_round_results::Entity::find()
        .filter(venue_round_results::Column::VenueId.eq(venue_id))
        .filter(venue_round_results::Column::RoundNumber.eq(round_number))
        .order_by_asc(venue_round_results::Column::Id)
        .all(conn)
        .await
}
