//! SeaORM adapter for venue rounds.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};

use crate::entities::venue_rounds;

pub async fn find_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<Option<venue_rounds::Model>, sea_orm::DbErr> {
    venue_rounds::Entity::find()
        .filter(venue_rounds::Column::VenueId.eq(venue_id))
        .filter(venue_rounds::Column::RoundNumber.eq(round_number))
        .one(conn)
        .await
}

/// Creates the round row if missing; returns it and whether this call created it.
pub async fn ensure_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<(venue_rounds::Model, bool), sea_orm::DbErr> {
    let round_active = venue_rounds::ActiveModel {
        id: NotSet,
        venue_id: Set(venue_id),
        round_number: Set(round_number),
        started_at: Set(time::OffsetDateTime::now_utc()),
        snapshotted_at: Set(None),
    };

    let rows = venue_rounds::Entity::insert(round_active)
        .on_conflict(
            OnConflict::columns([
                venue_rounds::Column::VenueId,
                venue_rounds::Column::RoundNumber,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let round = find_round(conn, venue_id, round_number)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("venue_rounds row not found".to_string()))?;

    Ok((round, rows == 1))
}

pub async fn list_by_venue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<Vec<venue_rounds::Model>, sea_orm::DbErr> {
    venue_rounds::Entity::find()
        .filter(venue_rounds::Column::VenueId.eq(venue_id))
        .order_by_asc(venue_rounds::Column::RoundNumber)
        .all(conn)
        .await
}

/// Marks the round as snapshotted unless somebody already did.
///
/// Returns `false` when another writer holds the claim. On Postgres a racing
/// update waits on the row lock and then sees the column already set.
pub async fn claim_snapshot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    round_number: i32,
) -> Result<bool, sea_orm::DbErr> {
    let result = venue_rounds::Entity::update_many()
        .col_expr(
            venue_rounds::Column::SnapshottedAt,
            Expr::val(time::OffsetDateTime::now_utc()).into(),
        )
        .filter(venue_rounds::Column::VenueId.eq(venue_id))
        .filter(venue_rounds::Column::RoundNumber.eq(round_number))
        .filter(venue_rounds::Column::SnapshottedAt.is_null())
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}
