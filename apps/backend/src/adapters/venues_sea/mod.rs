//! SeaORM adapter for venues.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::adapters::optimistic_lock_err;
use crate::entities::venues;

pub async fn create_venue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: String,
) -> Result<venues::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let venue_active = venues::ActiveModel {
        id: NotSet,
        name: Set(name),
        current_round: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };

    venue_active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<Option<venues::Model>, sea_orm::DbErr> {
    venues::Entity::find_by_id(venue_id).one(conn).await
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<venues::Model>, sea_orm::DbErr> {
    venues::Entity::find()
        .order_by_asc(venues::Column::Id)
        .all(conn)
        .await
}

pub async fn count<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    venues::Entity::find().count(conn).await
}

/// Moves `current_round` from `expected_round` to `expected_round + 1`.
///
/// Zero rows affected means either the venue is gone (`RecordNotFound`) or
/// another request advanced it first (`OPTIMISTIC_LOCK`).
pub async fn advance_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    expected_round: i32,
) -> Result<venues::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = venues::Entity::update_many()
        .col_expr(
            venues::Column::CurrentRound,
            Expr::col(venues::Column::CurrentRound).add(1),
        )
        .col_expr(venues::Column::UpdatedAt, Expr::val(now).into())
        .filter(venues::Column::Id.eq(venue_id))
        .filter(venues::Column::CurrentRound.eq(expected_round))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, venue_id).await? {
            Some(venue) => Err(optimistic_lock_err(expected_round, venue.current_round)),
            None => Err(sea_orm::DbErr::RecordNotFound("Venue not found".to_string())),
        };
    }

    find_by_id(conn, venue_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Venue not found".to_string()))
}
