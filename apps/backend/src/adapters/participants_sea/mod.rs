//! SeaORM adapter for venue participants.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveEnum, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::adapters::optimistic_lock_err;
use crate::domain::rules::INITIAL_CONDITION;
use crate::entities::venue_participants::{self, ParticipantMode};
use crate::entities::users;

pub mod dto;

pub use dto::ParticipantRollUpdate;

pub async fn find_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    user_id: i64,
) -> Result<Option<venue_participants::Model>, sea_orm::DbErr> {
    venue_participants::Entity::find()
        .filter(venue_participants::Column::VenueId.eq(venue_id))
        .filter(venue_participants::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Inserts a fresh participant unless one exists; returns the row and whether it was created.
pub async fn ensure_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    user_id: i64,
) -> Result<(venue_participants::Model, bool), sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let participant_active = venue_participants::ActiveModel {
        id: NotSet,
        venue_id: Set(venue_id),
        user_id: Set(user_id),
        position: Set(0),
        condition: Set(INITIAL_CONDITION),
        mode: Set(ParticipantMode::Normal),
        won: Set(false),
        game_over: Set(false),
        roll_count: Set(0),
        finished_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let rows = venue_participants::Entity::insert(participant_active)
        .on_conflict(
            OnConflict::columns([
                venue_participants::Column::VenueId,
                venue_participants::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let participant = find_participant(conn, venue_id, user_id)
        .await?
        .ok_or_else(|| {
            sea_orm::DbErr::RecordNotFound("venue_participants row not found".to_string())
        })?;

    Ok((participant, rows == 1))
}

/// All participants of a venue with their user rows, in join order.
pub async fn list_with_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<Vec<(venue_participants::Model, Option<users::Model>)>, sea_orm::DbErr> {
    venue_participants::Entity::find()
        .filter(venue_participants::Column::VenueId.eq(venue_id))
        .order_by_asc(venue_participants::Column::Id)
        .find_also_related(users::Entity)
        .all(conn)
        .await
}

pub async fn apply_roll_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ParticipantRollUpdate,
) -> Result<venue_participants::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();

    let mut update = venue_participants::Entity::update_many()
        .col_expr(venue_participants::Column::Position, Expr::val(dto.position).into())
        .col_expr(venue_participants::Column::Condition, Expr::val(dto.condition).into())
        .col_expr(
            venue_participants::Column::Mode,
            Expr::val(dto.mode.to_value()).into(),
        )
        .col_expr(venue_participants::Column::Won, Expr::val(dto.won).into())
        .col_expr(venue_participants::Column::GameOver, Expr::val(dto.game_over).into())
        .col_expr(
            venue_participants::Column::RollCount,
            Expr::col(venue_participants::Column::RollCount).add(1),
        )
        .col_expr(venue_participants::Column::UpdatedAt, Expr::val(now).into());

    if let Some(finished_at) = dto.finished_at {
        update = update.col_expr(
            venue_participants::Column::FinishedAt,
            Expr::val(finished_at).into(),
        );
    }

    let result = update
        .filter(venue_participants::Column::Id.eq(dto.id))
        .filter(venue_participants::Column::RollCount.eq(dto.expected_roll_count))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match venue_participants::Entity::find_by_id(dto.id).one(conn).await? {
            Some(p) => Err(optimistic_lock_err(dto.expected_roll_count, p.roll_count)),
            None => Err(sea_orm::DbErr::RecordNotFound(
                "venue_participants row not found".to_string(),
            )),
        };
    }

    venue_participants::Entity::find_by_id(dto.id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("venue_participants row not found".to_string()))
}

/// Puts every participant of the venue back on the start line.
pub async fn reset_all_for_venue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();

    let result = venue_participants::Entity::update_many()
        .col_expr(venue_participants::Column::Position, Expr::val(0).into())
        .col_expr(
            venue_participants::Column::Condition,
            Expr::val(INITIAL_CONDITION).into(),
        )
        .col_expr(
            venue_participants::Column::Mode,
            Expr::val(ParticipantMode::Normal.to_value()).into(),
        )
        .col_expr(venue_participants::Column::Won, Expr::val(false).into())
        .col_expr(venue_participants::Column::GameOver, Expr::val(false).into())
        .col_expr(venue_participants::Column::RollCount, Expr::val(0).into())
        .col_expr(
            venue_participants::Column::FinishedAt,
            Expr::val(Option::<OffsetDateTime>::None).into(),
        )
        .col_expr(venue_participants::Column::UpdatedAt, Expr::val(now).into())
        .filter(venue_participants::Column::VenueId.eq(venue_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}
