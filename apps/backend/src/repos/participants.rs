//! Participant repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::participants_sea as participants_adapter;
use crate::domain::rules::RaceMode;
use crate::entities::venue_participants::{self, ParticipantMode};
use crate::errors::domain::{DomainError, InfraErrorKind};

/// A user's live state in one venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: i64,
    pub venue_id: i64,
    pub user_id: i64,
    pub position: i32,
    pub condition: i32,
    pub mode: RaceMode,
    pub won: bool,
    pub game_over: bool,
    pub roll_count: i32,
    pub finished_at: Option<OffsetDateTime>,
}

impl Participant {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// Participant joined with the owning user's name, for projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedParticipant {
    pub participant: Participant,
    pub username: String,
}

/// Values to persist after a roll.
#[derive(Debug, Clone)]
pub struct RollWrite {
    pub position: i32,
    pub condition: i32,
    pub mode: RaceMode,
    pub won: bool,
    pub game_over: bool,
    pub finished_at: Option<OffsetDateTime>,
}

impl From<ParticipantMode> for RaceMode {
    fn from(mode: ParticipantMode) -> Self {
        match mode {
            ParticipantMode::Normal => RaceMode::Normal,
            ParticipantMode::Super => RaceMode::Super,
        }
    }
}

impl From<RaceMode> for ParticipantMode {
    fn from(mode: RaceMode) -> Self {
        match mode {
            RaceMode::Normal => ParticipantMode::Normal,
            RaceMode::Super => ParticipantMode::Super,
        }
    }
}

impl From<venue_participants::Model> for Participant {
    fn from(model: venue_participants::Model) -> Self {
        Self {
            id: model.id,
            venue_id: model.venue_id,
            user_id: model.user_id,
            position: model.position,
            condition: model.condition,
            mode: RaceMode::from(model.mode),
            won: model.won,
            game_over: model.game_over,
            roll_count: model.roll_count,
            finished_at: model.finished_at,
        }
    }
}

pub async fn find_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    user_id: i64,
) -> Result<Option<Participant>, DomainError> {
    let participant = participants_adapter::find_participant(conn, venue_id, user_id).await?;
    Ok(participant.map(Participant::from))
}

/// Returns the participant and whether it was created by this call.
pub async fn ensure_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    user_id: i64,
) -> Result<(Participant, bool), DomainError> {
    let (participant, created) =
        participants_adapter::ensure_participant(conn, venue_id, user_id).await?;
    Ok((Participant::from(participant), created))
}

pub async fn list_named<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<Vec<NamedParticipant>, DomainError> {
    let rows = participants_adapter::list_with_users(conn, venue_id).await?;

    rows.into_iter()
        .map(|(participant, user)| {
            let user = user.ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("participant {} has no user row", participant.id),
                )
            })?;
            Ok(NamedParticipant {
                participant: Participant::from(participant),
                username: user.username,
            })
        })
        .collect()
}

/// Writes a roll outcome if `current` is still what the database holds.
pub async fn record_roll<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    current: &Participant,
    write: RollWrite,
) -> Result<Participant, DomainError> {
    let dto = participants_adapter::ParticipantRollUpdate {
        id: current.id,
        expected_roll_count: current.roll_count,
        position: write.position,
        condition: write.condition,
        mode: ParticipantMode::from(write.mode),
        won: write.won,
        game_over: write.game_over,
        finished_at: write.finished_at,
    };
    let updated = participants_adapter::apply_roll_update(conn, dto).await?;
    Ok(Participant::from(updated))
}

pub async fn reset_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<u64, DomainError> {
    Ok(participants_adapter::reset_all_for_venue(conn, venue_id).await?)
}
