use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Venues {
    Table,
    Id,
    Name,
    CurrentRound,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum VenueParticipants {
    Table,
    Id,
    VenueId,
    UserId,
    Position,
    Condition,
    Mode,
    Won,
    GameOver,
    RollCount,
    FinishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum VenueRounds {
    Table,
    Id,
    VenueId,
    RoundNumber,
    StartedAt,
    SnapshottedAt,
}

#[derive(Iden)]
enum VenueRoundResults {
    Table,
    Id,
    VenueId,
    RoundNumber,
    UserId,
    Username,
    Won,
    RollCount,
    DurationSeconds,
    CreatedAt,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // venues
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(id_col(Venues::Id))
                    .col(ColumnDef::new(Venues::Name).string().not_null())
                    .col(
                        ColumnDef::new(Venues::CurrentRound)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Venues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Venues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // venue_participants
        manager
            .create_table(
                Table::create()
                    .table(VenueParticipants::Table)
                    .if_not_exists()
                    .col(id_col(VenueParticipants::Id))
                    .col(
                        ColumnDef::new(VenueParticipants::VenueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::Condition)
                            .integer()
                            .not_null()
                            .default(6),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::Mode)
                            .string_len(16)
                            .not_null()
                            .default("normal"),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::Won)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::GameOver)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::RollCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::FinishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VenueParticipants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_participants_venue_id")
                            .from(VenueParticipants::Table, VenueParticipants::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_participants_user_id")
                            .from(VenueParticipants::Table, VenueParticipants::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_venue_participants_venue_user")
                    .table(VenueParticipants::Table)
                    .col(VenueParticipants::VenueId)
                    .col(VenueParticipants::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // venue_rounds
        manager
            .create_table(
                Table::create()
                    .table(VenueRounds::Table)
                    .if_not_exists()
                    .col(id_col(VenueRounds::Id))
                    .col(ColumnDef::new(VenueRounds::VenueId).big_integer().not_null())
                    .col(ColumnDef::new(VenueRounds::RoundNumber).integer().not_null())
                    .col(
                        ColumnDef::new(VenueRounds::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Set once by the request that writes the round's results.
                    .col(
                        ColumnDef::new(VenueRounds::SnapshottedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_rounds_venue_id")
                            .from(VenueRounds::Table, VenueRounds::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_venue_rounds_venue_round")
                    .table(VenueRounds::Table)
                    .col(VenueRounds::VenueId)
                    .col(VenueRounds::RoundNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // venue_round_results
        manager
            .create_table(
                Table::create()
                    .table(VenueRoundResults::Table)
                    .if_not_exists()
                    .col(id_col(VenueRoundResults::Id))
                    .col(
                        ColumnDef::new(VenueRoundResults::VenueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VenueRoundResults::RoundNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VenueRoundResults::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VenueRoundResults::Username).string().not_null())
                    .col(ColumnDef::new(VenueRoundResults::Won).boolean().not_null())
                    .col(
                        ColumnDef::new(VenueRoundResults::RollCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VenueRoundResults::DurationSeconds)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VenueRoundResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_round_results_venue_id")
                            .from(VenueRoundResults::Table, VenueRoundResults::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_round_results_user_id")
                            .from(VenueRoundResults::Table, VenueRoundResults::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One snapshot row per (venue, round, user).
        manager
            .create_index(
                Index::create()
                    .name("ux_venue_round_results_venue_round_user")
                    .table(VenueRoundResults::Table)
                    .col(VenueRoundResults::VenueId)
                    .col(VenueRoundResults::RoundNumber)
                    .col(VenueRoundResults::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VenueRoundResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VenueRounds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VenueParticipants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
