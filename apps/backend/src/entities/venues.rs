use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_name = "current_round")]
    pub current_round: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::venue_participants::Entity")]
    VenueParticipants,
    #[sea_orm(has_many = "super::venue_rounds::Entity")]
    VenueRounds,
    #[sea_orm(has_many = "super::venue_round_results::Entity")]
    VenueRoundResults,
}

impl Related<super::venue_participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VenueParticipants.def()
    }
}

impl Related<super::venue_rounds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VenueRounds.def()
    }
}

impl Related<super::venue_round_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VenueRoundResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
