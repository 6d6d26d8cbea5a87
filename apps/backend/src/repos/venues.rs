//! Venue repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::venues_sea as venues_adapter;
use crate::entities::venues;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub current_round: i32,
}

impl From<venues::Model> for Venue {
    fn from(model: venues::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            current_round: model.current_round,
        }
    }
}

pub async fn create_venue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Venue, DomainError> {
    let venue = venues_adapter::create_venue(conn, name.to_string()).await?;
    Ok(Venue::from(venue))
}

pub async fn find_venue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<Option<Venue>, DomainError> {
    let venue = venues_adapter::find_by_id(conn, venue_id).await?;
    Ok(venue.map(Venue::from))
}

/// Like [`find_venue`] but a missing venue is `NotFound(Venue)`.
pub async fn require_venue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
) -> Result<Venue, DomainError> {
    find_venue(conn, venue_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Venue, format!("Venue {venue_id} not found"))
    })
}

pub async fn list_venues<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Venue>, DomainError> {
    let venues = venues_adapter::list_all(conn).await?;
    Ok(venues.into_iter().map(Venue::from).collect())
}

pub async fn count_venues<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(venues_adapter::count(conn).await?)
}

pub async fn advance_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    venue_id: i64,
    expected_round: i32,
) -> Result<Venue, DomainError> {
    let venue = venues_adapter::advance_round(conn, venue_id, expected_round).await?;
    Ok(Venue::from(venue))
}
