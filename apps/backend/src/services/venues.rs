//! Venue catalogue: creation, listing and the bootstrap default.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::venues::{self, Venue};

pub const MAX_VENUE_NAME_CHARS: usize = 128;

pub async fn create_venue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Venue, AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_VENUE_NAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidVenueName,
            format!("Venue name must be 1 to {MAX_VENUE_NAME_CHARS} characters"),
        )
        .into());
    }

    let venue = venues::create_venue(conn, name).await?;
    info!(venue_id = venue.id, "Venue created");
    Ok(venue)
}

/// All venues, ordered by id.
pub async fn list_venues<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Venue>, AppError> {
    Ok(venues::list_venues(conn).await?)
}

/// Creates a venue named `name` when the table is empty. Returns it if created.
pub async fn ensure_default_venue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<Venue>, AppError> {
    if venues::count_venues(conn).await? > 0 {
        return Ok(None);
    }
    let venue = create_venue(conn, name).await?;
    info!(venue_id = venue.id, name = %venue.name, "Default venue created");
    Ok(Some(venue))
}
