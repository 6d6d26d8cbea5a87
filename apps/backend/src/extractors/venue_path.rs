use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// `{venue_id}` path segment, parsed and checked positive. Existence is checked by services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueId(pub i64);

/// `{round_number}` path segment, parsed and checked positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundNumber(pub i32);

fn positive_segment<T>(req: &HttpRequest, name: &str, code: ErrorCode) -> Result<T, AppError>
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display,
{
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| AppError::bad_request(code, format!("Missing {name} parameter")))?;

    let value = raw
        .parse::<T>()
        .map_err(|_| AppError::bad_request(code, format!("Invalid {name}: {raw}")))?;

    if value <= T::default() {
        return Err(AppError::bad_request(
            code,
            format!("{name} must be positive, got: {value}"),
        ));
    }
    Ok(value)
}

impl FromRequest for VenueId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(positive_segment(req, "venue_id", ErrorCode::InvalidVenueId).map(VenueId))
    }
}

impl FromRequest for RoundNumber {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(positive_segment(req, "round_number", ErrorCode::InvalidRoundNumber).map(RoundNumber))
    }
}
