//! Error codes for the racing backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Username/password pair did not match
    InvalidCredentials,
    /// Access denied
    Forbidden,
    /// Caller has not entered the venue
    NotAParticipant,

    // Request Validation
    /// Invalid venue ID in the path
    InvalidVenueId,
    /// Invalid round number in the path
    InvalidRoundNumber,
    /// Username empty or too long
    InvalidUsername,
    /// Password empty
    InvalidPassword,
    /// Venue name empty
    InvalidVenueName,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Race state
    /// Participant already reached the finish line
    AlreadyWon,
    /// Participant ran out of condition
    GameOver,
    /// Not every participant has finished the current round
    RoundIncomplete,
    /// Current round has no ranking snapshot yet
    RankingMissing,
    /// Venue has nobody in it
    NoParticipants,

    // Resource Not Found
    /// Venue not found
    VenueNotFound,
    /// Round not found
    RoundNotFound,
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Username already registered
    UsernameTaken,
    /// Row changed underneath the request
    OptimisticLock,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",

            Self::InvalidVenueId => "INVALID_VENUE_ID",
            Self::InvalidRoundNumber => "INVALID_ROUND_NUMBER",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidVenueName => "INVALID_VENUE_NAME",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::AlreadyWon => "ALREADY_WON",
            Self::GameOver => "GAME_OVER",
            Self::RoundIncomplete => "ROUND_INCOMPLETE",
            Self::RankingMissing => "RANKING_MISSING",
            Self::NoParticipants => "NO_PARTICIPANTS",

            Self::VenueNotFound => "VENUE_NOT_FOUND",
            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
