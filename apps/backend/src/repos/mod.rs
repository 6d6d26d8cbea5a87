//! Repository functions: domain models over the SeaORM adapters.

pub mod participants;
pub mod round_results;
pub mod rounds;
pub mod users;
pub mod venues;
