//! Services: race logic over repos, one call per HTTP operation.

pub mod dice;
pub mod participants;
pub mod rounds;
pub mod users;
pub mod venue_view;
pub mod venues;
