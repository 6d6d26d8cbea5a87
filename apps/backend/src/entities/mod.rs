pub mod users;
pub mod venue_participants;
pub mod venue_round_results;
pub mod venue_rounds;
pub mod venues;

pub use users::Entity as Users;
pub use users::Model as User;
pub use venue_participants::Entity as VenueParticipants;
pub use venue_participants::Model as VenueParticipant;
pub use venue_round_results::Entity as VenueRoundResults;
pub use venue_round_results::Model as VenueRoundResult;
pub use venue_rounds::Entity as VenueRounds;
pub use venue_rounds::Model as VenueRound;
pub use venues::Entity as Venues;
pub use venues::Model as Venue;
