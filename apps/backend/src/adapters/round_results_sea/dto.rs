//! DTOs for round_results_sea adapter.

/// One racer's frozen result, ready to insert.
#[derive(Debug, Clone)]
pub struct RoundResultCreate {
    pub venue_id: i64,
    pub round_number: i32,
    pub user_id: i64,
    pub username: String,
    pub won: bool,
    pub roll_count: i32,
    pub duration_seconds: f64,
}
