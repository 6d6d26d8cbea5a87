//! Backend test support utilities
//!
//! Shared helpers for the racing backend's unit and integration tests:
//! unified logging initialization, ProblemDetails assertions and unique
//! test data.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
