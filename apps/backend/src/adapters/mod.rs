//! SeaORM adapters. Functions here return `DbErr`; repos map it to `DomainError`.

pub mod participants_sea;
pub mod round_results_sea;
pub mod rounds_sea;
pub mod users_sea;
pub mod venues_sea;

/// Structured payload carried in `DbErr::Custom` when a compare-and-set update
/// finds the row changed; parsed back by `infra::db_errors::map_db_err`.
pub(crate) fn optimistic_lock_err(expected: i32, actual: i32) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!(
        "OPTIMISTIC_LOCK:{{\"expected\":{expected},\"actual\":{actual}}}"
    ))
}
