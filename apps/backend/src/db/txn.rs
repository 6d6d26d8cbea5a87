use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::warn;

use super::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::trace_ctx;

/// Boxed future borrowing the transaction handed to a [`with_txn`] closure.
pub type TxnFuture<'a, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + 'a>>;

/// Execute `f` within a database transaction.
///
/// Commits when `f` returns `Ok`, rolls back on `Err` and returns the
/// closure's error unchanged. Callers write `|txn| Box::pin(async move { .. })`.
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R>,
{
    let db = require_db(state)?;
    let txn = db.begin().await?;

    match f(&txn).await {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(
                    trace_id = %trace_ctx::trace_id(),
                    error = %rollback_err,
                    "Rollback failed after handler error"
                );
            }
            Err(err)
        }
    }
}
