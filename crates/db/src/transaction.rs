//! Closure-scoped transactions.

use futures::future::BoxFuture;
use sqlx::PgConnection;

use crate::DbPool;

/// Run `actions` inside a transaction.
///
/// Commits when the closure returns `Ok` and rolls back when it returns
/// `Err`. If the returned future is dropped (request cancelled, panic) the
/// transaction is dropped with it and Postgres rolls it back.
///
/// The closure receives the transaction's connection; data it needs must be
/// moved into the returned future:
///
/// ```ignore
/// let song = transaction::<_, AppError, _>(&pool, move |conn| {
///     Box::pin(async move {
///         let song = SongRepo::create(&mut *conn, &input).await?;
///         SongRepo::create_details(&mut *conn, song.id).await?;
///         Ok::<_, AppError>(song)
///     })
/// })
/// .await?;
/// ```
pub async fn transaction<T, E, F>(pool: &DbPool, actions: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>>,
    E: From<sqlx::Error>,
{
    let mut tx = pool.begin().await?;

    match actions(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(err)
        }
    }
}
