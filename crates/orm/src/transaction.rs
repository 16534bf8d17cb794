//! Scoped session acquisition
//!
//! Open a session, run a unit of work on it, commit on success, roll back on
//! failure, and release the session on every path.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::error::OrmResult;
use crate::session::{Session, SessionProvider};

/// Future returned by a unit of work borrowing the session for `'s`
pub type ScopeFuture<'s, R> = Pin<Box<dyn Future<Output = OrmResult<R>> + Send + 's>>;

/// Run `work` inside a fresh session from `provider`.
///
/// - `Ok` from `work` commits; a failed commit is returned as the error.
/// - `Err` from `work` rolls back and returns the original error. A failed
///   rollback is logged, not returned.
/// - The session is dropped, and so released, before this returns.
pub async fn session_scope<P, F, R>(provider: &P, work: F) -> OrmResult<R>
where
    P: SessionProvider + ?Sized,
    F: for<'s> FnOnce(&'s mut P::Session) -> ScopeFuture<'s, R>,
{
    let mut session = provider.open().await?;

    match work(&mut session).await {
        Ok(value) => {
            session.commit().await?;
            debug!("session committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = session.rollback().await {
                warn!(error = %rollback_err, "rollback failed after error: {}", err);
            } else {
                debug!(error = %err, "session rolled back");
            }
            Err(err)
        }
    }
}
