use std::future::Future;
use std::time::Duration;

use crate::error::AccessError;

/// Race `future` against a deadline of `duration`.
///
/// On expiry the future is dropped, which cancels whatever request it was
/// driving; a result it would have produced later is never observed.
pub async fn timeout_promise<F, T>(duration: Duration, future: F) -> Result<T, AccessError>
where
    F: Future<Output = Result<T, AccessError>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(AccessError::Timeout(duration)),
    }
}
