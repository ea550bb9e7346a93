//! Completion-callback invocation
//!
//! Every client operation is an `async fn`. Callers that prefer to be
//! notified instead of awaiting hand the future and a closure to
//! [`spawn_with_callback`]; the closure runs exactly once with the outcome.

use crate::error::Result;
use std::future::Future;
use tokio::task::JoinHandle;

/// Spawn `future` on the current tokio runtime and pass its result to `callback`.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_with_callback<T, Fut, C>(future: Fut, callback: C) -> JoinHandle<()>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    C: FnOnce(Result<T>) + Send + 'static,
{
    tokio::spawn(async move { callback(future.await) })
}
