//! Timeout wrapper for time-limited handlers.
//!
//! The dispatcher waits for each handler indefinitely. Wrapping a handler in
//! [`Timeout`] turns a handler that never completes into an error instead of
//! a stalled request.

use forkway_core::{BoxError, Flow, Middleware};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Error returned when a wrapped handler does not complete in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("middleware timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// A handler that fails with [`TimeoutError`] if `inner` runs too long.
pub struct Timeout<M> {
    inner: M,
    duration: Duration,
}

impl<M> Timeout<M> {
    /// Create a new timeout wrapper.
    pub fn new(inner: M, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// The configured limit.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<Req, Res, M> Middleware<Req, Res> for Timeout<M>
where
    Req: Send,
    Res: Send,
    M: Middleware<Req, Res>,
{
    async fn handle(&self, req: &mut Req, res: &mut Res) -> Result<Flow, BoxError> {
        match timeout(self.duration, self.inner.handle(req, res)).await {
            Ok(result) => result,
            Err(_) => Err(TimeoutError(self.duration).into()),
        }
    }
}
