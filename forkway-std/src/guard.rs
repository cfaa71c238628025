//! Panic containment for running handlers.

use forkway_core::{BoxError, BoxFuture, DispatchError, Flow};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Await a handler future, turning a panic into [`DispatchError::MiddlewarePanicked`].
pub(crate) async fn guarded(fut: BoxFuture<'_, Result<Flow, BoxError>>) -> Result<Flow, BoxError> {
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let error = DispatchError::from_panic(payload);
            #[cfg(feature = "tracing")]
            tracing::warn!(%error, "handler panicked");
            Err(error.into())
        }
    }
}
