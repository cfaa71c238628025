//! Logging wrapper built on `tracing`.

use forkway_core::{BoxError, Flow, Middleware};
use tracing::Instrument;

/// A handler wrapper that runs `inner` inside a `tracing` span and records
/// how it completed.
pub struct Logged<M> {
    inner: M,
    name: &'static str,
}

impl<M> Logged<M> {
    /// Wrap `inner`, naming the span after `name`.
    pub const fn new(inner: M, name: &'static str) -> Self {
        Self { inner, name }
    }
}

impl<M: Clone> Clone for Logged<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<Req, Res, M> Middleware<Req, Res> for Logged<M>
where
    Req: Send,
    Res: Send,
    M: Middleware<Req, Res>,
{
    async fn handle(&self, req: &mut Req, res: &mut Res) -> Result<Flow, BoxError> {
        let span = tracing::info_span!("middleware", name = %self.name);

        async move {
            let result = self.inner.handle(req, res).await;
            match &result {
                Ok(flow) => tracing::debug!(?flow, "middleware completed"),
                Err(error) => tracing::warn!(%error, "middleware failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
