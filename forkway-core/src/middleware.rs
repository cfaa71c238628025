//! # Handlers (Middleware)
//!
//! The unit of request processing in forkway.
//!
//! A handler receives the shared request and response by mutable reference
//! and resolves once it is done. The three ways a callback-style handler can
//! complete map onto the resolved value:
//!
//! | Callback style                        | forkway            |
//! |---------------------------------------|--------------------|
//! | calls `next()`                        | `Ok(Flow::Next)`   |
//! | calls `next(err)` or throws           | `Err(err)`         |
//! | answers and never calls `next`        | `Ok(Flow::Halt)`   |
//!
//! Because completion is a future, a container can simply `.await` each
//! handler before starting the next one.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Middleware`] uses native `async fn` for static dispatch. For storage in
//! groups, stacks, and registries use [`DynMiddleware`], which every
//! `Middleware` implements automatically.

use crate::error::BoxError;
use std::{future::Future, pin::Pin, sync::Arc};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What the host should do after a handler completes successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// The continuation was invoked; run the next stage.
    #[default]
    Next,
    /// The exchange was answered; no further stage may run.
    Halt,
}

impl Flow {
    /// Returns `true` for [`Flow::Halt`].
    pub const fn is_halt(self) -> bool {
        matches!(self, Flow::Halt)
    }
}

/// An ordinary request handler.
///
/// # Example
///
/// ```rust,ignore
/// struct Authenticate;
///
/// impl Middleware<Request, Response> for Authenticate {
///     async fn handle(&self, req: &mut Request, _res: &mut Response) -> Result<Flow, BoxError> {
///         req.user = lookup(&req.token).await?;
///         Ok(Flow::Next)
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Middleware<{Req}, {Res}>`",
    label = "missing `Middleware` implementation",
    note = "Handlers must implement `handle` for the request type `{Req}` and response type `{Res}`."
)]
pub trait Middleware<Req, Res>: Send + Sync + 'static {
    /// Process the exchange.
    fn handle(
        &self,
        req: &mut Req,
        res: &mut Res,
    ) -> impl Future<Output = Result<Flow, BoxError>> + Send;
}

/// Object-safe version of [`Middleware`].
pub trait DynMiddleware<Req, Res>: Send + Sync + 'static {
    /// Process the exchange (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
    ) -> BoxFuture<'a, Result<Flow, BoxError>>;
}

impl<Req, Res, T: Middleware<Req, Res>> DynMiddleware<Req, Res> for T {
    fn handle_dyn<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
    ) -> BoxFuture<'a, Result<Flow, BoxError>> {
        Box::pin(self.handle(req, res))
    }
}

impl<Req, Res> Middleware<Req, Res> for Box<dyn DynMiddleware<Req, Res>>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    async fn handle(&self, req: &mut Req, res: &mut Res) -> Result<Flow, BoxError> {
        (**self).handle_dyn(req, res).await
    }
}

impl<Req, Res> Middleware<Req, Res> for Arc<dyn DynMiddleware<Req, Res>>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    async fn handle(&self, req: &mut Req, res: &mut Res) -> Result<Flow, BoxError> {
        (**self).handle_dyn(req, res).await
    }
}

/// A handler that receives a pending error.
///
/// Error handlers are a distinct, declared kind. Hosts route errors to them;
/// conditional groups refuse them.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `ErrorMiddleware<{Req}, {Res}>`",
    label = "missing `ErrorMiddleware` implementation",
    note = "Error handlers must implement `handle_error` for `{Req}` and `{Res}`."
)]
pub trait ErrorMiddleware<Req, Res>: Send + Sync + 'static {
    /// Handle `error`. Returning `Ok(Flow::Next)` recovers from it.
    fn handle_error(
        &self,
        error: BoxError,
        req: &mut Req,
        res: &mut Res,
    ) -> impl Future<Output = Result<Flow, BoxError>> + Send;
}

/// Object-safe version of [`ErrorMiddleware`].
pub trait DynErrorMiddleware<Req, Res>: Send + Sync + 'static {
    /// Handle `error` (dynamic dispatch version).
    fn handle_error_dyn<'a>(
        &'a self,
        error: BoxError,
        req: &'a mut Req,
        res: &'a mut Res,
    ) -> BoxFuture<'a, Result<Flow, BoxError>>;
}

impl<Req, Res, T: ErrorMiddleware<Req, Res>> DynErrorMiddleware<Req, Res> for T {
    fn handle_error_dyn<'a>(
        &'a self,
        error: BoxError,
        req: &'a mut Req,
        res: &'a mut Res,
    ) -> BoxFuture<'a, Result<Flow, BoxError>> {
        Box::pin(self.handle_error(error, req, res))
    }
}
