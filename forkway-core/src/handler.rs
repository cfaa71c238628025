//! Closure adapters.
//!
//! Synchronous closures are the most common way to write small handlers.
//! Asynchronous handlers implement [`Middleware`] directly.
//!
//! ```rust,ignore
//! let tag = from_fn(|req: &mut Request, _res: &mut Response| {
//!     req.tags.push("seen");
//! });
//!
//! let reject = from_fn(|req: &mut Request, _res: &mut Response| {
//!     if req.user.is_none() {
//!         return Err("unauthenticated");
//!     }
//!     Ok(())
//! });
//! ```

use crate::{
    error::BoxError,
    middleware::{ErrorMiddleware, Flow, Middleware},
    response::IntoFlow,
};

/// A [`Middleware`] backed by a synchronous closure.
#[derive(Clone)]
pub struct FnMiddleware<F> {
    f: F,
}

/// Wrap a closure `Fn(&mut Req, &mut Res) -> impl IntoFlow` as a handler.
pub fn from_fn<F>(f: F) -> FnMiddleware<F> {
    FnMiddleware { f }
}

impl<Req, Res, F, R> Middleware<Req, Res> for FnMiddleware<F>
where
    Req: Send,
    Res: Send,
    F: Fn(&mut Req, &mut Res) -> R + Send + Sync + 'static,
    R: IntoFlow,
{
    async fn handle(&self, req: &mut Req, res: &mut Res) -> Result<Flow, BoxError> {
        (self.f)(req, res).into_flow()
    }
}

/// An [`ErrorMiddleware`] backed by a synchronous closure.
#[derive(Clone)]
pub struct FnErrorMiddleware<F> {
    f: F,
}

/// Wrap a closure `Fn(BoxError, &mut Req, &mut Res) -> impl IntoFlow` as an
/// error handler.
pub fn from_error_fn<F>(f: F) -> FnErrorMiddleware<F> {
    FnErrorMiddleware { f }
}

impl<Req, Res, F, R> ErrorMiddleware<Req, Res> for FnErrorMiddleware<F>
where
    Req: Send,
    Res: Send,
    F: Fn(BoxError, &mut Req, &mut Res) -> R + Send + Sync + 'static,
    R: IntoFlow,
{
    async fn handle_error(
        &self,
        error: BoxError,
        req: &mut Req,
        res: &mut Res,
    ) -> Result<Flow, BoxError> {
        (self.f)(error, req, res).into_flow()
    }
}
