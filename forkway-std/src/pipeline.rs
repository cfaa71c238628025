//! A sequential host pipeline.
//!
//! [`Stack`] runs its stages in order the way a web framework's route stack
//! does. While no error is pending, ordinary handlers run and error handlers
//! are skipped. Once a stage fails, ordinary handlers are skipped until an
//! error handler takes the error.
//!
//! ```rust,ignore
//! let stack = Stack::new()
//!     .with(LoadSession)
//!     .with(conditional(|req: &Request| req.is_admin).groups([group![AdminOnly], group![]]))
//!     .with(Render)
//!     .with_error_handler(RenderError);
//!
//! stack.run(&mut req, &mut res).await?;
//! ```

use crate::{conditional::Entry, guard::guarded};
use forkway_core::{BoxError, DispatchError, ErrorMiddleware, Flow, Middleware};
use std::fmt;

/// An ordered list of stages run against one exchange at a time.
pub struct Stack<Req, Res> {
    stages: Vec<Entry<Req, Res>>,
}

impl<Req, Res> Stack<Req, Res> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a raw entry.
    pub fn with_entry(mut self, entry: Entry<Req, Res>) -> Self {
        self.stages.push(entry);
        self
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the stack has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<Req, Res> Stack<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Append an ordinary handler.
    pub fn with<M: Middleware<Req, Res>>(self, middleware: M) -> Self {
        self.with_entry(Entry::middleware(middleware))
    }

    /// Append an error handler.
    pub fn with_error_handler<E: ErrorMiddleware<Req, Res>>(self, handler: E) -> Self {
        self.with_entry(Entry::error_middleware(handler))
    }

    /// Run every stage against the exchange.
    ///
    /// Returns `Ok(Flow::Halt)` if a stage ended the exchange, `Ok(Flow::Next)`
    /// if the end of the stack was reached cleanly, and `Err` if an error was
    /// still pending at the end.
    pub async fn run(&self, req: &mut Req, res: &mut Res) -> Result<Flow, BoxError> {
        let mut pending: Option<BoxError> = None;

        for stage in &self.stages {
            let outcome = match (stage, pending.take()) {
                (Entry::Middleware(m), None) => guarded((**m).handle_dyn(req, res)).await,
                (Entry::ErrorMiddleware(h), Some(error)) => {
                    guarded((**h).handle_error_dyn(error, req, res)).await
                }
                (Entry::ErrorMiddleware(_), None) => Ok(Flow::Next),
                (Entry::Unresolved(name), None) => Err(DispatchError::MiddlewareNotFunction {
                    name: name.clone(),
                }
                .into()),
                // Ordinary stages are skipped while an error is pending.
                (_, Some(error)) => Err(error),
            };

            match outcome {
                Ok(Flow::Next) => {}
                Ok(Flow::Halt) => return Ok(Flow::Halt),
                Err(error) => pending = Some(error),
            }
        }

        match pending {
            Some(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%error, "stack finished with an unhandled error");
                Err(error)
            }
            None => Ok(Flow::Next),
        }
    }
}

impl<Req, Res> Middleware<Req, Res> for Stack<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    async fn handle(&self, req: &mut Req, res: &mut Res) -> Result<Flow, BoxError> {
        self.run(req, res).await
    }
}

impl<Req, Res> Default for Stack<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> fmt::Debug for Stack<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack").field("stages", &self.stages).finish()
    }
}
