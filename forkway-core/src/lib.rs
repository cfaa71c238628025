//! # forkway-core
//!
//! Core traits for the forkway conditional dispatch framework.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that only needs to *write* handlers, without pulling in the dispatcher
//! implementation from `forkway-std`.
//!
//! # Building Blocks
//!
//! ## Handlers ([`Middleware`])
//!
//! The unit of request processing. A handler receives the shared request and
//! response and resolves to a [`Flow`]: continue with the next stage, or halt
//! because the exchange has been answered. Returning an error is the
//! equivalent of passing an error to the continuation.
//!
//! ## Error handlers ([`ErrorMiddleware`])
//!
//! Handlers that receive a pending error. They are a separate *declared*
//! kind so that containers can reject them where they do not belong.
//!
//! ## Conditions ([`Condition`])
//!
//! The closed set of values a selector can produce. Anything implementing
//! [`IntoCondition`] can be returned from a selector closure.
//!
//! # Error Types
//!
//! - [`BoxError`] - Error currency carried between stages
//! - [`DispatchError`] - Errors raised by the dispatcher itself

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod condition;
mod error;
mod handler;
mod middleware;
mod response;

// Re-exports
pub use condition::{Condition, IntoCondition};
pub use error::{BoxError, DispatchError};
pub use handler::{FnErrorMiddleware, FnMiddleware, from_error_fn, from_fn};
pub use middleware::{
    BoxFuture, DynErrorMiddleware, DynMiddleware, ErrorMiddleware, Flow, Middleware,
};
pub use response::IntoFlow;
