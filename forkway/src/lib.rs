//! # forkway - Runtime-Selected Handler Groups
//!
//! `forkway` lets one stage of a request pipeline branch on data that only
//! exists at request time. A selector looks at the request, picks exactly one
//! group from a fixed set of candidates, and the group's handlers run one
//! after another before the pipeline continues.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forkway::prelude::*;
//!
//! let by_plan = conditional(|req: &Request| req.plan.clone()).keyed([
//!     ("free", group![RateLimit::strict(), ShowAds]),
//!     ("pro", group![RateLimit::relaxed()]),
//! ]);
//!
//! let stack = Stack::new()
//!     .with(LoadAccount)
//!     .with(by_plan)
//!     .with(Render)
//!     .with_error_handler(RenderError);
//!
//! stack.run(&mut req, &mut res).await?;
//! ```
//!
//! ## Selection
//!
//! | Candidates         | Condition            | Group run         |
//! |--------------------|----------------------|-------------------|
//! | one indexed group  | anything             | that group        |
//! | indexed groups     | `true` / `false`     | first / second    |
//! | indexed groups     | integer `i`          | `i`-th, if any    |
//! | keyed groups       | string `k`           | group `k`, if any |
//!
//! Everything else selects nothing, and the pipeline simply continues.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use forkway_core::{
    // Errors
    BoxError,
    BoxFuture,
    // Conditions
    Condition,
    DispatchError,
    // Handlers
    DynErrorMiddleware,
    DynMiddleware,
    ErrorMiddleware,
    FnErrorMiddleware,
    FnMiddleware,
    Flow,
    IntoCondition,
    IntoFlow,
    Middleware,
    from_error_fn,
    from_fn,
};

// Conditional dispatch
pub use forkway_std::conditional::{
    CandidateSet, Conditional, ConditionalBuilder, Entry, Group, conditional,
};
pub use forkway_std::group;

// Host pipeline
pub use forkway_std::pipeline::Stack;

// Named handlers
pub use forkway_std::registry::{HandlerRegistry, RegistryBuilder};

/// Declarative candidate tables.
#[cfg(feature = "config")]
pub mod config {
    pub use forkway_std::config::{CandidateSpec, ConfigError, DispatchConfig};
}

/// Wrapper middleware.
#[cfg(any(feature = "tracing", feature = "timeout"))]
pub mod middleware {
    #![allow(clippy::wildcard_imports)]
    pub use forkway_std::middleware::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use forkway_std::testing::*;
}

/// Prelude module - common imports for forkway.
///
/// # Usage
///
/// ```rust,ignore
/// use forkway::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Condition, DispatchError, Entry, ErrorMiddleware, Flow, Group, IntoCondition,
        Middleware, Stack, conditional, from_error_fn, from_fn, group,
    };
}
