//! Conditional dispatch.
//!
//! A [`Conditional`] is a pipeline stage that evaluates a selector against the
//! request, picks at most one [`Group`] from its [`CandidateSet`], and runs
//! that group's handlers one after another before handing control back to the
//! host.
//!
//! # Example
//!
//! ```rust,ignore
//! use forkway::{conditional, group};
//!
//! // Indexed form: `true` runs the first group, `false` the second.
//! let by_role = conditional(|req: &Request| req.is_admin)
//!     .groups([group![Audit, LoadAdminPanel], group![LoadDashboard]]);
//!
//! // Keyed form: the selector returns the key.
//! let by_tenant = conditional(|req: &Request| req.tenant.clone())
//!     .keyed([("acme", group![AcmeBranding]), ("globex", group![GlobexBranding])]);
//! ```

pub mod candidates;
pub mod dispatcher;

pub use candidates::{CandidateSet, Entry, Group};
pub use dispatcher::{Conditional, ConditionalBuilder, conditional};

/// Build a [`Group`] of ordinary handlers, run in the order written.
///
/// # Example
/// ```ignore
/// let group = group![Authenticate, LoadProfile, conditional(by_plan).groups([...])];
/// ```
#[macro_export]
macro_rules! group {
    () => { $crate::conditional::Group::new() };
    ($($middleware:expr),+ $(,)?) => {
        $crate::conditional::Group::new()$(.with($middleware))+
    };
}
