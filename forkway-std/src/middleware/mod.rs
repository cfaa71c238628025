//! Wrapper middleware.
//!
//! These wrap another handler and add host-side behavior around it. They are
//! ordinary handlers, so they can be placed in groups and stacks alike.

#[cfg(feature = "tracing")]
pub mod logging;
#[cfg(feature = "timeout")]
pub mod timeout;

#[cfg(feature = "tracing")]
pub use logging::Logged;
#[cfg(feature = "timeout")]
pub use timeout::{Timeout, TimeoutError};
