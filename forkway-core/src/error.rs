//! Error types for forkway.
//!
//! - [`BoxError`] - The error value handed from stage to stage
//! - [`DispatchError`] - Errors produced by the conditional dispatcher

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the conditional dispatcher itself.
///
/// Errors returned by user handlers are never wrapped in this type; they are
/// forwarded to the host unchanged.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The selector failed while computing the condition.
    #[error("condition could not be evaluated")]
    ConditionNotCallable(#[source] BoxError),

    /// The selected group contains an error handler.
    #[error("error middleware can't be used in a conditional group (position {position})")]
    ErrorMiddlewareNotAllowed {
        /// Index of the offending entry within its group.
        position: usize,
    },

    /// The selected group contains an entry that is not an invocable handler.
    #[error("middleware `{name}` is not a function")]
    MiddlewareNotFunction {
        /// Name under which the entry was declared.
        name: String,
    },

    /// A handler panicked while running.
    #[error("middleware panicked: {0}")]
    MiddlewarePanicked(String),
}

impl DispatchError {
    /// Wrap a selector failure.
    pub fn condition(source: impl Into<BoxError>) -> Self {
        DispatchError::ConditionNotCallable(source.into())
    }

    /// Wrap a selector panic, given the payload captured by `catch_unwind`.
    pub fn selector_panicked(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = format!("selector panicked: {}", panic_message(payload.as_ref()));
        DispatchError::ConditionNotCallable(message.into())
    }

    /// Build a handler panic error from the payload captured by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        DispatchError::MiddlewarePanicked(panic_message(payload.as_ref()))
    }
}

/// Extract the message of a panic payload, if it carried one.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
