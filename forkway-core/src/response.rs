//! Conversion of handler outputs into [`Flow`].

use crate::{error::BoxError, middleware::Flow};

/// Trait for converting a closure handler's output into a [`Flow`].
///
/// # Default Implementations
///
/// - `()` → Next
/// - `bool` → `true` = Halt, `false` = Next
/// - `Flow` → As is
/// - `Option<T>` → Delegates to inner `T`, `None` = Next
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be turned into a `Flow`",
    label = "missing `IntoFlow` implementation",
    note = "Closure handlers must return `()`, `bool`, `Flow`, or a `Result` of those."
)]
pub trait IntoFlow {
    /// Convert the output into propagation behavior and optional error.
    fn into_flow(self) -> Result<Flow, BoxError>;
}

impl IntoFlow for () {
    fn into_flow(self) -> Result<Flow, BoxError> {
        Ok(Flow::Next)
    }
}

impl IntoFlow for bool {
    fn into_flow(self) -> Result<Flow, BoxError> {
        Ok(if self { Flow::Halt } else { Flow::Next })
    }
}

impl IntoFlow for Flow {
    fn into_flow(self) -> Result<Flow, BoxError> {
        Ok(self)
    }
}

impl<T: IntoFlow> IntoFlow for Option<T> {
    fn into_flow(self) -> Result<Flow, BoxError> {
        match self {
            Some(t) => t.into_flow(),
            None => Ok(Flow::Next),
        }
    }
}

impl<T, E> IntoFlow for Result<T, E>
where
    T: IntoFlow,
    E: Into<BoxError>,
{
    fn into_flow(self) -> Result<Flow, BoxError> {
        match self {
            Ok(t) => t.into_flow(),
            Err(e) => Err(e.into()),
        }
    }
}
