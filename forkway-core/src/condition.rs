//! Selector results.
//!
//! A selector is any `Fn(&Req) -> C` where `C: IntoCondition`. Its output is
//! normalised into a [`Condition`], which is what group selection matches on.

use crate::error::BoxError;
use std::borrow::Cow;

/// The value a selector produced, reduced to the shapes selection understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Picks between the first (`true`) and second (`false`) group.
    Bool(bool),
    /// Picks a group by position.
    Index(i64),
    /// Picks a group by key.
    Key(String),
    /// Anything else. Never selects a group unless only one is offered.
    Other,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Bool(b) => write!(f, "{b}"),
            Condition::Index(i) => write!(f, "#{i}"),
            Condition::Key(k) => write!(f, "{k:?}"),
            Condition::Other => f.write_str("<other>"),
        }
    }
}

/// Conversion of selector outputs into a [`Condition`].
///
/// Returning `Err` means the selector failed; the dispatcher reports it as
/// [`DispatchError::ConditionNotCallable`](crate::DispatchError::ConditionNotCallable).
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a selector result",
    label = "missing `IntoCondition` implementation",
    note = "Selectors must return a bool, an integer, a string, an `Option` or `Result` of those, or a `Condition`."
)]
pub trait IntoCondition {
    /// Normalise the selector output.
    fn into_condition(self) -> Result<Condition, BoxError>;
}

impl IntoCondition for Condition {
    fn into_condition(self) -> Result<Condition, BoxError> {
        Ok(self)
    }
}

impl IntoCondition for bool {
    fn into_condition(self) -> Result<Condition, BoxError> {
        Ok(Condition::Bool(self))
    }
}

impl IntoCondition for () {
    fn into_condition(self) -> Result<Condition, BoxError> {
        Ok(Condition::Other)
    }
}

macro_rules! impl_into_condition_for_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoCondition for $ty {
                fn into_condition(self) -> Result<Condition, BoxError> {
                    Ok(i64::try_from(self).map_or(Condition::Other, Condition::Index))
                }
            }
        )*
    };
}

impl_into_condition_for_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl IntoCondition for f64 {
    fn into_condition(self) -> Result<Condition, BoxError> {
        let integral = self.is_finite()
            && self.fract() == 0.0
            && self >= i64::MIN as f64
            && self < i64::MAX as f64;
        Ok(if integral {
            Condition::Index(self as i64)
        } else {
            Condition::Other
        })
    }
}

impl IntoCondition for f32 {
    fn into_condition(self) -> Result<Condition, BoxError> {
        f64::from(self).into_condition()
    }
}

impl IntoCondition for String {
    fn into_condition(self) -> Result<Condition, BoxError> {
        Ok(Condition::Key(self))
    }
}

impl IntoCondition for &str {
    fn into_condition(self) -> Result<Condition, BoxError> {
        Ok(Condition::Key(self.to_owned()))
    }
}

impl IntoCondition for &String {
    fn into_condition(self) -> Result<Condition, BoxError> {
        Ok(Condition::Key(self.clone()))
    }
}

impl IntoCondition for Cow<'_, str> {
    fn into_condition(self) -> Result<Condition, BoxError> {
        Ok(Condition::Key(self.into_owned()))
    }
}

impl<T: IntoCondition> IntoCondition for Option<T> {
    fn into_condition(self) -> Result<Condition, BoxError> {
        match self {
            Some(t) => t.into_condition(),
            None => Ok(Condition::Other),
        }
    }
}

impl<T, E> IntoCondition for Result<T, E>
where
    T: IntoCondition,
    E: Into<BoxError>,
{
    fn into_condition(self) -> Result<Condition, BoxError> {
        match self {
            Ok(t) => t.into_condition(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(value: impl IntoCondition) -> Condition {
        value.into_condition().unwrap()
    }

    #[test]
    fn integers_become_indices() {
        assert_eq!(cond(2_u8), Condition::Index(2));
        assert_eq!(cond(-1_i32), Condition::Index(-1));
        assert_eq!(cond(7_usize), Condition::Index(7));
        assert_eq!(cond(u64::MAX), Condition::Other);
    }

    #[test]
    fn floats_only_when_integral() {
        assert_eq!(cond(1.0_f64), Condition::Index(1));
        assert_eq!(cond(1.5_f64), Condition::Other);
        assert_eq!(cond(f64::NAN), Condition::Other);
        assert_eq!(cond(f32::INFINITY), Condition::Other);
    }

    #[test]
    fn strings_become_keys() {
        assert_eq!(cond("admin"), Condition::Key("admin".into()));
        assert_eq!(cond(String::from("x")), Condition::Key("x".into()));
        assert_eq!(cond(Cow::Borrowed("y")), Condition::Key("y".into()));
    }

    #[test]
    fn options_and_results() {
        assert_eq!(cond(None::<bool>), Condition::Other);
        assert_eq!(cond(Some(true)), Condition::Bool(true));
        assert_eq!(cond(Ok::<_, BoxError>(3)), Condition::Index(3));
        assert_eq!(cond(()), Condition::Other);

        let failed = Err::<bool, _>("no header").into_condition();
        assert_eq!(failed.unwrap_err().to_string(), "no header");
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Condition::Bool(false).to_string(), "false");
        assert_eq!(Condition::Index(3).to_string(), "#3");
        assert_eq!(Condition::Key("a".into()).to_string(), "\"a\"");
        assert_eq!(Condition::Other.to_string(), "<other>");
    }
}
