//! The conditional dispatcher stage.

use super::candidates::{CandidateSet, Group};
use crate::guard::guarded;
use forkway_core::{BoxError, Condition, DispatchError, Flow, IntoCondition, Middleware};
use std::{borrow::Cow, panic::AssertUnwindSafe};

/// Start building a conditional stage around `selector`.
///
/// The selector runs once per request. Its output, converted through
/// [`IntoCondition`], decides which group of the candidate set runs.
///
/// Selectors take the request by shared reference and must return an owned
/// value: clone a field rather than borrowing it.
pub fn conditional<S>(selector: S) -> ConditionalBuilder<S> {
    ConditionalBuilder {
        selector,
        name: Cow::Borrowed("conditional"),
    }
}

/// Builder returned by [`conditional`]; supply the candidates to finish it.
pub struct ConditionalBuilder<S> {
    selector: S,
    name: Cow<'static, str>,
}

impl<S> ConditionalBuilder<S> {
    /// Name the stage in log output.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Offer groups addressed by position.
    pub fn groups<Req, Res, C, I>(self, groups: I) -> Conditional<S, Req, Res>
    where
        S: Fn(&Req) -> C,
        C: IntoCondition,
        I: IntoIterator<Item = Group<Req, Res>>,
    {
        self.candidates(CandidateSet::indexed(groups))
    }

    /// Offer groups addressed by key.
    pub fn keyed<Req, Res, C, K, I>(self, groups: I) -> Conditional<S, Req, Res>
    where
        S: Fn(&Req) -> C,
        C: IntoCondition,
        K: Into<String>,
        I: IntoIterator<Item = (K, Group<Req, Res>)>,
    {
        self.candidates(CandidateSet::keyed(groups))
    }

    /// Offer no groups. Every dispatch passes straight through.
    pub fn empty<Req, Res, C>(self) -> Conditional<S, Req, Res>
    where
        S: Fn(&Req) -> C,
        C: IntoCondition,
    {
        self.candidates(CandidateSet::Indexed(Vec::new()))
    }

    /// Offer a prebuilt candidate set.
    pub fn candidates<Req, Res, C>(
        self,
        candidates: CandidateSet<Req, Res>,
    ) -> Conditional<S, Req, Res>
    where
        S: Fn(&Req) -> C,
        C: IntoCondition,
    {
        Conditional {
            selector: self.selector,
            candidates,
            name: self.name,
        }
    }
}

/// A stage that runs one group of handlers chosen per request.
///
/// `Conditional` is itself a [`Middleware`], so it can sit in a host
/// pipeline or inside another conditional's group.
pub struct Conditional<S, Req, Res> {
    selector: S,
    candidates: CandidateSet<Req, Res>,
    name: Cow<'static, str>,
}

impl<S, Req, Res> Conditional<S, Req, Res> {
    /// The candidates this stage chooses from.
    pub fn candidate_set(&self) -> &CandidateSet<Req, Res> {
        &self.candidates
    }

    /// The stage name used in log output.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S, C, Req, Res> Conditional<S, Req, Res>
where
    S: Fn(&Req) -> C,
    C: IntoCondition,
{
    /// Run the selector, containing both returned errors and panics.
    pub fn evaluate(&self, req: &Req) -> Result<Condition, DispatchError> {
        let output = std::panic::catch_unwind(AssertUnwindSafe(|| (self.selector)(req)))
            .map_err(DispatchError::selector_panicked)?;
        output
            .into_condition()
            .map_err(DispatchError::ConditionNotCallable)
    }

    /// The group this request would run, without running it.
    pub fn resolve(&self, req: &Req) -> Result<Option<&Group<Req, Res>>, DispatchError> {
        let condition = self.evaluate(req)?;
        Ok(self.candidates.select(&condition))
    }
}

impl<S, C, Req, Res> Middleware<Req, Res> for Conditional<S, Req, Res>
where
    S: Fn(&Req) -> C + Send + Sync + 'static,
    C: IntoCondition,
    Req: Send + 'static,
    Res: Send + 'static,
{
    async fn handle(&self, req: &mut Req, res: &mut Res) -> Result<Flow, BoxError> {
        let condition = self.evaluate(req).inspect_err(|_error| {
            #[cfg(feature = "tracing")]
            tracing::warn!(stage = %self.name, error = %_error, "selector failed");
        })?;

        if self.candidates.is_empty() {
            return Ok(Flow::Next);
        }

        let Some(group) = self.candidates.select(&condition) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(stage = %self.name, %condition, "no group selected");
            return Ok(Flow::Next);
        };

        let handlers = group.bind().inspect_err(|_error| {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                stage = %self.name,
                %condition,
                error = %_error,
                "selected group rejected"
            );
        })?;

        #[cfg(feature = "tracing")]
        tracing::trace!(stage = %self.name, %condition, handlers = handlers.len(), "running group");

        for handler in handlers {
            match guarded((**handler).handle_dyn(req, res)).await? {
                Flow::Next => continue,
                Flow::Halt => return Ok(Flow::Halt),
            }
        }

        Ok(Flow::Next)
    }
}
