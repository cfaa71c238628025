//! Candidate groups and the selection algorithm.

use forkway_core::{
    Condition, DispatchError, DynErrorMiddleware, DynMiddleware, ErrorMiddleware, Middleware,
};
use std::{collections::BTreeMap, fmt, sync::Arc};

/// One slot of a [`Group`] or a [`Stack`](crate::pipeline::Stack).
///
/// The kind is declared when the entry is created, so containers can tell an
/// error handler from an ordinary one without inspecting it.
pub enum Entry<Req, Res> {
    /// An ordinary handler.
    Middleware(Arc<dyn DynMiddleware<Req, Res>>),
    /// An error handler.
    ErrorMiddleware(Arc<dyn DynErrorMiddleware<Req, Res>>),
    /// A named reference that did not resolve to a handler.
    Unresolved(String),
}

impl<Req, Res> Entry<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Wrap an ordinary handler.
    pub fn middleware<M: Middleware<Req, Res>>(middleware: M) -> Self {
        Entry::Middleware(Arc::new(middleware))
    }

    /// Wrap an error handler.
    pub fn error_middleware<E: ErrorMiddleware<Req, Res>>(handler: E) -> Self {
        Entry::ErrorMiddleware(Arc::new(handler))
    }

    /// A placeholder for a name that could not be resolved.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Entry::Unresolved(name.into())
    }
}

impl<Req, Res> Clone for Entry<Req, Res> {
    fn clone(&self) -> Self {
        match self {
            Entry::Middleware(m) => Entry::Middleware(Arc::clone(m)),
            Entry::ErrorMiddleware(e) => Entry::ErrorMiddleware(Arc::clone(e)),
            Entry::Unresolved(name) => Entry::Unresolved(name.clone()),
        }
    }
}

impl<Req, Res> fmt::Debug for Entry<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Middleware(_) => f.write_str("Middleware"),
            Entry::ErrorMiddleware(_) => f.write_str("ErrorMiddleware"),
            Entry::Unresolved(name) => f.debug_tuple("Unresolved").field(name).finish(),
        }
    }
}

/// An ordered sequence of handlers, selected and run as a unit.
pub struct Group<Req, Res> {
    entries: Vec<Entry<Req, Res>>,
}

impl<Req, Res> Group<Req, Res> {
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a raw entry.
    pub fn with_entry(mut self, entry: Entry<Req, Res>) -> Self {
        self.entries.push(entry);
        self
    }

    /// The entries in execution order.
    pub fn entries(&self) -> &[Entry<Req, Res>] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every entry and collect the runnable handlers.
    ///
    /// Fails on the first entry that is not an ordinary handler, before any
    /// handler has run.
    pub fn bind(&self) -> Result<Vec<&Arc<dyn DynMiddleware<Req, Res>>>, DispatchError> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, entry)| match entry {
                Entry::Middleware(m) => Ok(m),
                Entry::ErrorMiddleware(_) => {
                    Err(DispatchError::ErrorMiddlewareNotAllowed { position })
                }
                Entry::Unresolved(name) => Err(DispatchError::MiddlewareNotFunction {
                    name: name.clone(),
                }),
            })
            .collect()
    }
}

impl<Req, Res> Group<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Append an ordinary handler.
    pub fn with<M: Middleware<Req, Res>>(self, middleware: M) -> Self {
        self.with_entry(Entry::middleware(middleware))
    }
}

impl<Req, Res> Default for Group<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> Clone for Group<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<Req, Res> fmt::Debug for Group<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

impl<Req, Res> From<Vec<Entry<Req, Res>>> for Group<Req, Res> {
    fn from(entries: Vec<Entry<Req, Res>>) -> Self {
        Self { entries }
    }
}

impl<Req, Res> FromIterator<Entry<Req, Res>> for Group<Req, Res> {
    fn from_iter<I: IntoIterator<Item = Entry<Req, Res>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Every group a dispatcher can choose from.
///
/// The shape is fixed when the dispatcher is built and never changes.
pub enum CandidateSet<Req, Res> {
    /// Groups addressed by position.
    Indexed(Vec<Group<Req, Res>>),
    /// Groups addressed by key.
    Keyed(BTreeMap<String, Group<Req, Res>>),
    /// Input of an unsupported shape. Selects nothing.
    Unrecognized,
}

impl<Req, Res> CandidateSet<Req, Res> {
    /// Build the indexed form.
    pub fn indexed(groups: impl IntoIterator<Item = Group<Req, Res>>) -> Self {
        CandidateSet::Indexed(groups.into_iter().collect())
    }

    /// Build the keyed form.
    pub fn keyed<K: Into<String>>(groups: impl IntoIterator<Item = (K, Group<Req, Res>)>) -> Self {
        CandidateSet::Keyed(groups.into_iter().map(|(k, g)| (k.into(), g)).collect())
    }

    /// `true` for the indexed form with no groups.
    ///
    /// A keyed form with an empty map is not empty in this sense: it still
    /// goes through selection, which then finds nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, CandidateSet::Indexed(groups) if groups.is_empty())
    }

    /// Number of groups on offer.
    pub fn len(&self) -> usize {
        match self {
            CandidateSet::Indexed(groups) => groups.len(),
            CandidateSet::Keyed(groups) => groups.len(),
            CandidateSet::Unrecognized => 0,
        }
    }

    /// Resolve the group for `condition`, if any.
    ///
    /// - Indexed, one group: that group, whatever the condition.
    /// - Indexed, several groups: `true` → first, `false` → second,
    ///   an integer → the group at that position.
    /// - Keyed: the group stored under the string key.
    ///
    /// Every other combination selects nothing.
    pub fn select(&self, condition: &Condition) -> Option<&Group<Req, Res>> {
        match self {
            CandidateSet::Indexed(groups) => match groups.as_slice() {
                [] => None,
                [only] => Some(only),
                _ => match condition {
                    Condition::Bool(true) => groups.first(),
                    Condition::Bool(false) => groups.get(1),
                    Condition::Index(i) => usize::try_from(*i).ok().and_then(|i| groups.get(i)),
                    Condition::Key(_) | Condition::Other => None,
                },
            },
            CandidateSet::Keyed(groups) => match condition {
                Condition::Key(key) => groups.get(key),
                _ => None,
            },
            CandidateSet::Unrecognized => None,
        }
    }
}

impl<Req, Res> Clone for CandidateSet<Req, Res> {
    fn clone(&self) -> Self {
        match self {
            CandidateSet::Indexed(groups) => CandidateSet::Indexed(groups.clone()),
            CandidateSet::Keyed(groups) => CandidateSet::Keyed(groups.clone()),
            CandidateSet::Unrecognized => CandidateSet::Unrecognized,
        }
    }
}

impl<Req, Res> fmt::Debug for CandidateSet<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSet::Indexed(groups) => f.debug_tuple("Indexed").field(groups).finish(),
            CandidateSet::Keyed(groups) => f.debug_tuple("Keyed").field(groups).finish(),
            CandidateSet::Unrecognized => f.write_str("Unrecognized"),
        }
    }
}
