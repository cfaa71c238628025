//! Testing utilities for forkway.
//!
//! Handlers in this module are generic over the request and response types,
//! so they can be dropped into any group or stack under test.
//!
//! # Features
//!
//! - [`CallLog`]: A shared, ordered record of handler invocations
//! - [`Recording`]: Logs its name and continues
//! - [`Failing`]: Logs its name and fails with a fixed message
//! - [`Halting`]: Logs its name and ends the exchange
//! - [`Panicking`]: Panics when run
//! - [`Counting`]: Counts invocations
//! - [`ErrorRecorder`]: An error handler that logs the error it receives

use forkway_core::{BoxError, ErrorMiddleware, Flow, Middleware};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Call Log
// ============================================================================

/// An ordered log shared between handlers.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// let stage = conditional(|_: &Req| true).groups([group![Recording::new("a", &log)]]);
///
/// stage.handle(&mut req, &mut res).await?;
/// assert_eq!(log.entries(), ["a"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// A copy of the entries so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times `entry` was logged.
    pub fn count(&self, entry: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.as_str() == entry)
            .count()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// A handler that logs its name and continues.
pub struct Recording {
    name: String,
    log: CallLog,
}

impl Recording {
    /// Create a recording handler writing to `log`.
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

impl<Req: Send, Res: Send> Middleware<Req, Res> for Recording {
    async fn handle(&self, _req: &mut Req, _res: &mut Res) -> Result<Flow, BoxError> {
        self.log.push(self.name.as_str());
        Ok(Flow::Next)
    }
}

/// A handler that logs its name and fails.
pub struct Failing {
    name: String,
    message: String,
    log: CallLog,
}

impl Failing {
    /// Create a handler failing with `message`.
    pub fn new(name: impl Into<String>, message: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            log: log.clone(),
        }
    }
}

impl<Req: Send, Res: Send> Middleware<Req, Res> for Failing {
    async fn handle(&self, _req: &mut Req, _res: &mut Res) -> Result<Flow, BoxError> {
        self.log.push(self.name.as_str());
        Err(self.message.clone().into())
    }
}

/// A handler that logs its name and ends the exchange.
pub struct Halting {
    name: String,
    log: CallLog,
}

impl Halting {
    /// Create a halting handler writing to `log`.
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

impl<Req: Send, Res: Send> Middleware<Req, Res> for Halting {
    async fn handle(&self, _req: &mut Req, _res: &mut Res) -> Result<Flow, BoxError> {
        self.log.push(self.name.as_str());
        Ok(Flow::Halt)
    }
}

/// A handler that panics with a fixed message.
pub struct Panicking {
    message: &'static str,
}

impl Panicking {
    /// Create a handler that panics with `message`.
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl<Req: Send, Res: Send> Middleware<Req, Res> for Panicking {
    async fn handle(&self, _req: &mut Req, _res: &mut Res) -> Result<Flow, BoxError> {
        panic!("{}", self.message)
    }
}

/// A handler that counts invocations.
#[derive(Clone, Debug, Default)]
pub struct Counting {
    count: Arc<AtomicUsize>,
}

impl Counting {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<Req: Send, Res: Send> Middleware<Req, Res> for Counting {
    async fn handle(&self, _req: &mut Req, _res: &mut Res) -> Result<Flow, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(Flow::Next)
    }
}

/// An error handler that logs `"{name}: {error}"` and ends the exchange.
pub struct ErrorRecorder {
    name: String,
    log: CallLog,
}

impl ErrorRecorder {
    /// Create an error recorder writing to `log`.
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

impl<Req: Send, Res: Send> ErrorMiddleware<Req, Res> for ErrorRecorder {
    async fn handle_error(
        &self,
        error: BoxError,
        _req: &mut Req,
        _res: &mut Res,
    ) -> Result<Flow, BoxError> {
        self.log.push(format!("{}: {error}", self.name));
        Ok(Flow::Halt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn helpers_log_in_order() {
        let log = CallLog::new();
        let counter = Counting::new();

        let recording = Recording::new("a", &log);
        let failing = Failing::new("b", "nope", &log);
        let halting = Halting::new("c", &log);
        let recorder = ErrorRecorder::new("err", &log);

        let (mut req, mut res) = ((), ());
        assert_eq!(
            recording.handle(&mut req, &mut res).await.unwrap(),
            Flow::Next
        );
        let error = failing.handle(&mut req, &mut res).await.unwrap_err();
        assert_eq!(halting.handle(&mut req, &mut res).await.unwrap(), Flow::Halt);
        recorder.handle_error(error, &mut req, &mut res).await.unwrap();
        Middleware::<(), ()>::handle(&counter, &mut req, &mut res)
            .await
            .unwrap();

        assert_eq!(log.entries(), ["a", "b", "c", "err: nope"]);
        assert_eq!(log.count("a"), 1);
        assert_eq!(counter.count(), 1);

        log.clear();
        counter.reset();
        assert!(log.is_empty());
        assert_eq!(counter.count(), 0);
    }
}
