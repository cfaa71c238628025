#![allow(dead_code)]

use forkway::{
    BoxError, ErrorMiddleware, Flow, Middleware, Stack,
    testing::{CallLog, Recording},
};
use std::{collections::HashMap, sync::Once, time::Duration};

// ============================================================================
// Test Exchange Types
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct Request {
    pub query: HashMap<String, String>,
    pub test: Option<String>,
}

impl Request {
    pub fn with_query(key: &str, value: &str) -> Self {
        let mut req = Self::default();
        req.query.insert(key.to_owned(), value.to_owned());
        req
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub status: Option<u16>,
    pub body: Option<String>,
}

impl Response {
    pub fn send(&mut self, status: u16, body: impl Into<String>) {
        self.status = Some(status);
        self.body = Some(body.into());
    }
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Answers `200 pass`, or `200 <req.test>` when `echo` is set.
pub struct Responder {
    pub log: CallLog,
    pub echo: bool,
}

impl Responder {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            echo: false,
        }
    }

    pub fn echoing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            echo: true,
        }
    }
}

impl Middleware<Request, Response> for Responder {
    async fn handle(&self, req: &mut Request, res: &mut Response) -> Result<Flow, BoxError> {
        self.log.push("finalMiddleware");
        let body = if self.echo {
            req.test.clone().unwrap_or_default()
        } else {
            "pass".to_owned()
        };
        res.send(200, body);
        Ok(Flow::Halt)
    }
}

/// Answers `400 <error>`.
pub struct ErrorResponder {
    pub log: CallLog,
}

impl ErrorMiddleware<Request, Response> for ErrorResponder {
    async fn handle_error(
        &self,
        error: BoxError,
        _req: &mut Request,
        res: &mut Response,
    ) -> Result<Flow, BoxError> {
        self.log.push("errorMiddleware");
        res.send(400, error.to_string());
        Ok(Flow::Halt)
    }
}

/// Logs `"<name> - start"`, sleeps, logs `"<name> - end"`, then continues.
pub struct Delayed {
    pub name: &'static str,
    pub delay: Duration,
    pub log: CallLog,
}

impl Delayed {
    pub fn new(name: &'static str, millis: u64, log: &CallLog) -> Self {
        Self {
            name,
            delay: Duration::from_millis(millis),
            log: log.clone(),
        }
    }
}

impl Middleware<Request, Response> for Delayed {
    async fn handle(&self, _req: &mut Request, _res: &mut Response) -> Result<Flow, BoxError> {
        self.log.push(format!("{} - start", self.name));
        tokio::time::sleep(self.delay).await;
        self.log.push(format!("{} - end", self.name));
        Ok(Flow::Next)
    }
}

// ============================================================================
// Route Fixture
// ============================================================================

/// `initialMiddleware`, `stage`, the final responder, and the error responder.
pub fn route<M>(log: &CallLog, stage: M) -> Stack<Request, Response>
where
    M: Middleware<Request, Response>,
{
    Stack::new()
        .with(Recording::new("initialMiddleware", log))
        .with(stage)
        .with(Responder::new(log))
        .with_error_handler(ErrorResponder { log: log.clone() })
}

// ============================================================================
// Tracing
// ============================================================================

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
