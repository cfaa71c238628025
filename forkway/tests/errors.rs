use forkway::{
    BoxError, DispatchError, Entry, Flow, Group, Stack, conditional, from_error_fn, group,
    testing::{CallLog, Failing, Panicking, Recording},
};

mod common;
use common::{Request, Response, init_tracing, route};

async fn serve(stack: &Stack<Request, Response>) -> Response {
    let (mut req, mut res) = (Request::default(), Response::default());
    let flow = stack.run(&mut req, &mut res).await.unwrap();
    assert_eq!(flow, Flow::Halt);
    res
}

#[tokio::test]
async fn test_handler_error_reaches_the_error_handler() {
    init_tracing();
    let log = CallLog::new();
    let app = route(
        &log,
        conditional(|_: &Request| true).groups([
            group![
                Recording::new("middleware2", &log),
                Failing::new("middlewareThrowsError", "custom error", &log),
                Recording::new("middleware1", &log)
            ],
            group![Recording::new("middleware3", &log)],
        ]),
    );

    let res = serve(&app).await;

    assert_eq!(res.status, Some(400));
    assert_eq!(res.body.as_deref(), Some("custom error"));
    assert_eq!(
        log.entries(),
        [
            "initialMiddleware",
            "middleware2",
            "middlewareThrowsError",
            "errorMiddleware"
        ]
    );
}

#[tokio::test]
async fn test_error_handler_in_a_group_is_rejected() {
    init_tracing();
    let log = CallLog::new();
    let app = route(
        &log,
        conditional(|_: &Request| true).groups([
            Group::new()
                .with(Recording::new("middleware2", &log))
                .with_entry(Entry::error_middleware(from_error_fn(
                    |_: BoxError, _: &mut Request, _: &mut Response| {},
                ))),
            group![Recording::new("middleware3", &log)],
        ]),
    );

    let res = serve(&app).await;

    assert_eq!(res.status, Some(400));
    assert_eq!(
        res.body.as_deref(),
        Some("error middleware can't be used in a conditional group (position 1)")
    );
    // Nothing in the rejected group ran.
    assert_eq!(log.entries(), ["initialMiddleware", "errorMiddleware"]);
}

#[tokio::test]
async fn test_error_handler_in_an_unselected_group_is_ignored() {
    init_tracing();
    let log = CallLog::new();
    let app = route(
        &log,
        conditional(|_: &Request| false).groups([
            Group::new().with_entry(Entry::error_middleware(from_error_fn(
                |_: BoxError, _: &mut Request, _: &mut Response| {},
            ))),
            group![Recording::new("middleware3", &log)],
        ]),
    );

    let res = serve(&app).await;

    assert_eq!(res.status, Some(200));
    assert_eq!(
        log.entries(),
        ["initialMiddleware", "middleware3", "finalMiddleware"]
    );
}

#[tokio::test]
async fn test_unresolved_entry_is_reported() {
    init_tracing();
    let log = CallLog::new();
    let app = route(
        &log,
        conditional(|_: &Request| "broken").keyed([(
            "broken",
            Group::new()
                .with(Recording::new("middleware1", &log))
                .with_entry(Entry::unresolved("notAFunction")),
        )]),
    );

    let res = serve(&app).await;

    assert_eq!(res.status, Some(400));
    assert_eq!(
        res.body.as_deref(),
        Some("middleware `notAFunction` is not a function")
    );
    assert_eq!(log.count("middleware1"), 0);
}

#[tokio::test]
async fn test_selector_failure_skips_dispatch() {
    init_tracing();
    let log = CallLog::new();
    let app = route(
        &log,
        conditional(|req: &Request| -> Result<bool, BoxError> {
            req.query("flag")
                .ok_or("missing flag")?
                .parse::<bool>()
                .map_err(Into::into)
        })
        .groups([
            group![Recording::new("middleware1", &log)],
            group![Recording::new("middleware2", &log)],
        ]),
    );

    let res = serve(&app).await;

    assert_eq!(res.status, Some(400));
    assert_eq!(
        res.body.as_deref(),
        Some("condition could not be evaluated")
    );
    assert_eq!(log.entries(), ["initialMiddleware", "errorMiddleware"]);
}

#[tokio::test]
async fn test_selector_failure_is_a_dispatch_error() {
    init_tracing();
    let log = CallLog::new();
    let stage = conditional(|_: &Request| -> bool { panic!("no selector today") })
        .groups([group![Recording::new("middleware1", &log)]]);
    let app: Stack<Request, Response> = Stack::new().with(stage);

    let error = app
        .run(&mut Request::default(), &mut Response::default())
        .await
        .unwrap_err();

    match error.downcast_ref::<DispatchError>() {
        Some(DispatchError::ConditionNotCallable(source)) => {
            assert_eq!(source.to_string(), "selector panicked: no selector today");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_handler_panic_becomes_an_error() {
    init_tracing();
    let log = CallLog::new();
    let app = route(
        &log,
        conditional(|_: &Request| 0).groups([group![
            Recording::new("middleware1", &log),
            Panicking::new("handler blew up"),
            Recording::new("middleware2", &log)
        ]]),
    );

    let res = serve(&app).await;

    assert_eq!(res.status, Some(400));
    assert_eq!(
        res.body.as_deref(),
        Some("middleware panicked: handler blew up")
    );
    assert_eq!(
        log.entries(),
        ["initialMiddleware", "middleware1", "errorMiddleware"]
    );
}

#[tokio::test]
async fn test_unhandled_error_is_returned_to_the_caller() {
    init_tracing();
    let log = CallLog::new();
    let app: Stack<Request, Response> = Stack::new()
        .with(Recording::new("initialMiddleware", &log))
        .with(
            conditional(|_: &Request| true)
                .groups([group![Failing::new("middlewareThrowsError", "custom error", &log)]]),
        )
        .with(Recording::new("finalMiddleware", &log));

    let mut res = Response::default();
    let error = app
        .run(&mut Request::default(), &mut res)
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "custom error");
    assert!(error.downcast_ref::<DispatchError>().is_none());
    assert_eq!(log.entries(), ["initialMiddleware", "middlewareThrowsError"]);
    assert_eq!(res, Response::default());
}
