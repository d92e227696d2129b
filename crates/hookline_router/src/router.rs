//! The router: route-table construction and per-request dispatch.

use std::sync::Arc;

use hashbrown::HashMap;
use hookline_chain::{
    Chain, ChainError, ChainingStrategy, DuplicateNextPolicy, StopAtFirstError,
};
use hookline_context::RequestContext;

use crate::error_handler::{ErrorHandler, Rethrow};
use crate::http::{HttpRequest, HttpResponse};
use crate::method::Method;
use crate::route::RouteDefinition;

/// Produces the body written on a route miss.
pub type MissingResponse = Box<dyn Fn() -> serde_json::Value + Send + Sync>;

fn default_missing_response() -> serde_json::Value {
    serde_json::json!({ "message": "not found" })
}

/// Builder for a [`Router`].
///
/// Collects route definitions and dispatch-wide configuration, then
/// assembles every definition into an executable chain in [`build`].
///
/// [`build`]: RouterBuilder::build
pub struct RouterBuilder<R, W> {
    routes: HashMap<Method, RouteDefinition<R, W>>,
    strategy: Arc<dyn ChainingStrategy<R, W>>,
    duplicate_next: DuplicateNextPolicy,
    missing_response: MissingResponse,
    error_handler: Box<dyn ErrorHandler<R, W>>,
}

impl<R, W> RouterBuilder<R, W>
where
    R: HttpRequest + 'static,
    W: HttpResponse + 'static,
{
    /// Creates a builder with fail-fast chaining, the rethrowing error
    /// handler, and a plain `{"message": "not found"}` miss body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            strategy: Arc::new(StopAtFirstError),
            duplicate_next: DuplicateNextPolicy::default(),
            missing_response: Box::new(default_missing_response),
            error_handler: Box::new(Rethrow),
        }
    }

    /// Registers a route definition under a method.
    ///
    /// Registering the same method twice replaces the earlier definition.
    #[must_use]
    pub fn route(mut self, method: Method, definition: RouteDefinition<R, W>) -> Self {
        if self.routes.insert(method, definition).is_some() {
            tracing::warn!(%method, "route definition replaced by a later registration");
        }
        self
    }

    /// Sets the chaining strategy applied to every route's stages.
    #[must_use]
    pub fn with_chaining_strategy(
        mut self,
        strategy: impl ChainingStrategy<R, W> + 'static,
    ) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Sets how a stage invoking its continuation twice is treated.
    #[must_use]
    pub fn with_duplicate_next_policy(mut self, policy: DuplicateNextPolicy) -> Self {
        self.duplicate_next = policy;
        self
    }

    /// Replaces the body written on a route miss.
    #[must_use]
    pub fn with_missing_response(
        mut self,
        body: impl Fn() -> serde_json::Value + Send + Sync + 'static,
    ) -> Self {
        self.missing_response = Box::new(body);
        self
    }

    /// Replaces the terminal error handler.
    #[must_use]
    pub fn with_error_handler(mut self, handler: impl ErrorHandler<R, W> + 'static) -> Self {
        self.error_handler = Box::new(handler);
        self
    }

    /// Assembles every registered definition into its executable chain.
    ///
    /// Chains are built once here, with the configured strategy applied per
    /// stage; dispatch only ever reads them.
    #[must_use]
    pub fn build(self) -> Router<R, W> {
        let Self {
            routes,
            strategy,
            duplicate_next,
            missing_response,
            error_handler,
        } = self;

        let routes = routes
            .into_iter()
            .map(|(method, definition)| {
                let chain = Chain::assemble(
                    definition.pre_hooks,
                    definition.handler,
                    definition.post_hooks,
                    strategy.as_ref(),
                    duplicate_next,
                );
                tracing::debug!(%method, stages = chain.stage_count(), "route assembled");
                (method, chain)
            })
            .collect();

        Router {
            routes,
            missing_response,
            error_handler,
        }
    }
}

impl<R, W> Default for RouterBuilder<R, W>
where
    R: HttpRequest + 'static,
    W: HttpResponse + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// An assembled route table, shared immutably across requests.
pub struct Router<R, W> {
    routes: HashMap<Method, Chain<R, W>>,
    missing_response: MissingResponse,
    error_handler: Box<dyn ErrorHandler<R, W>>,
}

impl<R, W> Router<R, W>
where
    R: HttpRequest + 'static,
    W: HttpResponse + 'static,
{
    /// Starts building a router.
    #[must_use]
    pub fn builder() -> RouterBuilder<R, W> {
        RouterBuilder::new()
    }

    /// Dispatches one request through its route's chain.
    ///
    /// An unknown or unregistered method writes a 404 with the configured
    /// miss body and succeeds. Otherwise the chain runs with a fresh
    /// [`RequestContext`]; an error escaping the chain goes to the error
    /// handler, which may consume it. The context is destroyed on every
    /// exit path.
    ///
    /// # Errors
    ///
    /// Returns whatever the error handler lets through, or a
    /// [`ChainError::Disposal`] when teardown itself fails — a teardown
    /// failure supersedes the prior outcome.
    pub async fn dispatch(&self, req: &mut R, res: &mut W) -> Result<(), ChainError> {
        let Some(chain) = Method::parse(req.method()).and_then(|m| self.routes.get(&m)) else {
            tracing::debug!(method = req.method(), "no route for method, responding 404");
            res.set_status(404);
            res.write_json((self.missing_response)());
            return Ok(());
        };

        let mut ctx = RequestContext::new();
        let outcome = match chain.run(req, res, &mut ctx).await {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::debug!(%error, "chain failed, delegating to the error handler");
                self.error_handler.handle(error, req, res, &mut ctx).await
            }
        };

        match ctx.destroy().await {
            Ok(()) => outcome,
            Err(disposal) => {
                if let Err(prior) = &outcome {
                    tracing::warn!(%prior, "request error superseded by a teardown failure");
                }
                Err(ChainError::Disposal(disposal))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use hookline_chain::{BoxError, Next};
    use hookline_context::BoxFuture;
    use serde_json::json;

    use super::*;

    #[derive(Debug)]
    struct TestRequest {
        method: String,
    }

    impl TestRequest {
        fn new(method: &str) -> Self {
            Self {
                method: method.to_owned(),
            }
        }
    }

    impl HttpRequest for TestRequest {
        fn method(&self) -> &str {
            &self.method
        }
    }

    #[derive(Debug, Default)]
    struct TestResponse {
        status: Option<u16>,
        body: Option<serde_json::Value>,
    }

    impl HttpResponse for TestResponse {
        fn set_status(&mut self, status: u16) {
            self.status = Some(status);
        }

        fn write_json(&mut self, body: serde_json::Value) {
            self.body = Some(body);
        }
    }

    fn ok_handler<'a>(
        _req: &'a mut TestRequest,
        res: &'a mut TestResponse,
        _ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            res.set_status(200);
            res.write_json(json!({ "ok": true }));
            Ok(())
        })
    }

    fn failing_handler<'a>(
        _req: &'a mut TestRequest,
        _res: &'a mut TestResponse,
        _ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move { Err("boom".into()) })
    }

    /// Adds one context item whose disposer flips `disposed` (or fails).
    struct DisposerHook {
        disposed: Arc<AtomicBool>,
        fail: bool,
    }

    impl hookline_chain::Hook<TestRequest, TestResponse> for DisposerHook {
        fn call<'a>(
            &'a self,
            req: &'a mut TestRequest,
            res: &'a mut TestResponse,
            ctx: &'a mut RequestContext,
            next: &'a mut Next<TestRequest, TestResponse>,
        ) -> BoxFuture<'a, Result<(), ChainError>> {
            let disposed = Arc::clone(&self.disposed);
            let fail = self.fail;
            Box::pin(async move {
                ctx.add_item_with_disposer("conn", 7_u32, move |_| async move {
                    disposed.store(true, Ordering::SeqCst);
                    if fail {
                        Err("socket refused to close".into())
                    } else {
                        Ok(())
                    }
                });
                next.run(req, res, ctx).await
            })
        }
    }

    /// Consumes any error and writes a 500 with the error text.
    struct JsonErrorResponder;

    impl ErrorHandler<TestRequest, TestResponse> for JsonErrorResponder {
        fn handle<'a>(
            &'a self,
            error: ChainError,
            _req: &'a mut TestRequest,
            res: &'a mut TestResponse,
            _ctx: &'a mut RequestContext,
        ) -> BoxFuture<'a, Result<(), ChainError>> {
            Box::pin(async move {
                res.set_status(500);
                res.write_json(json!({ "error": error.to_string() }));
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn unregistered_method_responds_404_and_succeeds() {
        let router = Router::builder()
            .route(Method::Get, RouteDefinition::new(ok_handler))
            .build();

        let mut req = TestRequest::new("POST");
        let mut res = TestResponse::default();
        router.dispatch(&mut req, &mut res).await.expect("miss is not an error");

        assert_eq!(res.status, Some(404));
        assert_eq!(res.body, Some(json!({ "message": "not found" })));
    }

    #[tokio::test]
    async fn unparseable_method_is_a_miss() {
        let router = Router::builder()
            .route(Method::Get, RouteDefinition::new(ok_handler))
            .build();

        let mut req = TestRequest::new("TRACE");
        let mut res = TestResponse::default();
        router.dispatch(&mut req, &mut res).await.expect("miss is not an error");
        assert_eq!(res.status, Some(404));
    }

    #[tokio::test]
    async fn miss_body_is_configurable() {
        let router: Router<TestRequest, TestResponse> = Router::builder()
            .with_missing_response(|| json!({ "message": "no such thing" }))
            .build();

        let mut req = TestRequest::new("GET");
        let mut res = TestResponse::default();
        router.dispatch(&mut req, &mut res).await.expect("miss is not an error");
        assert_eq!(res.body, Some(json!({ "message": "no such thing" })));
    }

    #[tokio::test]
    async fn method_matching_is_case_insensitive() {
        let router = Router::builder()
            .route(Method::Get, RouteDefinition::new(ok_handler))
            .build();

        let mut req = TestRequest::new("get");
        let mut res = TestResponse::default();
        router.dispatch(&mut req, &mut res).await.expect("dispatch succeeds");
        assert_eq!(res.status, Some(200));
    }

    #[tokio::test]
    async fn handler_error_rethrows_by_default() {
        let router = Router::builder()
            .route(Method::Get, RouteDefinition::new(failing_handler))
            .build();

        let mut req = TestRequest::new("GET");
        let mut res = TestResponse::default();
        let err = router
            .dispatch(&mut req, &mut res)
            .await
            .expect_err("default handler rethrows");

        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn error_handler_may_consume_the_error() {
        let router = Router::builder()
            .route(Method::Get, RouteDefinition::new(failing_handler))
            .with_error_handler(JsonErrorResponder)
            .build();

        let mut req = TestRequest::new("GET");
        let mut res = TestResponse::default();
        router.dispatch(&mut req, &mut res).await.expect("error was consumed");

        assert_eq!(res.status, Some(500));
        assert_eq!(res.body, Some(json!({ "error": "boom" })));
    }

    #[tokio::test]
    async fn context_is_destroyed_after_a_successful_dispatch() {
        let disposed = Arc::new(AtomicBool::new(false));
        let router = Router::builder()
            .route(
                Method::Get,
                RouteDefinition::new(ok_handler).pre_hook(DisposerHook {
                    disposed: Arc::clone(&disposed),
                    fail: false,
                }),
            )
            .build();

        let mut req = TestRequest::new("GET");
        let mut res = TestResponse::default();
        router.dispatch(&mut req, &mut res).await.expect("dispatch succeeds");
        assert!(disposed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn context_is_destroyed_even_when_the_chain_fails() {
        let disposed = Arc::new(AtomicBool::new(false));
        let router = Router::builder()
            .route(
                Method::Get,
                RouteDefinition::new(failing_handler).pre_hook(DisposerHook {
                    disposed: Arc::clone(&disposed),
                    fail: false,
                }),
            )
            .build();

        let mut req = TestRequest::new("GET");
        let mut res = TestResponse::default();
        let err = router
            .dispatch(&mut req, &mut res)
            .await
            .expect_err("handler error rethrows");

        assert_eq!(err.to_string(), "boom");
        assert!(disposed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn teardown_failure_surfaces_after_a_successful_chain() {
        let disposed = Arc::new(AtomicBool::new(false));
        let router = Router::builder()
            .route(
                Method::Get,
                RouteDefinition::new(ok_handler).pre_hook(DisposerHook {
                    disposed: Arc::clone(&disposed),
                    fail: true,
                }),
            )
            .build();

        let mut req = TestRequest::new("GET");
        let mut res = TestResponse::default();
        let err = router
            .dispatch(&mut req, &mut res)
            .await
            .expect_err("teardown failure surfaces");

        assert!(matches!(err, ChainError::Disposal(_)));
        // The handler still produced its response before teardown ran.
        assert_eq!(res.status, Some(200));
    }

    #[tokio::test]
    async fn teardown_failure_supersedes_a_chain_error() {
        let disposed = Arc::new(AtomicBool::new(false));
        let router = Router::builder()
            .route(
                Method::Get,
                RouteDefinition::new(failing_handler).pre_hook(DisposerHook {
                    disposed: Arc::clone(&disposed),
                    fail: true,
                }),
            )
            .build();

        let mut req = TestRequest::new("GET");
        let mut res = TestResponse::default();
        let err = router
            .dispatch(&mut req, &mut res)
            .await
            .expect_err("teardown failure surfaces");

        assert!(matches!(err, ChainError::Disposal(_)));
    }

    /// Marks a flag when run, without touching the response.
    struct MarkingHandler {
        ran: Arc<AtomicBool>,
    }

    impl hookline_chain::Handler<TestRequest, TestResponse> for MarkingHandler {
        fn call<'a>(
            &'a self,
            _req: &'a mut TestRequest,
            _res: &'a mut TestResponse,
            _ctx: &'a mut RequestContext,
        ) -> BoxFuture<'a, Result<(), BoxError>> {
            self.ran.store(true, Ordering::SeqCst);
            Box::pin(async move { Ok(()) })
        }
    }

    #[tokio::test]
    async fn later_registration_replaces_the_earlier_route() {
        let first_ran = Arc::new(AtomicBool::new(false));
        let first = MarkingHandler {
            ran: Arc::clone(&first_ran),
        };

        let router = Router::builder()
            .route(Method::Get, RouteDefinition::new(first))
            .route(Method::Get, RouteDefinition::new(ok_handler))
            .build();

        let mut req = TestRequest::new("GET");
        let mut res = TestResponse::default();
        router.dispatch(&mut req, &mut res).await.expect("dispatch succeeds");

        assert_eq!(res.status, Some(200));
        assert!(!first_ran.load(Ordering::SeqCst));
    }
}
