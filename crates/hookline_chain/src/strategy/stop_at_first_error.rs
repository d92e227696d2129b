//! Fail-fast chaining: the first stage error stops the chain.

use hookline_context::{BoxFuture, RequestContext};

use crate::error::ChainError;
use crate::next::Next;
use crate::stage::{BoxedHandler, BoxedHook, Hook};
use crate::strategy::ChainingStrategy;

/// The default strategy: a handler error propagates and the continuation is
/// never invoked; hooks are passed through unmodified, so their own error
/// and continuation semantics apply unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopAtFirstError;

impl<R, W> ChainingStrategy<R, W> for StopAtFirstError
where
    R: Send + 'static,
    W: Send + 'static,
{
    fn apply_to_handler(&self, handler: BoxedHandler<R, W>) -> BoxedHook<R, W> {
        Box::new(FailFastHandler { handler })
    }

    fn apply_to_middleware(&self, hook: BoxedHook<R, W>) -> BoxedHook<R, W> {
        hook
    }
}

/// Splices the handler into the chain: run it, propagate its error, and only
/// on success continue with the rest of the chain.
struct FailFastHandler<R, W> {
    handler: BoxedHandler<R, W>,
}

impl<R, W> Hook<R, W> for FailFastHandler<R, W>
where
    R: Send + 'static,
    W: Send + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a mut R,
        res: &'a mut W,
        ctx: &'a mut RequestContext,
        next: &'a mut Next<R, W>,
    ) -> BoxFuture<'a, Result<(), ChainError>> {
        Box::pin(async move {
            self.handler.call(req, res, ctx).await.map_err(ChainError::Stage)?;
            next.run(req, res, ctx).await
        })
    }
}
