//! Pluggable chaining strategies.
//!
//! A chaining strategy separates "what runs" (the chain order, which is
//! fixed) from "how errors affect flow". Each strategy wraps the handler and
//! the hooks with error-handling behavior before they are spliced into the
//! chain, so callers choose fail-fast or best-effort semantics without
//! rewriting hook code.
//!
//! Strategies are stateless unit values — they carry no per-request data;
//! all error state lives in the [`RequestContext`]. They intercept only
//! [`ChainError::Stage`]: a duplicate-continuation defect (or a teardown
//! failure) always propagates.

use hookline_context::{BoxFuture, RequestContext};

use crate::error::ChainError;
use crate::next::Next;
use crate::stage::{BoxedHandler, BoxedHook, Hook};

mod continue_always_on_error;
mod continue_but_skip_handler_on_error;
mod stop_at_first_error;

pub use continue_always_on_error::ContinueAlwaysOnError;
pub use continue_but_skip_handler_on_error::ContinueButSkipHandlerOnError;
pub use stop_at_first_error::StopAtFirstError;

/// Policy deciding how a stage's error affects the remaining chain.
///
/// Applied per stage at chain-build time; see
/// [`Chain::assemble`](crate::Chain::assemble). Implementations must not
/// reorder stages — only whether and how an error propagates may differ.
pub trait ChainingStrategy<R, W>: Send + Sync {
    /// Wraps the primary handler for splicing into the chain.
    fn apply_to_handler(&self, handler: BoxedHandler<R, W>) -> BoxedHook<R, W>;

    /// Wraps a pre- or post-hook for splicing into the chain.
    fn apply_to_middleware(&self, hook: BoxedHook<R, W>) -> BoxedHook<R, W>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared wrappers
// ─────────────────────────────────────────────────────────────────────────────

/// Handler wrapper used by the continue-style strategies: failures are
/// registered on the context and the chain proceeds. With
/// `skip_when_errored`, the handler body is skipped entirely when the
/// context already holds a registered error.
pub(crate) struct RegisterAndContinueHandler<R, W> {
    pub(crate) handler: BoxedHandler<R, W>,
    pub(crate) skip_when_errored: bool,
}

impl<R, W> Hook<R, W> for RegisterAndContinueHandler<R, W>
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
            if self.skip_when_errored && ctx.has_error() {
                tracing::debug!("context already holds an error; skipping handler");
                return next.run(req, res, ctx).await;
            }
            if let Err(error) = self.handler.call(req, res, ctx).await {
                ctx.register_error(error);
            }
            next.run(req, res, ctx).await
        })
    }
}

/// Hook wrapper used by the continue-style strategies: a stage failure is
/// registered on the context and the remaining chain still runs. If the hook
/// already invoked its continuation before failing, the chain is not run a
/// second time.
pub(crate) struct RegisterAndContinueHook<R, W> {
    pub(crate) hook: BoxedHook<R, W>,
}

impl<R, W> Hook<R, W> for RegisterAndContinueHook<R, W>
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
            match self.hook.call(req, res, ctx, next).await {
                Ok(()) => Ok(()),
                Err(ChainError::Stage(error)) => {
                    ctx.register_error(error);
                    if next.was_invoked() {
                        Ok(())
                    } else {
                        next.run(req, res, ctx).await
                    }
                }
                // Duplicate-continuation defects and teardown failures are
                // never strategy-handled.
                Err(other) => Err(other),
            }
        })
    }
}
