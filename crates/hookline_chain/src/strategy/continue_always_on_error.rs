//! Best-effort chaining: every stage runs, errors accumulate on the context.

use crate::stage::{BoxedHandler, BoxedHook};
use crate::strategy::{
    ChainingStrategy, RegisterAndContinueHandler, RegisterAndContinueHook,
};

/// Runs every stage exactly once regardless of earlier failures.
///
/// A failing stage's error is registered on the
/// [`RequestContext`](hookline_context::RequestContext) (in stage order, so
/// `first_error` is the earliest failure) and the chain continues. Useful
/// when post-hooks carry cleanup or logging that must fire even after a
/// broken handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinueAlwaysOnError;

impl<R, W> ChainingStrategy<R, W> for ContinueAlwaysOnError
where
    R: Send + 'static,
    W: Send + 'static,
{
    fn apply_to_handler(&self, handler: BoxedHandler<R, W>) -> BoxedHook<R, W> {
        Box::new(RegisterAndContinueHandler {
            handler,
            skip_when_errored: false,
        })
    }

    fn apply_to_middleware(&self, hook: BoxedHook<R, W>) -> BoxedHook<R, W> {
        Box::new(RegisterAndContinueHook { hook })
    }
}
