//! Partial-failure chaining: a failed pre-hook suppresses the handler body
//! while post-hooks still fire.

use crate::stage::{BoxedHandler, BoxedHook};
use crate::strategy::{
    ChainingStrategy, RegisterAndContinueHandler, RegisterAndContinueHook,
};

/// Like [`ContinueAlwaysOnError`](crate::ContinueAlwaysOnError), except the
/// handler body is skipped entirely when the context already holds a
/// registered error.
///
/// This exists for partial-failure semantics: pre-hooks may fail non-fatally
/// while still preventing the primary handler from running, but post-hooks
/// (cleanup, logging) must still fire.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinueButSkipHandlerOnError;

impl<R, W> ChainingStrategy<R, W> for ContinueButSkipHandlerOnError
where
    R: Send + 'static,
    W: Send + 'static,
{
    fn apply_to_handler(&self, handler: BoxedHandler<R, W>) -> BoxedHook<R, W> {
        Box::new(RegisterAndContinueHandler {
            handler,
            skip_when_errored: true,
        })
    }

    fn apply_to_middleware(&self, hook: BoxedHook<R, W>) -> BoxedHook<R, W> {
        Box::new(RegisterAndContinueHook { hook })
    }
}
