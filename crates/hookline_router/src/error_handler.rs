//! Terminal error handling for dispatch.

use hookline_chain::ChainError;
use hookline_context::{BoxFuture, RequestContext};

/// Last line of defense for errors that escape a route's chain.
///
/// The handler may consume the error (typically by writing an error
/// response) and return `Ok(())`, or return an error to surface it to the
/// dispatch caller. It runs before context teardown, so items placed on the
/// context by earlier stages are still available.
pub trait ErrorHandler<R, W>: Send + Sync {
    /// Handles an error that escaped the chain.
    fn handle<'a>(
        &'a self,
        error: ChainError,
        req: &'a mut R,
        res: &'a mut W,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<(), ChainError>>;
}

/// The default error handler: returns the error unchanged, surfacing it to
/// the dispatch caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rethrow;

impl<R, W> ErrorHandler<R, W> for Rethrow
where
    R: Send,
    W: Send,
{
    fn handle<'a>(
        &'a self,
        error: ChainError,
        _req: &'a mut R,
        _res: &'a mut W,
        _ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<(), ChainError>> {
        Box::pin(async move { Err(error) })
    }
}
