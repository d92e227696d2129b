//! Stage traits: the handler and hook contracts.
//!
//! A stage is a unit of work receiving the request, the response, and the
//! per-request context. Hooks additionally receive the [`Next`] continuation.
//! Plain `fn` items with the matching signature implement the traits through
//! blanket impls, so simple stages need no wrapper type:
//!
//! ```
//! use hookline_chain::{BoxError, BoxFuture, ChainError, Next, RequestContext};
//!
//! struct Req;
//! struct Res;
//!
//! fn authenticate<'a>(
//!     req: &'a mut Req,
//!     res: &'a mut Res,
//!     ctx: &'a mut RequestContext,
//!     next: &'a mut Next<Req, Res>,
//! ) -> BoxFuture<'a, Result<(), ChainError>> {
//!     Box::pin(async move {
//!         ctx.add_item("user", String::from("alice"));
//!         next.run(req, res, ctx).await
//!     })
//! }
//!
//! fn show_user<'a>(
//!     req: &'a mut Req,
//!     res: &'a mut Res,
//!     ctx: &'a mut RequestContext,
//! ) -> BoxFuture<'a, Result<(), BoxError>> {
//!     Box::pin(async move {
//!         let user = ctx.get_item::<String>("user").ok_or("no authenticated user")?;
//!         tracing::info!(%user, "serving profile");
//!         Ok(())
//!     })
//! }
//! # let _: hookline_chain::BoxedHook<Req, Res> = Box::new(authenticate);
//! # let _: hookline_chain::BoxedHandler<Req, Res> = Box::new(show_user);
//! ```

use hookline_context::{BoxError, BoxFuture, RequestContext};

use crate::error::ChainError;
use crate::next::Next;

/// The primary stage of a route.
///
/// Handlers raise caller-defined errors ([`BoxError`]); the active chaining
/// strategy decides whether such an error stops the chain or is registered
/// on the context while execution continues.
pub trait Handler<R, W>: Send + Sync {
    /// Runs the handler.
    fn call<'a>(
        &'a self,
        req: &'a mut R,
        res: &'a mut W,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<(), BoxError>>;
}

/// A pre- or post-hook participating in the chain.
///
/// Hooks decide whether the remaining chain runs by invoking (or not
/// invoking) their continuation. Errors from stage code are wrapped via
/// [`ChainError::stage`]; errors returned by [`Next::run`] are propagated
/// as-is.
pub trait Hook<R, W>: Send + Sync {
    /// Runs the hook.
    fn call<'a>(
        &'a self,
        req: &'a mut R,
        res: &'a mut W,
        ctx: &'a mut RequestContext,
        next: &'a mut Next<R, W>,
    ) -> BoxFuture<'a, Result<(), ChainError>>;
}

/// Type-erased handler.
pub type BoxedHandler<R, W> = Box<dyn Handler<R, W>>;

/// Type-erased hook.
pub type BoxedHook<R, W> = Box<dyn Hook<R, W>>;

impl<R, W, F> Handler<R, W> for F
where
    F: for<'a> Fn(
            &'a mut R,
            &'a mut W,
            &'a mut RequestContext,
        ) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync,
{
    fn call<'a>(
        &'a self,
        req: &'a mut R,
        res: &'a mut W,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        self(req, res, ctx)
    }
}

impl<R, W, F> Hook<R, W> for F
where
    F: for<'a> Fn(
            &'a mut R,
            &'a mut W,
            &'a mut RequestContext,
            &'a mut Next<R, W>,
        ) -> BoxFuture<'a, Result<(), ChainError>>
        + Send
        + Sync,
{
    fn call<'a>(
        &'a self,
        req: &'a mut R,
        res: &'a mut W,
        ctx: &'a mut RequestContext,
        next: &'a mut Next<R, W>,
    ) -> BoxFuture<'a, Result<(), ChainError>> {
        self(req, res, ctx, next)
    }
}
