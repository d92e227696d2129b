//! Chain assembly and the single-pass runner.

use std::sync::Arc;

use hookline_context::{BoxFuture, RequestContext};

use crate::error::ChainError;
use crate::next::{DuplicateNextPolicy, Next};
use crate::stage::{BoxedHandler, BoxedHook};
use crate::strategy::ChainingStrategy;

/// The executable pipeline for a route: wrapped pre-hooks, the wrapped
/// handler, and wrapped post-hooks, in that fixed order.
///
/// A chain is assembled once, with the chosen strategy applied per stage at
/// build time, and is shared immutably across requests — all per-request
/// state lives in the [`RequestContext`].
pub struct Chain<R, W> {
    stages: Arc<[BoxedHook<R, W>]>,
    duplicate_next: DuplicateNextPolicy,
}

impl<R, W> Chain<R, W>
where
    R: Send + 'static,
    W: Send + 'static,
{
    /// Assembles a chain from its stages and a chaining strategy.
    ///
    /// Every pre- and post-hook is wrapped via
    /// [`ChainingStrategy::apply_to_middleware`], the handler via
    /// [`ChainingStrategy::apply_to_handler`]; the wrapped stages are
    /// concatenated as `[pre-hooks…, handler, post-hooks…]`. Strategies never
    /// reorder stages.
    #[must_use]
    pub fn assemble(
        pre_hooks: Vec<BoxedHook<R, W>>,
        handler: BoxedHandler<R, W>,
        post_hooks: Vec<BoxedHook<R, W>>,
        strategy: &dyn ChainingStrategy<R, W>,
        duplicate_next: DuplicateNextPolicy,
    ) -> Self {
        let mut stages: Vec<BoxedHook<R, W>> =
            Vec::with_capacity(pre_hooks.len() + post_hooks.len() + 1);
        for hook in pre_hooks {
            stages.push(strategy.apply_to_middleware(hook));
        }
        stages.push(strategy.apply_to_handler(handler));
        for hook in post_hooks {
            stages.push(strategy.apply_to_middleware(hook));
        }
        Self {
            stages: stages.into(),
            duplicate_next,
        }
    }

    /// Number of stages in the chain, handler included.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Drives the whole pipeline to completion or failure.
    ///
    /// Stages execute strictly in chain order on a single logical task;
    /// each stage invocation receives a fresh one-shot [`Next`].
    ///
    /// # Errors
    ///
    /// Returns whatever error the active strategy lets escape — a
    /// [`ChainError::Stage`] under fail-fast semantics, or a
    /// [`ChainError::DuplicateNext`] on a misbehaving stage.
    pub async fn run(
        &self,
        req: &mut R,
        res: &mut W,
        ctx: &mut RequestContext,
    ) -> Result<(), ChainError> {
        run_from(Arc::clone(&self.stages), self.duplicate_next, 0, req, res, ctx).await
    }
}

/// Runs the chain from `index`. The recursion through [`Next::run`] is
/// expressed with boxed futures; past the last stage it resolves immediately
/// (the terminal continuation).
pub(crate) fn run_from<'a, R, W>(
    stages: Arc<[BoxedHook<R, W>]>,
    policy: DuplicateNextPolicy,
    index: usize,
    req: &'a mut R,
    res: &'a mut W,
    ctx: &'a mut RequestContext,
) -> BoxFuture<'a, Result<(), ChainError>>
where
    R: Send + 'static,
    W: Send + 'static,
{
    Box::pin(async move {
        let Some(stage) = stages.get(index) else {
            return Ok(());
        };
        let mut next = Next::new(Arc::clone(&stages), index + 1, policy);
        stage.call(req, res, ctx, &mut next).await
    })
}
