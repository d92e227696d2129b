//! The one-time continuation handed to each hook.

use std::sync::Arc;

use hookline_context::RequestContext;

use crate::chain;
use crate::error::ChainError;
use crate::stage::BoxedHook;

// ─────────────────────────────────────────────────────────────────────────────
// DuplicateNextPolicy
// ─────────────────────────────────────────────────────────────────────────────

/// What happens when a stage invokes its continuation more than once.
///
/// Either way, downstream stages never re-execute; the policy only decides
/// whether the defect is surfaced as an error or logged and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateNextPolicy {
    /// Fail the chain with [`ChainError::DuplicateNext`] (default).
    #[default]
    Fail,
    /// Log the duplicate invocation at `warn` level and ignore it.
    Ignore,
}

// ─────────────────────────────────────────────────────────────────────────────
// Next
// ─────────────────────────────────────────────────────────────────────────────

/// The continuation representing "run the remaining chain".
///
/// Each stage invocation receives a fresh `Next`, valid for at most one
/// [`run`](Self::run). A second invocation is detected by a per-instance flag
/// and handled per [`DuplicateNextPolicy`] — it never silently re-executes
/// downstream stages.
///
/// A hook that returns without calling `run` halts the rest of the chain
/// silently; that is the intended way to short-circuit.
pub struct Next<R, W> {
    stages: Arc<[BoxedHook<R, W>]>,
    index: usize,
    invoked: bool,
    policy: DuplicateNextPolicy,
}

impl<R, W> Next<R, W>
where
    R: Send + 'static,
    W: Send + 'static,
{
    pub(crate) fn new(
        stages: Arc<[BoxedHook<R, W>]>,
        index: usize,
        policy: DuplicateNextPolicy,
    ) -> Self {
        Self {
            stages,
            index,
            invoked: false,
            policy,
        }
    }

    /// Runs the remaining chain.
    ///
    /// The first invocation drives every stage after the current one (the
    /// terminal continuation resolves immediately). Later invocations do not
    /// re-execute anything and are handled per the configured
    /// [`DuplicateNextPolicy`].
    ///
    /// # Errors
    ///
    /// Propagates whatever a downstream stage surfaces, or
    /// [`ChainError::DuplicateNext`] under [`DuplicateNextPolicy::Fail`].
    pub async fn run(
        &mut self,
        req: &mut R,
        res: &mut W,
        ctx: &mut RequestContext,
    ) -> Result<(), ChainError> {
        if self.invoked {
            return match self.policy {
                DuplicateNextPolicy::Fail => Err(ChainError::DuplicateNext { index: self.index }),
                DuplicateNextPolicy::Ignore => {
                    tracing::warn!(
                        index = self.index,
                        "continuation invoked more than once; ignoring"
                    );
                    Ok(())
                }
            };
        }
        self.invoked = true;
        chain::run_from(Arc::clone(&self.stages), self.policy, self.index, req, res, ctx).await
    }

    /// Whether this continuation has already been invoked.
    ///
    /// Lets strategy wrappers continue past a stage error without tripping
    /// the duplicate-invocation guard when the stage already ran its
    /// continuation.
    #[must_use]
    pub fn was_invoked(&self) -> bool {
        self.invoked
    }
}
