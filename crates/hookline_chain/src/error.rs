//! Error taxonomy for chain execution.

use hookline_context::{BoxError, DisposalError};

/// Errors that can escape a running chain or its surrounding teardown.
///
/// Stage failures are the only variant chaining strategies are allowed to
/// intercept; everything else propagates so defects stay diagnosable.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A hook or the handler failed. Its fate — propagate or be registered
    /// on the context while the chain continues — is decided entirely by the
    /// active [`ChainingStrategy`](crate::ChainingStrategy).
    #[error(transparent)]
    Stage(BoxError),

    /// A stage invoked its continuation more than once.
    ///
    /// This signals a programming defect in stage code. It is surfaced
    /// distinctly from stage errors and never swallowed by chaining
    /// strategies, so the defect is diagnosable instead of silently
    /// re-executing downstream stages. See
    /// [`DuplicateNextPolicy`](crate::DuplicateNextPolicy) for the
    /// alternative log-and-ignore handling.
    #[error("continuation invoked more than once while advancing to stage {index}")]
    DuplicateNext {
        /// Index of the stage the duplicate invocation would have run.
        index: usize,
    },

    /// A resource's cleanup callback failed during context teardown.
    ///
    /// Produced after the chain has settled; fatal to the overall request
    /// handling even when the chain itself succeeded.
    #[error(transparent)]
    Disposal(#[from] DisposalError),
}

impl ChainError {
    /// Wraps a caller-defined error as a stage failure.
    pub fn stage(error: impl Into<BoxError>) -> Self {
        Self::Stage(error.into())
    }
}
