//! Continuation-based execution chain for request pipelines.
//!
//! This crate links an ordered set of pre-hooks, one primary handler, and an
//! ordered set of post-hooks into a single-pass pipeline, with a pluggable
//! [`ChainingStrategy`] deciding how a stage's error affects the remaining
//! stages.
//!
//! # Building blocks
//!
//! - [`Handler`] / [`Hook`]: the stage traits. Hooks additionally receive a
//!   [`Next`] continuation representing "run the rest of the chain".
//! - [`ChainingStrategy`]: wraps each stage with error-handling behavior at
//!   chain-build time. Three stateless variants are built in:
//!   [`StopAtFirstError`] (default), [`ContinueAlwaysOnError`], and
//!   [`ContinueButSkipHandlerOnError`].
//! - [`Chain`]: the assembled pipeline, shared immutably across requests;
//!   all per-request state lives in the
//!   [`RequestContext`](hookline_context::RequestContext).
//!
//! # Ordering
//!
//! Stages execute strictly in chain order: pre-hooks in registration order,
//! then the handler, then post-hooks. Strategies only change whether and how
//! a stage's error propagates, never the order. A hook that returns without
//! invoking its continuation halts the remainder of the chain silently —
//! that is how a hook short-circuits, e.g. to write an early response.

pub mod chain;
pub mod error;
pub mod next;
pub mod stage;
pub mod strategy;

pub use chain::Chain;
pub use error::ChainError;
pub use next::{DuplicateNextPolicy, Next};
pub use stage::{BoxedHandler, BoxedHook, Handler, Hook};
pub use strategy::{
    ChainingStrategy, ContinueAlwaysOnError, ContinueButSkipHandlerOnError, StopAtFirstError,
};

pub use hookline_context::{BoxError, BoxFuture, RequestContext};

#[cfg(test)]
pub(crate) mod testing;
