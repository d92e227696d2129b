//! Shared fixtures for chain and strategy tests.

use std::sync::{Arc, Mutex};

use hookline_context::{BoxError, BoxFuture, RequestContext};

use crate::error::ChainError;
use crate::next::Next;
use crate::stage::{BoxedHandler, BoxedHook, Handler, Hook};

/// Shared execution log recording stage names in invocation order.
pub(crate) type Log = Arc<Mutex<Vec<String>>>;

pub(crate) fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn recorded(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// How a recording hook behaves after logging its name.
pub(crate) enum HookBehavior {
    /// Invoke the continuation and propagate its result.
    CallNext,
    /// Return without invoking the continuation.
    ShortCircuit,
    /// Fail without invoking the continuation.
    FailBeforeNext,
    /// Invoke the continuation, then fail.
    FailAfterNext,
    /// Invoke the continuation twice (a stage defect).
    CallNextTwice,
}

struct RecordingHook {
    name: &'static str,
    log: Log,
    behavior: HookBehavior,
}

impl Hook<(), ()> for RecordingHook {
    fn call<'a>(
        &'a self,
        req: &'a mut (),
        res: &'a mut (),
        ctx: &'a mut RequestContext,
        next: &'a mut Next<(), ()>,
    ) -> BoxFuture<'a, Result<(), ChainError>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name.to_string());
            match self.behavior {
                HookBehavior::CallNext => next.run(req, res, ctx).await,
                HookBehavior::ShortCircuit => Ok(()),
                HookBehavior::FailBeforeNext => {
                    Err(ChainError::stage(format!("{} failed", self.name)))
                }
                HookBehavior::FailAfterNext => {
                    next.run(req, res, ctx).await?;
                    Err(ChainError::stage(format!("{} failed", self.name)))
                }
                HookBehavior::CallNextTwice => {
                    next.run(req, res, ctx).await?;
                    next.run(req, res, ctx).await
                }
            }
        })
    }
}

pub(crate) fn hook(name: &'static str, log: &Log, behavior: HookBehavior) -> BoxedHook<(), ()> {
    Box::new(RecordingHook {
        name,
        log: Arc::clone(log),
        behavior,
    })
}

struct RecordingHandler {
    name: &'static str,
    log: Log,
    fail: bool,
}

impl Handler<(), ()> for RecordingHandler {
    fn call<'a>(
        &'a self,
        _req: &'a mut (),
        _res: &'a mut (),
        _ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name.to_string());
            if self.fail {
                Err(format!("{} failed", self.name).into())
            } else {
                Ok(())
            }
        })
    }
}

pub(crate) fn handler(name: &'static str, log: &Log, fail: bool) -> BoxedHandler<(), ()> {
    Box::new(RecordingHandler {
        name,
        log: Arc::clone(log),
        fail,
    })
}
