//! Per-request state for the hookline pipeline.
//!
//! This crate provides [`RequestContext`], the request-scoped registry that
//! hooks and handlers share while a chain executes. It stores disposable
//! resources under string keys, accumulates errors raised by
//! "continue"-style chaining strategies, and guarantees that every
//! registered disposer runs exactly once at teardown.
//!
//! # Lifecycle
//!
//! A context is created once per inbound request by the router, mutated by
//! stages during chain execution, and destroyed exactly once after the chain
//! settles. [`RequestContext::destroy`] consumes the context, so a second
//! teardown is a compile error rather than a runtime hazard.
//!
//! # Example
//!
//! ```
//! use hookline_context::RequestContext;
//!
//! # futures::executor::block_on(async {
//! let mut ctx = RequestContext::new();
//! ctx.add_item_with_disposer("db", FakeConnection::open(), |conn| async move {
//!     conn.close();
//!     Ok(())
//! });
//!
//! let conn = ctx.get_item::<FakeConnection>("db").expect("registered above");
//! assert!(conn.is_open());
//!
//! ctx.destroy().await.expect("disposer succeeds");
//! # });
//! #
//! # use std::sync::atomic::{AtomicBool, Ordering};
//! # struct FakeConnection(AtomicBool);
//! # impl FakeConnection {
//! #     fn open() -> Self { Self(AtomicBool::new(true)) }
//! #     fn close(&self) { self.0.store(false, Ordering::SeqCst); }
//! #     fn is_open(&self) -> bool { self.0.load(Ordering::SeqCst) }
//! # }
//! ```

pub mod context;

pub use context::{DisposalError, RequestContext};

use core::future::Future;
use core::pin::Pin;

/// The error value raised by hooks, handlers, and disposers.
///
/// Stage code produces arbitrary caller-defined errors; the pipeline carries
/// them type-erased.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// A boxed future that is Send.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
