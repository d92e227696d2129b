//! # Hookline Internal Library
//!
//! Re-exports the core hookline crates for convenience.

/// Layer 1: request-scoped item storage and teardown.
pub use hookline_context;

/// Layer 2: continuation-based execution chain and strategies.
pub use hookline_chain;

/// Layer 3: route table and dispatch.
pub use hookline_router;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookline_chain::{
        BoxError, BoxFuture, Chain, ChainError, ChainingStrategy, ContinueAlwaysOnError,
        ContinueButSkipHandlerOnError, DuplicateNextPolicy, Handler, Hook, Next,
        StopAtFirstError,
    };
    pub use hookline_context::{DisposalError, RequestContext};
    pub use hookline_router::{
        ErrorHandler, HttpRequest, HttpResponse, Method, Rethrow, RouteDefinition, Router,
        RouterBuilder,
    };
}
