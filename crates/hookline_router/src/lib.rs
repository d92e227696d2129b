//! Route table and dispatch glue on top of [`hookline_chain`].
//!
//! This crate maps HTTP methods to route definitions, assembles each
//! definition into an executable [`Chain`](hookline_chain::Chain) once at
//! build time, and drives dispatch per request: resolve the route, run the
//! chain with a fresh [`RequestContext`](hookline_context::RequestContext),
//! delegate failures to the configured [`ErrorHandler`], and tear the
//! context down on every exit path.
//!
//! The HTTP transport itself stays out of scope — callers adapt their server
//! types through the small [`HttpRequest`] / [`HttpResponse`] seams.

pub mod error_handler;
pub mod http;
pub mod method;
pub mod route;
pub mod router;

pub use error_handler::{ErrorHandler, Rethrow};
pub use http::{HttpRequest, HttpResponse};
pub use method::Method;
pub use route::RouteDefinition;
pub use router::{Router, RouterBuilder};
