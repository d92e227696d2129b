//! Route definitions: the raw stages a route is built from.

use hookline_chain::{BoxedHandler, BoxedHook, Handler, Hook};

/// The stages registered for one route: a primary handler plus ordered pre-
/// and post-hooks.
///
/// A definition is inert — it holds unwrapped stages. The builder turns it
/// into an executable [`Chain`](hookline_chain::Chain) with the router's
/// chaining strategy applied; see [`RouterBuilder::build`](crate::RouterBuilder::build).
pub struct RouteDefinition<R, W> {
    pub(crate) handler: BoxedHandler<R, W>,
    pub(crate) pre_hooks: Vec<BoxedHook<R, W>>,
    pub(crate) post_hooks: Vec<BoxedHook<R, W>>,
}

impl<R, W> RouteDefinition<R, W> {
    /// Creates a definition with the given primary handler and no hooks.
    pub fn new(handler: impl Handler<R, W> + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
        }
    }

    /// Appends a hook that runs before the handler. Pre-hooks run in the
    /// order they were appended.
    #[must_use]
    pub fn pre_hook(mut self, hook: impl Hook<R, W> + 'static) -> Self {
        self.pre_hooks.push(Box::new(hook));
        self
    }

    /// Appends a hook that runs after the handler. Post-hooks run in the
    /// order they were appended.
    #[must_use]
    pub fn post_hook(mut self, hook: impl Hook<R, W> + 'static) -> Self {
        self.post_hooks.push(Box::new(hook));
        self
    }
}
