//! Request-scoped item storage, error accumulation, and teardown.
//!
//! [`RequestContext`] is exclusively owned by one request's pipeline from
//! creation to destruction. It is handed to every stage by mutable reference
//! and never escapes the router's dispatch call, so no locking is involved.

use core::any::Any;
use core::fmt;
use core::future::Future;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::{BoxError, BoxFuture};

/// Type-erased disposer invoked with its item's value at teardown.
type DisposeFn =
    Box<dyn FnOnce(Box<dyn Any + Send + Sync>) -> BoxFuture<'static, Result<(), BoxError>> + Send>;

/// One stored entry: the value, its optional cleanup callback, and the slot
/// recording original insertion order.
struct ContextItem {
    value: Box<dyn Any + Send + Sync>,
    dispose: Option<DisposeFn>,
    /// Original insertion position. Overwrites keep the slot so disposal
    /// failures are ranked by when the key first appeared.
    slot: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// DisposalError
// ─────────────────────────────────────────────────────────────────────────────

/// A resource's cleanup callback failed during context teardown.
///
/// When several disposers fail, the one surfaced belongs to the entry that
/// was inserted first; the rest are logged at `warn` level.
#[derive(Debug, thiserror::Error)]
#[error("disposer for context item '{key}' failed: {source}")]
pub struct DisposalError {
    /// Key of the item whose disposer failed.
    pub key: String,
    /// The error the disposer returned.
    #[source]
    pub source: BoxError,
}

// ─────────────────────────────────────────────────────────────────────────────
// RequestContext
// ─────────────────────────────────────────────────────────────────────────────

/// Per-request resource registry and error accumulator.
///
/// Items are stored type-erased under string keys; reads are typed via
/// downcast. Keys may be reused — last write wins, replacing both the value
/// and the disposer. Errors registered by "continue" chaining strategies are
/// kept in arrival order.
///
/// # Teardown
///
/// [`destroy`](Self::destroy) consumes the context and runs every disposer,
/// concurrently, to completion. See its documentation for the failure
/// contract.
#[derive(Default)]
pub struct RequestContext {
    items: HashMap<String, ContextItem>,
    errors: Vec<BoxError>,
    next_slot: usize,
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("items", &self.items.len())
            .field("errors", &self.errors.len())
            .finish()
    }
}

impl RequestContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` with no cleanup callback.
    ///
    /// Reusing a key overwrites the previous entry, disposer included.
    pub fn add_item<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.insert(key.into(), Box::new(value), None);
    }

    /// Stores `value` under `key` together with an async cleanup callback.
    ///
    /// The disposer receives the stored value when the context is destroyed.
    /// It runs even when other disposers fail.
    ///
    /// # Example
    ///
    /// ```
    /// # use hookline_context::RequestContext;
    /// let mut ctx = RequestContext::new();
    /// ctx.add_item_with_disposer("tmp-file", String::from("/tmp/upload"), |path| async move {
    ///     tracing::debug!(%path, "removing scratch file");
    ///     Ok(())
    /// });
    /// ```
    pub fn add_item_with_disposer<T, F, Fut>(&mut self, key: impl Into<String>, value: T, dispose: F)
    where
        T: Send + Sync + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let dispose: DisposeFn = Box::new(
            move |value: Box<dyn Any + Send + Sync>| -> BoxFuture<'static, Result<(), BoxError>> {
                match value.downcast::<T>() {
                    Ok(value) => Box::pin(dispose(*value)),
                    // Value and disposer are always replaced together, so the
                    // downcast cannot fail; report rather than panic.
                    Err(_) => Box::pin(async {
                        Err("context item value did not match its disposer's type".into())
                    }),
                }
            },
        );
        self.insert(key.into(), Box::new(value), Some(dispose));
    }

    /// Typed read of a stored item.
    ///
    /// Returns `None` when the key is absent or the stored value is not a
    /// `T`.
    #[must_use]
    pub fn get_item<T>(&self, key: &str) -> Option<&T>
    where
        T: Send + Sync + 'static,
    {
        self.items.get(key).and_then(|item| item.value.downcast_ref::<T>())
    }

    /// Returns whether an item is stored under `key`.
    #[must_use]
    pub fn contains_item(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Appends an error to the context's error sequence. Never fails.
    pub fn register_error(&mut self, error: impl Into<BoxError>) {
        self.errors.push(error.into());
    }

    /// The first registered error, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&BoxError> {
        self.errors.first()
    }

    /// Whether at least one error has been registered.
    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All registered errors, in arrival order.
    #[must_use]
    pub fn errors(&self) -> &[BoxError] {
        &self.errors
    }

    /// Destroys the context, running every disposer to completion.
    ///
    /// Disposers run concurrently (they are assumed independent) and teardown
    /// is never short-circuited: a failing disposer does not prevent the
    /// others from running. If one or more disposers fail, the error of the
    /// entry inserted first is returned and the remaining failures are logged
    /// at `warn` level.
    ///
    /// Consuming `self` makes a second teardown unrepresentable.
    ///
    /// # Errors
    ///
    /// Returns [`DisposalError`] for the first-inserted entry whose disposer
    /// failed.
    pub async fn destroy(self) -> Result<(), DisposalError> {
        let mut pending = Vec::new();
        for (key, item) in self.items {
            let Some(dispose) = item.dispose else { continue };
            let slot = item.slot;
            pending.push(async move { (slot, key, dispose(item.value).await) });
        }

        let mut failures: Vec<(usize, String, BoxError)> = Vec::new();
        for (slot, key, result) in futures::future::join_all(pending).await {
            if let Err(error) = result {
                failures.push((slot, key, error));
            }
        }

        failures.sort_by_key(|(slot, _, _)| *slot);
        let mut failures = failures.into_iter();
        let Some((_, key, source)) = failures.next() else {
            return Ok(());
        };
        for (_, key, error) in failures {
            tracing::warn!(%key, %error, "additional disposer failure during context teardown");
        }
        Err(DisposalError { key, source })
    }

    /// Inserts an entry, preserving the original slot on overwrite.
    fn insert(&mut self, key: String, value: Box<dyn Any + Send + Sync>, dispose: Option<DisposeFn>) {
        match self.items.entry(key) {
            Entry::Occupied(mut entry) => {
                let slot = entry.get().slot;
                entry.insert(ContextItem { value, dispose, slot });
            }
            Entry::Vacant(entry) => {
                let slot = self.next_slot;
                self.next_slot += 1;
                entry.insert(ContextItem { value, dispose, slot });
            }
        }
    }
}
