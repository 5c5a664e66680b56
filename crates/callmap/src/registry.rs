//! A reloadable endpoint set.
//!
//! [`EndpointSet`] holds the current [`Endpoints`] behind a read-write lock.
//! A reload builds a complete new set first and swaps it in only on success,
//! so readers see either the old set or the new one, never a mix. Readers
//! take an `Arc` snapshot and release the lock before calling anything.

use std::sync::Arc;

use callmap_core::{ApiMap, CallmapResult};
use parking_lot::RwLock;
use tracing::info;

use crate::endpoint::{Endpoint, Endpoints};
use crate::loader::Loader;

/// Endpoints that can be replaced wholesale at runtime.
///
/// # Example
///
/// ```
/// use callmap::{handler_fn, ApiMap, ArgBag, EndpointSet, Loader};
/// use serde_json::json;
///
/// let version = |n: i64| handler_fn(Vec::<String>::new(), move |_ctx, _args| Ok(json!(n)));
///
/// let set = EndpointSet::load(Loader::default(), &ApiMap::new().with("app.version", version(1)))
///     .unwrap();
/// set.reload(&ApiMap::new().with("app.version", version(2))).unwrap();
///
/// let endpoint = set.get("app.version").unwrap();
/// assert_eq!(endpoint.call(ArgBag::new()).unwrap(), json!(2));
/// ```
#[derive(Debug)]
pub struct EndpointSet {
    loader: Loader,
    current: RwLock<Arc<Endpoints>>,
}

impl EndpointSet {
    /// Creates an empty set that will load with `loader`.
    #[must_use]
    pub fn new(loader: Loader) -> Self {
        Self {
            loader,
            current: RwLock::new(Arc::new(Endpoints::default())),
        }
    }

    /// Creates a set holding the endpoints of `api`.
    ///
    /// # Errors
    ///
    /// See [`Loader::load`].
    pub fn load(loader: Loader, api: &ApiMap) -> CallmapResult<Self> {
        let endpoints = loader.load(api)?;
        Ok(Self {
            loader,
            current: RwLock::new(Arc::new(endpoints)),
        })
    }

    /// Rebuilds the set from `api` and swaps it in.
    ///
    /// Returns the number of endpoints now served.
    ///
    /// # Errors
    ///
    /// See [`Loader::load`]. On error the current set is kept.
    pub fn reload(&self, api: &ApiMap) -> CallmapResult<usize> {
        let endpoints = Arc::new(self.loader.load(api)?);
        let count = endpoints.len();
        let previous = std::mem::replace(&mut *self.current.write(), endpoints);
        info!(previous = previous.len(), current = count, "endpoint set reloaded");
        Ok(count)
    }

    /// Returns the current endpoints.
    ///
    /// The snapshot stays valid across later reloads.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Endpoints> {
        Arc::clone(&*self.current.read())
    }

    /// Looks up an endpoint in the current set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Endpoint>> {
        self.current.read().get_shared(name)
    }

    /// Returns the number of endpoints in the current set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Returns `true` if the current set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}
