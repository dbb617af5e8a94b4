//! Single-flight memoizing fetch cache.
//!
//! One cache is shared by every in-flight component load. The pending entry
//! is published synchronously, before the underlying retrieval can suspend,
//! so any number of concurrent requests for the same canonical URL share a
//! single retrieval. Successes persist for the process lifetime; failures
//! remove themselves so a later request retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::capabilities::ResourceFetcher;
use crate::error::FetchError;

/// The shared in-flight (or settled) retrieval for one canonical URL.
pub type SharedFetch = Shared<BoxFuture<'static, Result<Arc<str>, FetchError>>>;

pub struct FetchCache {
    entries: Arc<Mutex<HashMap<String, SharedFetch>>>,
    fetcher: Arc<dyn ResourceFetcher>,
}

impl FetchCache {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            fetcher,
        }
    }

    /// Retrieve `url`, deduplicating against every other request for the
    /// same URL. Must be called from within a Tokio runtime.
    ///
    /// The returned future settles with the shared outcome; on failure the
    /// entry has already been removed by the time any waiter observes the
    /// error, so the next `fetch` issues a fresh retrieval.
    pub fn fetch(&self, url: &str) -> SharedFetch {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get(url) {
            return entry.clone();
        }

        let entries_handle = Arc::clone(&self.entries);
        let fetcher = Arc::clone(&self.fetcher);
        let key = url.to_string();
        let shared: SharedFetch = async move {
            let outcome = fetcher.retrieve(&key).await.map(Arc::<str>::from);
            if outcome.is_err() {
                let mut entries = entries_handle.lock().unwrap_or_else(|e| e.into_inner());
                entries.remove(&key);
            }
            outcome
        }
        .boxed()
        .shared();

        entries.insert(url.to_string(), shared.clone());
        drop(entries);

        // Drive the retrieval to completion even when every waiter walks
        // away; a resource already in flight keeps loading and settles.
        tokio::spawn(shared.clone().map(|_| ()));

        shared
    }

    /// Whether an entry (pending or resolved) exists for `url`.
    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
