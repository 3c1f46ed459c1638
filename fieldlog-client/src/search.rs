/// Debounced search-as-you-type
///
/// Drives a [`Directory`] search from a stream of keystrokes without
/// querying on every one. Each call to [`DebouncedSearch::set_query`]
/// restarts a quiet-period timer; the query is only issued once the user
/// has paused for 300ms.
///
/// # Cancellation and staleness
///
/// Only the timer is cancellable. Once a request is in flight it runs to
/// completion, and its results are discarded if a newer query has published
/// since: every `set_query` takes a monotonically increasing sequence
/// number, and a result is dropped unless its sequence is at least the
/// newest one published so far. Out-of-order responses can therefore never
/// overwrite results for what the user currently sees in the input box.
///
/// An empty query skips the timer entirely, cancels any pending one, and
/// clears results immediately.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use fieldlog_client::DebouncedSearch;
/// use fieldlog_shared::directory::memory::MemoryDirectory;
///
/// # async fn example() {
/// let directory = Arc::new(MemoryDirectory::with_names(&["Acme Corp"]));
/// let search = DebouncedSearch::new(directory);
/// let mut updates = search.subscribe();
///
/// search.set_query("acm");
///
/// updates.changed().await.unwrap();
/// let state = updates.borrow().clone();
/// # }
/// ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use fieldlog_shared::directory::{ClientRecord, Directory, SEARCH_LIMIT};

/// Quiet period after the last keystroke before a query is issued
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

/// Current state of the search box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Query these results belong to
    pub query: String,

    /// Matching clients, at most [`SEARCH_LIMIT`]
    pub results: Vec<ClientRecord>,

    /// A request for `query` is in flight
    pub loading: bool,

    /// The last request for `query` failed
    pub error: Option<String>,
}

struct Inner {
    tx: watch::Sender<SearchState>,
    next_seq: AtomicU64,
    latest_published: Mutex<u64>,
    pending: Mutex<Option<CancellationToken>>,
}

impl Inner {
    /// Publishes `state` unless a newer sequence has already published
    fn publish_if_fresh(&self, seq: u64, state: SearchState) -> bool {
        let mut latest = self.latest_published.lock().unwrap();
        if seq < *latest {
            tracing::trace!(seq, latest = *latest, "discarding stale search result");
            return false;
        }

        *latest = seq;
        self.tx.send_replace(state);
        true
    }
}

/// Debounced search over any directory
pub struct DebouncedSearch<D: ?Sized> {
    directory: Arc<D>,
    inner: Arc<Inner>,
}

impl<D> DebouncedSearch<D>
where
    D: Directory + ?Sized + 'static,
{
    /// Creates a debounced search over the given directory
    pub fn new(directory: Arc<D>) -> Self {
        let (tx, _rx) = watch::channel(SearchState::default());

        Self {
            directory,
            inner: Arc::new(Inner {
                tx,
                next_seq: AtomicU64::new(0),
                latest_published: Mutex::new(0),
                pending: Mutex::new(None),
            }),
        }
    }

    /// Subscribes to search state updates
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.tx.subscribe()
    }

    /// The most recently published state
    pub fn current(&self) -> SearchState {
        self.inner.tx.borrow().clone()
    }

    /// Feeds the current contents of the input box
    ///
    /// Restarts the quiet-period timer. An empty (or all-whitespace) query
    /// clears results immediately without going to the directory.
    pub fn set_query(&self, query: &str) {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let token = CancellationToken::new();
        if let Some(previous) = self.inner.pending.lock().unwrap().replace(token.clone()) {
            previous.cancel();
        }

        let trimmed = query.trim().to_string();
        if trimmed.is_empty() {
            self.inner.publish_if_fresh(seq, SearchState::default());
            return;
        }

        let directory = Arc::clone(&self.directory);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = sleep(DEBOUNCE_INTERVAL) => {}
            }

            inner.publish_if_fresh(
                seq,
                SearchState {
                    query: trimmed.clone(),
                    results: Vec::new(),
                    loading: true,
                    error: None,
                },
            );

            let state = match directory.search(&trimmed, SEARCH_LIMIT).await {
                Ok(results) => SearchState {
                    query: trimmed,
                    results,
                    loading: false,
                    error: None,
                },
                Err(e) => SearchState {
                    query: trimmed,
                    results: Vec::new(),
                    loading: false,
                    error: Some(e.to_string()),
                },
            };

            inner.publish_if_fresh(seq, state);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fieldlog_shared::directory::memory::MemoryDirectory;
    use fieldlog_shared::directory::DirectoryError;

    /// Counts searches and optionally delays responses per pattern
    struct InstrumentedDirectory {
        inner: MemoryDirectory,
        searches: AtomicU64,
        delay_for: Option<(String, Duration)>,
    }

    impl InstrumentedDirectory {
        fn new(names: &[&str]) -> Self {
            Self {
                inner: MemoryDirectory::with_names(names),
                searches: AtomicU64::new(0),
                delay_for: None,
            }
        }

        fn with_delay(names: &[&str], pattern: &str, delay: Duration) -> Self {
            Self {
                inner: MemoryDirectory::with_names(names),
                searches: AtomicU64::new(0),
                delay_for: Some((pattern.to_string(), delay)),
            }
        }

        fn search_count(&self) -> u64 {
            self.searches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Directory for InstrumentedDirectory {
        async fn search(
            &self,
            pattern: &str,
            limit: i64,
        ) -> Result<Vec<ClientRecord>, DirectoryError> {
            self.searches.fetch_add(1, Ordering::SeqCst);

            if let Some((delayed, delay)) = &self.delay_for {
                if pattern == delayed {
                    sleep(*delay).await;
                }
            }

            self.inner.search(pattern, limit).await
        }

        async fn insert(&self, name: &str) -> Result<ClientRecord, DirectoryError> {
            self.inner.insert(name).await
        }

        async fn find_exact(&self, name: &str) -> Result<Option<ClientRecord>, DirectoryError> {
            self.inner.find_exact(name).await
        }
    }

    async fn next_settled(rx: &mut watch::Receiver<SearchState>) -> SearchState {
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow().clone();
            if !state.loading {
                return state;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_keystrokes_issues_one_query() {
        let directory = Arc::new(InstrumentedDirectory::new(&["Acme Corp", "Acme East"]));
        let search = DebouncedSearch::new(Arc::clone(&directory));
        let mut updates = search.subscribe();

        search.set_query("a");
        tokio::time::advance(Duration::from_millis(100)).await;
        search.set_query("ac");
        tokio::time::advance(Duration::from_millis(100)).await;
        search.set_query("acme");

        let state = next_settled(&mut updates).await;

        assert_eq!(state.query, "acme");
        assert_eq!(state.results.len(), 2);
        assert_eq!(directory.search_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_query_before_quiet_period() {
        let directory = Arc::new(InstrumentedDirectory::new(&["Acme Corp"]));
        let search = DebouncedSearch::new(Arc::clone(&directory));

        search.set_query("acme");
        tokio::time::advance(Duration::from_millis(299)).await;
        tokio::task::yield_now().await;
        assert_eq!(directory.search_count(), 0);

        tokio::time::advance(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(directory.search_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_clears_immediately() {
        let directory = Arc::new(InstrumentedDirectory::new(&["Acme Corp"]));
        let search = DebouncedSearch::new(Arc::clone(&directory));
        let mut updates = search.subscribe();

        search.set_query("acme");
        let state = next_settled(&mut updates).await;
        assert_eq!(state.results.len(), 1);

        search.set_query("");
        updates.changed().await.unwrap();
        let state = updates.borrow().clone();

        assert!(state.results.is_empty());
        assert!(state.query.is_empty());
        // Clearing went straight to the channel, no second search
        assert_eq!(directory.search_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_response_cannot_overwrite_newer_results() {
        // "ac" responds slowly; "acme" is typed before it completes and
        // responds fast. The late "ac" response must be dropped.
        let directory = Arc::new(InstrumentedDirectory::with_delay(
            &["Acme Corp"],
            "ac",
            Duration::from_millis(1000),
        ));
        let search = DebouncedSearch::new(Arc::clone(&directory));
        let mut updates = search.subscribe();

        search.set_query("ac");
        // Past the quiet period: the slow "ac" request is now in flight
        tokio::time::advance(Duration::from_millis(350)).await;
        tokio::task::yield_now().await;

        search.set_query("acme");
        let state = next_settled(&mut updates).await;
        assert_eq!(state.query, "acme");

        // Let the slow "ac" response land
        tokio::time::advance(Duration::from_millis(1500)).await;
        tokio::task::yield_now().await;

        let final_state = search.current();
        assert_eq!(final_state.query, "acme");
        assert_eq!(directory.search_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_directory_error_is_surfaced() {
        struct FailingDirectory;

        #[async_trait]
        impl Directory for FailingDirectory {
            async fn search(
                &self,
                _pattern: &str,
                _limit: i64,
            ) -> Result<Vec<ClientRecord>, DirectoryError> {
                Err(DirectoryError::Transient("connection refused".to_string()))
            }

            async fn insert(&self, _name: &str) -> Result<ClientRecord, DirectoryError> {
                Err(DirectoryError::Transient("connection refused".to_string()))
            }

            async fn find_exact(
                &self,
                _name: &str,
            ) -> Result<Option<ClientRecord>, DirectoryError> {
                Ok(None)
            }
        }

        let search = DebouncedSearch::new(Arc::new(FailingDirectory));
        let mut updates = search.subscribe();

        search.set_query("acme");
        let state = next_settled(&mut updates).await;

        assert!(state.results.is_empty());
        assert!(state.error.is_some());
    }
}
