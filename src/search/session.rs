//! Query session: delayed, cancellable search over a [`Searcher`], normally a
//! [`SearchEngine`](crate::search::SearchEngine).
//!
//! Every `submit` bumps a generation counter and schedules a computation after
//! a fixed latency. When a computation finishes it only publishes if its
//! generation is still the current one, so a slow, superseded search can never
//! overwrite the result of a newer one. Superseded work still runs to the end;
//! its output is dropped.

use crate::error::{SearchError, SearchResult};
use crate::models::{SearchCriteria, SortKey};
use crate::search::engine::{Hits, Searcher};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Message published when the compute step fails
pub const GENERIC_FAILURE: &str = "Search failed. Please try again.";

/// Observable state of a session
#[derive(Debug, Clone)]
pub enum SearchState {
    Idle,
    Loading,
    Ready(Hits),
    Failed(String),
}

impl SearchState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }
}

/// What subscribers see: the state plus the generation it belongs to
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub generation: u64,
    pub state: SearchState,
    pub closed: bool,
}

pub struct QuerySession {
    searcher: Arc<dyn Searcher>,
    latency: Duration,
    state: Arc<watch::Sender<Snapshot>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl QuerySession {
    /// Open a session over `searcher`. Submitting needs a tokio runtime.
    pub fn open(searcher: Arc<dyn Searcher>, latency: Duration) -> Self {
        let (state, _) = watch::channel(Snapshot {
            generation: 0,
            state: SearchState::Idle,
            closed: false,
        });
        debug!(latency_ms = latency.as_millis() as u64, "query session opened");

        Self {
            searcher,
            latency,
            state: Arc::new(state),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SearchState {
        self.state.borrow().state.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Replace the active criteria. Supersedes any in-flight computation and
    /// returns the new generation.
    pub fn submit(&self, criteria: SearchCriteria, sort: SortKey) -> SearchResult<u64> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SearchError::NoRuntime)?;

        let mut generation = None;
        self.state.send_if_modified(|snap| {
            if snap.closed {
                return false;
            }
            snap.generation += 1;
            snap.state = SearchState::Loading;
            generation = Some(snap.generation);
            true
        });
        let generation = generation.ok_or(SearchError::SessionClosed)?;
        debug!(generation, ?sort, "search submitted");

        let searcher = self.searcher.clone();
        let state = self.state.clone();
        let latency = self.latency;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(latency).await;

            let outcome = tokio::task::spawn_blocking(move || searcher.search(&criteria, sort))
                .await
                .map_err(|e| SearchError::ComputeFailed(e.to_string()))
                .and_then(|result| result);
            let next = match outcome {
                Ok(hits) => SearchState::Ready(hits),
                Err(e) => {
                    warn!(generation, error = %e, "search failed");
                    SearchState::Failed(GENERIC_FAILURE.to_string())
                }
            };

            let published = state.send_if_modified(|snap| {
                if snap.closed || snap.generation != generation {
                    return false;
                }
                snap.state = next;
                true
            });
            if !published {
                debug!(generation, "discarded superseded search result");
            }
        });

        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
        Ok(generation)
    }

    /// Wait until the latest submission has settled. Returns `Idle` right
    /// away when nothing was submitted yet.
    pub async fn settled(&self) -> SearchResult<SearchState> {
        let mut rx = self.subscribe();
        let snap = rx
            .wait_for(|snap| snap.closed || snap.generation == 0 || snap.state.is_settled())
            .await
            .map_err(|_| SearchError::SessionClosed)?;
        if snap.closed {
            return Err(SearchError::SessionClosed);
        }
        Ok(snap.state.clone())
    }

    /// Cancel pending computations. No further state transitions happen.
    pub fn dispose(&self) {
        let already_closed = self.state.borrow().closed;
        if already_closed {
            return;
        }
        self.state.send_modify(|snap| snap.closed = true);

        let handles: Vec<_> = self.pending.lock().drain(..).collect();
        for handle in &handles {
            handle.abort();
        }
        info!(cancelled = handles.len(), "query session disposed");
    }
}

impl Drop for QuerySession {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingRecord, Rooms, TransactionCategory};
    use crate::search::engine::{EngineSettings, SearchEngine};
    use crate::search::filter::tests::listing;
    use std::sync::atomic::{AtomicBool, Ordering};

    const LATENCY: Duration = Duration::from_millis(300);

    fn engine() -> Arc<SearchEngine> {
        let mut roomy = listing(3, TransactionCategory::Sale, "15억");
        roomy.rooms = Rooms::from(5);
        let catalog: Vec<ListingRecord> = vec![
            listing(1, TransactionCategory::Sale, "12억"),
            listing(2, TransactionCategory::Sale, "8억"),
            roomy,
        ];
        Arc::new(SearchEngine::new(catalog, EngineSettings::default()))
    }

    fn ids(state: &SearchState) -> Vec<u64> {
        match state {
            SearchState::Ready(hits) => hits.iter().map(|l| l.id).collect(),
            other => panic!("expected ready state, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_after_latency() {
        let session = QuerySession::open(engine(), LATENCY);
        assert!(matches!(session.current(), SearchState::Idle));

        let criteria = SearchCriteria {
            min_price: Some(100_000),
            ..Default::default()
        };
        assert_eq!(session.submit(criteria, SortKey::Newest).unwrap(), 1);
        assert!(matches!(session.current(), SearchState::Loading));

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(matches!(session.current(), SearchState::Loading));

        let state = session.settled().await.unwrap();
        assert_eq!(ids(&state), vec![3, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_result_is_never_published() {
        let session = QuerySession::open(engine(), LATENCY);
        let mut rx = session.subscribe();

        let first = SearchCriteria {
            min_price: Some(100_000),
            ..Default::default()
        };
        let second = SearchCriteria {
            rooms: Some(Rooms::from("4")),
            ..Default::default()
        };
        session.submit(first, SortKey::Newest).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.submit(second, SortKey::Newest).unwrap();

        let mut seen = Vec::new();
        loop {
            rx.changed().await.unwrap();
            let snap = rx.borrow_and_update().clone();
            let settled = snap.state.is_settled();
            seen.push(snap);
            if settled {
                break;
            }
        }
        // Both timers have long fired; nothing else may show up.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!rx.has_changed().unwrap());

        let published: Vec<_> = seen.iter().filter(|s| s.state.is_settled()).collect();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].generation, 2);
        assert_eq!(ids(&published[0].state), vec![3]);
        assert_eq!(ids(&session.current()), vec![3]);
    }

    /// Fails its first search, then answers from the wrapped engine
    struct FlakySearcher {
        engine: Arc<SearchEngine>,
        failed_once: AtomicBool,
    }

    impl Searcher for FlakySearcher {
        fn search(&self, criteria: &SearchCriteria, sort: SortKey) -> SearchResult<Hits> {
            if !self.failed_once.swap(true, Ordering::SeqCst) {
                return Err(SearchError::ComputeFailed("backend unavailable".to_string()));
            }
            self.engine.search(criteria, sort)
        }
    }

    struct PanickingSearcher;

    impl Searcher for PanickingSearcher {
        fn search(&self, _: &SearchCriteria, _: SortKey) -> SearchResult<Hits> {
            panic!("corrupt catalog");
        }
    }

    fn assert_generic_failure(state: SearchState) {
        match state {
            SearchState::Failed(message) => assert_eq!(message, GENERIC_FAILURE),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failures_publish_a_generic_error_and_can_be_retried() {
        let searcher = Arc::new(FlakySearcher {
            engine: engine(),
            failed_once: AtomicBool::new(false),
        });
        let session = QuerySession::open(searcher, LATENCY);

        session
            .submit(SearchCriteria::default(), SortKey::Newest)
            .unwrap();
        assert_generic_failure(session.settled().await.unwrap());

        session
            .submit(SearchCriteria::default(), SortKey::Newest)
            .unwrap();
        assert!(matches!(session.current(), SearchState::Loading));
        let state = session.settled().await.unwrap();
        assert_eq!(ids(&state), vec![3, 2, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_search_publishes_an_error() {
        let session = QuerySession::open(Arc::new(PanickingSearcher), LATENCY);
        session
            .submit(SearchCriteria::default(), SortKey::Newest)
            .unwrap();
        assert_generic_failure(session.settled().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn inverted_range_settles_with_no_hits() {
        let session = QuerySession::open(engine(), LATENCY);
        let inverted = SearchCriteria {
            min_price: Some(200_000),
            max_price: Some(100_000),
            ..Default::default()
        };
        session.submit(inverted, SortKey::Newest).unwrap();
        assert!(ids(&session.settled().await.unwrap()).is_empty());
    }

    #[tokio::test]
    async fn settled_before_any_submit_is_idle() {
        let session = QuerySession::open(engine(), LATENCY);
        assert!(matches!(session.settled().await.unwrap(), SearchState::Idle));
    }

    #[test]
    fn submit_outside_runtime_leaves_state_untouched() {
        let session = QuerySession::open(engine(), LATENCY);
        assert_eq!(
            session.submit(SearchCriteria::default(), SortKey::Newest),
            Err(SearchError::NoRuntime)
        );
        assert_eq!(session.generation(), 0);
        assert!(matches!(session.current(), SearchState::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn resubmitting_same_criteria_is_idempotent() {
        let session = QuerySession::open(engine(), LATENCY);
        session.submit(SearchCriteria::default(), SortKey::PriceAsc).unwrap();
        let first = ids(&session.settled().await.unwrap());
        session.submit(SearchCriteria::default(), SortKey::PriceAsc).unwrap();
        let second = ids(&session.settled().await.unwrap());
        assert_eq!(first, second);
        assert_eq!(first, vec![2, 1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_work() {
        let session = QuerySession::open(engine(), LATENCY);
        session
            .submit(SearchCriteria::default(), SortKey::Newest)
            .unwrap();
        session.dispose();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(matches!(session.current(), SearchState::Loading));
        assert_eq!(
            session.submit(SearchCriteria::default(), SortKey::Newest),
            Err(SearchError::SessionClosed)
        );
        assert_eq!(session.settled().await.unwrap_err(), SearchError::SessionClosed);
        assert_eq!(session.generation(), 1);
    }
}
