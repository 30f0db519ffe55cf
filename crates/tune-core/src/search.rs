//! Search-as-you-type over the paginated song search endpoint.
//!
//! `SearchController` is a single-owner state machine. Keystrokes go through
//! a debouncer; requests run on spawned tasks. Both report back as
//! [`SearchEvent`]s on the channel returned by [`SearchController::new`], and
//! the owner feeds them to [`SearchController::handle_event`]. All state
//! changes therefore happen on the owner's task, one event at a time.
//!
//! ```text
//!  set_query ──▶ Debouncer ──▶ QueryDebounced ──▶ fetch_page ──▶ PageLoaded
//!  load_more / refresh ─────────────────────────▶ fetch_page ──▶ PageLoaded
//! ```
//!
//! `is_loading` admits one request at a time. A debounced query that arrives
//! while a request is in flight is parked and sent once that request lands.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::api::SongApi;
use crate::debounce::Debouncer;
use crate::error::ApiResult;
use crate::interaction::InteractionRecorder;
use crate::now_playing::CurrentSongSink;
use crate::song::{ResultPage, Song};
use crate::token::TokenStore;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    /// Every page received since the last reset, in page order. Not deduplicated.
    pub results: Vec<Song>,
    pub current_page: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub is_refreshing: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            current_page: 0,
            has_more: true,
            is_loading: false,
            is_refreshing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub query: String,
    pub page: u32,
    pub is_load_more: bool,
}

#[derive(Debug)]
pub enum SearchEvent {
    /// The debounce window closed on this query.
    QueryDebounced(String),
    /// A dispatched request finished.
    PageLoaded {
        request: PageRequest,
        outcome: ApiResult<ResultPage>,
    },
}

pub struct SearchController<A, S, C> {
    api: Arc<A>,
    sink: Arc<C>,
    interactions: InteractionRecorder<A, S>,
    state: SearchState,
    debounced: Debouncer<String>,
    events_tx: mpsc::UnboundedSender<SearchEvent>,
    in_flight: Option<AbortHandle>,
    /// Debounced query that hit the in-flight gate.
    deferred_query: Option<String>,
}

impl<A: SongApi, S: TokenStore, C: CurrentSongSink> SearchController<A, S, C> {
    pub fn new(
        api: Arc<A>,
        tokens: Arc<S>,
        sink: Arc<C>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let debounce_tx = events_tx.clone();
        let debounced = Debouncer::new(debounce, move |query: String| {
            let _ = debounce_tx.send(SearchEvent::QueryDebounced(query));
        });

        let controller = Self {
            interactions: InteractionRecorder::new(Arc::clone(&api), tokens),
            api,
            sink,
            state: SearchState::default(),
            debounced,
            events_tx,
            in_flight: None,
            deferred_query: None,
        };
        (controller, events_rx)
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Replace the query and start over from the first page once typing
    /// settles. The empty query is valid and lists the default catalogue.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.state.query = text.clone();
        self.state.results.clear();
        self.state.current_page = 0;
        self.state.has_more = true;
        self.debounced.call(text);
    }

    /// Dispatch a search request unless one is already running, or unless
    /// this is a load-more with nothing left to load. Returns whether a
    /// request went out.
    pub fn fetch_page(&mut self, query: &str, page: u32, is_load_more: bool) -> bool {
        if self.state.is_loading || (is_load_more && !self.state.has_more) {
            return false;
        }
        self.state.is_loading = true;

        let request = PageRequest {
            query: query.to_string(),
            page,
            is_load_more,
        };
        debug!(
            "[search] fetching query={:?} page={} load_more={}",
            request.query, request.page, request.is_load_more
        );

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let task = tokio::spawn(async move {
            let outcome = api.search(&request.query, request.page).await;
            let _ = tx.send(SearchEvent::PageLoaded { request, outcome });
        });
        self.in_flight = Some(task.abort_handle());
        true
    }

    /// Fetch the page after `current_page`, appending it.
    pub fn load_more(&mut self) -> bool {
        if self.state.is_loading || !self.state.has_more {
            return false;
        }
        let Some(next) = self.state.current_page.checked_add(1) else {
            warn!(
                "[search] page {} is the last addressable page",
                self.state.current_page
            );
            self.state.has_more = false;
            return false;
        };
        let query = self.state.query.clone();
        self.fetch_page(&query, next, true)
    }

    /// Re-fetch page 0 of the current query. `is_refreshing` stays set until
    /// that request lands, or is cleared right away if it could not be sent.
    pub fn refresh(&mut self) -> bool {
        self.state.is_refreshing = true;
        let query = self.state.query.clone();
        let sent = self.fetch_page(&query, 0, false);
        if !sent {
            self.state.is_refreshing = false;
        }
        sent
    }

    /// Record a listening interaction in the background and publish `song`
    /// as the current song.
    pub async fn select_song(&mut self, song: Song) {
        self.interactions.play(self.sink.as_ref(), song).await;
    }

    /// Apply one event from the controller's channel.
    pub fn handle_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::QueryDebounced(query) => {
                if !self.fetch_page(&query, 0, false) {
                    debug!("[search] request in flight, deferring query={:?}", query);
                    self.deferred_query = Some(query);
                }
            }
            SearchEvent::PageLoaded { request, outcome } => {
                self.apply_page(request, outcome);
                if let Some(query) = self.deferred_query.take() {
                    self.fetch_page(&query, 0, false);
                }
            }
        }
    }

    fn apply_page(&mut self, request: PageRequest, outcome: ApiResult<ResultPage>) {
        self.in_flight = None;
        match outcome {
            Ok(page) => {
                info!(
                    "[search] query={:?} page={} got {} songs (last={})",
                    request.query,
                    page.page_number,
                    page.content.len(),
                    page.is_last
                );
                if request.is_load_more {
                    self.state.results.extend(page.content);
                } else {
                    self.state.results = page.content;
                }
                self.state.has_more = !page.is_last;
                self.state.current_page = page.page_number;
            }
            Err(e) => {
                warn!(
                    "[search] query={:?} page={} failed: {}",
                    request.query, request.page, e
                );
            }
        }
        self.state.is_loading = false;
        self.state.is_refreshing = false;
    }

    /// Wait for pending interaction recordings (shutdown path).
    pub async fn flush_interactions(&mut self) {
        self.interactions.flush().await;
    }
}

impl<A, S, C> Drop for SearchController<A, S, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
