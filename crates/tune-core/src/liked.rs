//! The signed-in user's liked songs.
//!
//! Same shape as the search controller: `load` spawns the request and the
//! owner applies the resulting [`LikedEvent`]. Without a token the load is
//! skipped and the list stays as it was.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::api::SongApi;
use crate::error::ApiResult;
use crate::interaction::InteractionRecorder;
use crate::now_playing::CurrentSongSink;
use crate::song::Song;
use crate::token::{access_token, TokenStore};

#[derive(Debug)]
pub enum LikedEvent {
    /// No token stored; nothing was requested.
    Skipped,
    Loaded(ApiResult<Vec<Song>>),
}

pub struct LikedSongs<A, S, C> {
    api: Arc<A>,
    tokens: Arc<S>,
    sink: Arc<C>,
    interactions: InteractionRecorder<A, S>,
    songs: Vec<Song>,
    is_loading: bool,
    fetched_at: Option<DateTime<Local>>,
    events_tx: mpsc::UnboundedSender<LikedEvent>,
    in_flight: Option<AbortHandle>,
}

impl<A: SongApi, S: TokenStore, C: CurrentSongSink> LikedSongs<A, S, C> {
    pub fn new(
        api: Arc<A>,
        tokens: Arc<S>,
        sink: Arc<C>,
    ) -> (Self, mpsc::UnboundedReceiver<LikedEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let liked = Self {
            interactions: InteractionRecorder::new(Arc::clone(&api), Arc::clone(&tokens)),
            api,
            tokens,
            sink,
            songs: Vec::new(),
            // Nothing has been shown yet; render as loading until the first answer.
            is_loading: true,
            fetched_at: None,
            events_tx,
            in_flight: None,
        };
        (liked, events_rx)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }

    /// Start a reload. Returns `false` if one is already running.
    pub fn load(&mut self) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.is_loading = true;

        let api = Arc::clone(&self.api);
        let tokens = Arc::clone(&self.tokens);
        let tx = self.events_tx.clone();
        let task = tokio::spawn(async move {
            let event = match access_token(tokens.as_ref()).await {
                Some(token) => LikedEvent::Loaded(api.liked_songs(&token).await),
                None => LikedEvent::Skipped,
            };
            let _ = tx.send(event);
        });
        self.in_flight = Some(task.abort_handle());
        true
    }

    pub fn handle_event(&mut self, event: LikedEvent) {
        self.in_flight = None;
        match event {
            LikedEvent::Skipped => debug!("[liked] no access token, skipping load"),
            LikedEvent::Loaded(Ok(songs)) => {
                info!("[liked] loaded {} songs", songs.len());
                self.songs = songs;
                self.fetched_at = Some(Local::now());
            }
            LikedEvent::Loaded(Err(e)) => warn!("[liked] load failed: {}", e),
        }
        self.is_loading = false;
    }

    /// Same record-then-publish path as a search result.
    pub async fn select_song(&mut self, song: Song) {
        self.interactions.play(self.sink.as_ref(), song).await;
    }

    pub async fn flush_interactions(&mut self) {
        self.interactions.flush().await;
    }
}

impl<A, S, C> Drop for LikedSongs<A, S, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
