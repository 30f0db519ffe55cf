//! Fire-and-forget listening interactions.
//!
//! Selecting a song records `(song_id, duration)` against the backend on a
//! detached task. The selecting caller never waits for it; failures end up in
//! the log only. Without a stored token the call is skipped.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::api::SongApi;
use crate::now_playing::CurrentSongSink;
use crate::song::{Song, SongId};
use crate::token::{access_token, TokenStore};

pub struct InteractionRecorder<A, S> {
    api: Arc<A>,
    tokens: Arc<S>,
    /// Dropping the set aborts anything still running.
    tasks: JoinSet<()>,
}

impl<A: SongApi, S: TokenStore> InteractionRecorder<A, S> {
    pub fn new(api: Arc<A>, tokens: Arc<S>) -> Self {
        Self {
            api,
            tokens,
            tasks: JoinSet::new(),
        }
    }

    /// Spawn the recording task and return immediately.
    pub fn record(&mut self, song_id: SongId, duration_secs: u32) {
        // Reap whatever already finished so the set does not grow unbounded.
        while self.tasks.try_join_next().is_some() {}

        let api = Arc::clone(&self.api);
        let tokens = Arc::clone(&self.tokens);
        self.tasks.spawn(async move {
            let Some(token) = access_token(tokens.as_ref()).await else {
                debug!("[interaction] no access token, skipping song {}", song_id);
                return;
            };
            match api.record_interaction(song_id, duration_secs, &token).await {
                Ok(()) => debug!("[interaction] recorded song {} ({}s)", song_id, duration_secs),
                Err(e) => warn!("[interaction] failed to record song {}: {}", song_id, e),
            }
        });
    }

    /// Record the interaction, then hand the song to `sink`. Publication never
    /// waits on the recording.
    pub async fn play<C: CurrentSongSink>(&mut self, sink: &C, song: Song) {
        self.record(song.id, song.duration);
        sink.publish(song).await;
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every outstanding recording to finish.
    pub async fn flush(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    error!("[interaction] recording task panicked: {}", e);
                }
            }
        }
    }
}
