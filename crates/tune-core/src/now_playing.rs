//! The app-wide "current song" and its play clock.
//!
//! There is no audio engine behind this: progress is wall-clock time over the
//! song's declared duration. `rev` bumps on every mutation so renderers can
//! skip unchanged snapshots.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::song::{Song, SongId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    pub rev: u64,
    pub song: Option<Song>,
    pub is_playing: bool,
    pub is_liked: bool,
    pub elapsed: Duration,
}

impl NowPlaying {
    /// Fraction of the song elapsed, `0.0..=1.0`. Zero-length songs report 0.
    pub fn progress(&self) -> f64 {
        match &self.song {
            Some(song) if song.duration > 0 => {
                (self.elapsed.as_secs_f64() / song.duration as f64).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

/// Where a selected song gets published.
pub trait CurrentSongSink: Send + Sync + 'static {
    fn publish(&self, song: Song) -> impl Future<Output = ()> + Send;
}

#[derive(Default)]
struct Inner {
    now: NowPlaying,
    liked_ids: HashSet<SongId>,
    /// Likes toggled locally. They win over the server set, which does not
    /// know about them.
    toggled: HashMap<SongId, bool>,
}

#[derive(Clone, Default)]
pub struct NowPlayingStore {
    inner: Arc<RwLock<Inner>>,
}

impl NowPlayingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> NowPlaying {
        self.inner.read().await.now.clone()
    }

    pub async fn rev(&self) -> u64 {
        self.inner.read().await.now.rev
    }

    /// Replace the known liked set (after the liked list loads), keeping
    /// likes toggled since startup.
    pub async fn set_liked_ids(&self, ids: impl IntoIterator<Item = SongId>) {
        let mut inner = self.inner.write().await;
        let mut liked_ids: HashSet<SongId> = ids.into_iter().collect();
        for (&id, &liked) in &inner.toggled {
            if liked {
                liked_ids.insert(id);
            } else {
                liked_ids.remove(&id);
            }
        }
        inner.liked_ids = liked_ids;
        let liked = inner
            .now
            .song
            .as_ref()
            .is_some_and(|s| inner.liked_ids.contains(&s.id));
        if inner.now.is_liked != liked {
            inner.now.is_liked = liked;
            inner.now.rev += 1;
        }
    }

    pub async fn is_liked(&self, id: SongId) -> bool {
        self.inner.read().await.liked_ids.contains(&id)
    }

    pub async fn toggle_play_pause(&self) {
        let mut inner = self.inner.write().await;
        let Some(song) = &inner.now.song else {
            return;
        };
        // Restart from the top when toggled after reaching the end.
        if !inner.now.is_playing && inner.now.elapsed.as_secs() >= u64::from(song.duration) {
            inner.now.elapsed = Duration::ZERO;
        }
        inner.now.is_playing = !inner.now.is_playing;
        inner.now.rev += 1;
    }

    /// Flip the like flag of the current song. Returns the new state.
    pub async fn toggle_like(&self) -> Option<bool> {
        let mut inner = self.inner.write().await;
        let id = inner.now.song.as_ref()?.id;
        let liked = if inner.liked_ids.remove(&id) {
            false
        } else {
            inner.liked_ids.insert(id);
            true
        };
        inner.toggled.insert(id, liked);
        inner.now.is_liked = liked;
        inner.now.rev += 1;
        Some(liked)
    }

    /// Advance the clock by `dt` while playing. Returns `true` if anything
    /// changed.
    pub async fn tick(&self, dt: Duration) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.now.is_playing {
            return false;
        }
        let Some(total) = inner.now.song.as_ref().map(|s| Duration::from_secs(s.duration.into()))
        else {
            return false;
        };
        let elapsed = (inner.now.elapsed + dt).min(total);
        inner.now.elapsed = elapsed;
        if elapsed >= total {
            inner.now.is_playing = false;
        }
        inner.now.rev += 1;
        true
    }
}

impl CurrentSongSink for NowPlayingStore {
    async fn publish(&self, song: Song) {
        let mut inner = self.inner.write().await;
        debug!("Now playing: {} ({})", song.title, song.id);
        inner.now.is_liked = inner.liked_ids.contains(&song.id);
        inner.now.song = Some(song);
        inner.now.is_playing = true;
        inner.now.elapsed = Duration::ZERO;
        inner.now.rev += 1;
    }
}
