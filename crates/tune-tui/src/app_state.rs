//! AppState: read-only snapshot the components render from.
//!
//! The App refreshes it from the controllers after every event it applies.

use chrono::{DateTime, Local};
use tune_core::now_playing::NowPlaying;
use tune_core::search::SearchState;
use tune_core::song::Song;

use crate::action::Workspace;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub workspace: Workspace,
    pub search: SearchState,
    pub liked: Vec<Song>,
    pub liked_loading: bool,
    pub liked_fetched_at: Option<DateTime<Local>>,
    pub now: NowPlaying,
    pub now_playing_open: bool,
}

impl AppState {
    pub fn current_song_id(&self) -> Option<u64> {
        self.now.song.as_ref().map(|s| s.id)
    }
}
