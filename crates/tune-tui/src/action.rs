//! Action enum: user intents produced by components and dispatched by the App.

use tune_core::song::Song;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    LikedPane,
    SearchPane,
    NowPlaying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Workspace {
    #[default]
    Home,
    Search,
}

impl Workspace {
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Search => "Search",
        }
    }

    pub fn hotkey(self) -> char {
        match self {
            Self::Home => '1',
            Self::Search => '2',
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Home => Self::Search,
            Self::Search => Self::Home,
        }
    }

    /// The pane that owns keyboard focus in this workspace.
    pub fn pane(self) -> ComponentId {
        match self {
            Self::Home => ComponentId::LikedPane,
            Self::Search => ComponentId::SearchPane,
        }
    }
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Search ───────────────────────────────────────────────────────────────
    QueryChanged(String),
    LoadMore,
    Refresh,

    // ── Liked ────────────────────────────────────────────────────────────────
    ReloadLiked,

    // ── Playback ─────────────────────────────────────────────────────────────
    /// Record the interaction and publish the song. Carries the pane it was
    /// picked from so the owning controller records it.
    Play(ComponentId, Song),
    TogglePlayPause,
    ToggleLike,
    OpenNowPlaying,
    CloseNowPlaying,

    // ── Navigation ───────────────────────────────────────────────────────────
    SwitchWorkspace(Workspace),

    Quit,
}
