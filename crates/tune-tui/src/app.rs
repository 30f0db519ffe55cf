//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns the components, the controllers and `AppState` (the read-only
//!   snapshot components render from).
//! - A blocking thread forwards terminal events over an mpsc channel.
//! - The loop selects over terminal events, controller events and a UI tick,
//!   applies one at a time, refreshes `AppState`, then redraws.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use tune_core::api::HttpSongApi;
use tune_core::config::Config;
use tune_core::liked::{LikedEvent, LikedSongs};
use tune_core::now_playing::NowPlayingStore;
use tune_core::search::{SearchController, SearchEvent};
use tune_core::token::FileTokenStore;

use crate::{
    action::{Action, ComponentId, Workspace},
    app_state::AppState,
    component::Component,
    components::{
        liked_pane::LikedPane,
        now_playing::{self, NowPlayingModal},
        search_pane::SearchPane,
    },
    widgets::status_bar,
};

const UI_TICK: Duration = Duration::from_millis(200);
const INPUT_POLL: Duration = Duration::from_millis(250);
/// Upper bound on waiting for interaction posts at exit.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(3);

type Search = SearchController<HttpSongApi, FileTokenStore, NowPlayingStore>;
type Liked = LikedSongs<HttpSongApi, FileTokenStore, NowPlayingStore>;

/// Receivers for the controllers' completion events.
pub struct AppChannels {
    search: mpsc::UnboundedReceiver<SearchEvent>,
    liked: mpsc::UnboundedReceiver<LikedEvent>,
}

pub struct App {
    state: AppState,
    search: Search,
    liked: Liked,
    now_playing: NowPlayingStore,
    search_pane: SearchPane,
    liked_pane: LikedPane,
    modal: NowPlayingModal,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        api: Arc<HttpSongApi>,
        tokens: Arc<FileTokenStore>,
    ) -> (Self, AppChannels) {
        let now_playing = NowPlayingStore::new();
        let sink = Arc::new(now_playing.clone());

        let (search, search_rx) = SearchController::new(
            Arc::clone(&api),
            Arc::clone(&tokens),
            Arc::clone(&sink),
            config.search.debounce(),
        );
        let (liked, liked_rx) = LikedSongs::new(api, tokens, sink);

        let app = Self {
            state: AppState::default(),
            search,
            liked,
            now_playing,
            search_pane: SearchPane::new(),
            liked_pane: LikedPane::new(),
            modal: NowPlayingModal::new(),
            should_quit: false,
        };
        let channels = AppChannels {
            search: search_rx,
            liked: liked_rx,
        };
        (app, channels)
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut channels: AppChannels) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal, &mut channels).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.shutdown().await;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        channels: &mut AppChannels,
    ) -> anyhow::Result<()> {
        // ── Background thread: keyboard events ────────────────────────────────
        let (input_tx, mut input_rx) = mpsc::channel::<Event>(1024);
        tokio::task::spawn_blocking(move || loop {
            if input_tx.is_closed() {
                break;
            }
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if input_tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("terminal read failed: {}", e);
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    error!("terminal poll failed: {}", e);
                    break;
                }
            }
        });

        let mut ui_tick = tokio::time::interval(UI_TICK);
        ui_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_tick = Instant::now();

        // Default unfiltered listing, and the Home workspace gets its first focus.
        self.search.set_query("");
        self.liked.load();
        self.sync_state().await;

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(ev) = input_rx.recv() => {
                    needs_redraw = self.handle_terminal_event(ev).await;
                }
                Some(ev) = channels.search.recv() => {
                    self.search.handle_event(ev);
                    needs_redraw = true;
                }
                Some(ev) = channels.liked.recv() => {
                    self.liked.handle_event(ev);
                    self.now_playing
                        .set_liked_ids(self.liked.songs().iter().map(|s| s.id))
                        .await;
                    needs_redraw = true;
                }
                _ = ui_tick.tick() => {
                    let now = Instant::now();
                    let dt = now - last_tick;
                    last_tick = now;
                    needs_redraw = self.now_playing.tick(dt).await;

                    let actions = match self.state.workspace.pane() {
                        ComponentId::SearchPane => self.search_pane.tick(&self.state),
                        _ => self.liked_pane.tick(&self.state),
                    };
                    for action in actions {
                        self.dispatch(action).await;
                        needs_redraw = true;
                    }
                }
            }

            if needs_redraw {
                self.sync_state().await;
            }
        }

        Ok(())
    }

    async fn shutdown(&mut self) {
        info!("tune shutting down, flushing interactions");
        let flush = async {
            self.search.flush_interactions().await;
            self.liked.flush_interactions().await;
        };
        if tokio::time::timeout(FLUSH_TIMEOUT, flush).await.is_err() {
            warn!("gave up waiting for pending interactions");
        }
    }

    /// Copy what the components render from out of the controllers.
    async fn sync_state(&mut self) {
        self.state.search.clone_from(self.search.state());
        self.state.liked.clear();
        self.state.liked.extend_from_slice(self.liked.songs());
        self.state.liked_loading = self.liked.is_loading();
        self.state.liked_fetched_at = self.liked.fetched_at();
        self.state.now = self.now_playing.snapshot().await;
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    async fn handle_terminal_event(&mut self, ev: Event) -> bool {
        match ev {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                let actions = self.handle_key(key);
                for action in actions {
                    self.dispatch(action).await;
                }
                true
            }
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        if self.state.now_playing_open {
            return self.modal.handle_key(key, &self.state);
        }

        // While the search box has focus every printable key is text.
        let typing =
            self.state.workspace == Workspace::Search && self.search_pane.is_typing();
        if !typing {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Tab | KeyCode::BackTab => {
                    return vec![Action::SwitchWorkspace(self.state.workspace.next())]
                }
                KeyCode::Char('1') => return vec![Action::SwitchWorkspace(Workspace::Home)],
                KeyCode::Char('2') => return vec![Action::SwitchWorkspace(Workspace::Search)],
                KeyCode::Char(' ') => return vec![Action::TogglePlayPause],
                KeyCode::Char('p') => return vec![Action::OpenNowPlaying],
                _ => {}
            }
        }

        match self.state.workspace.pane() {
            ComponentId::SearchPane => self.search_pane.handle_key(key, &self.state),
            _ => self.liked_pane.handle_key(key, &self.state),
        }
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        debug!("dispatch: {:?}", action);
        match action {
            Action::QueryChanged(text) => self.search.set_query(text),
            Action::LoadMore => {
                self.search.load_more();
            }
            Action::Refresh => {
                self.search.refresh();
            }
            Action::ReloadLiked => {
                self.liked.load();
            }
            Action::Play(ComponentId::LikedPane, song) => self.liked.select_song(song).await,
            Action::Play(_, song) => self.search.select_song(song).await,
            Action::TogglePlayPause => self.now_playing.toggle_play_pause().await,
            Action::ToggleLike => {
                if let Some(liked) = self.now_playing.toggle_like().await {
                    info!("like toggled: {}", liked);
                }
            }
            Action::OpenNowPlaying => self.state.now_playing_open = true,
            Action::CloseNowPlaying => self.state.now_playing_open = false,
            Action::SwitchWorkspace(workspace) => {
                if workspace == Workspace::Home && self.state.workspace != Workspace::Home {
                    self.liked.load();
                }
                self.state.workspace = workspace;
            }
            Action::Quit => self.should_quit = true,
        }
        // Controllers changed synchronously; keep the snapshot current for
        // the next action in the same batch.
        self.sync_state().await;
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(area);

        let pane_focused = !self.state.now_playing_open;
        match self.state.workspace {
            Workspace::Home => self
                .liked_pane
                .draw(frame, rows[0], pane_focused, &self.state),
            Workspace::Search => self
                .search_pane
                .draw(frame, rows[0], pane_focused, &self.state),
        }

        status_bar::draw_separator(frame, rows[1]);
        now_playing::draw_bar(frame, rows[2], &self.state);

        let typing = self.state.workspace == Workspace::Search && self.search_pane.is_typing();
        status_bar::draw_keys_bar(
            frame,
            rows[3],
            self.state.workspace,
            typing,
            self.state.now_playing_open,
        );

        if self.state.now_playing_open {
            self.modal.draw(frame, area, true, &self.state);
        }
    }
}
