//! In-crate fakes for controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use reqwest::StatusCode;

use crate::api::SongApi;
use crate::error::{ApiError, ApiResult};
use crate::now_playing::CurrentSongSink;
use crate::song::{ResultPage, Song, SongId, User};

pub fn song(id: SongId) -> Song {
    Song {
        id,
        title: format!("Song {id}"),
        artist: None,
        thumbnail: None,
        duration: 180 + id as u32,
    }
}

pub fn page(ids: &[SongId], page_number: u32, is_last: bool) -> ResultPage {
    ResultPage {
        content: ids.iter().copied().map(song).collect(),
        page_number,
        is_last,
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "boom".to_string(),
    }
}

pub fn ids(songs: &[Song]) -> Vec<SongId> {
    songs.iter().map(|s| s.id).collect()
}

/// Yield to the runtime until `done` holds, giving up after a bounded number
/// of turns. Returns whether it held.
pub async fn yield_until(done: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if done() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    done()
}

/// Scripted backend. Searches pop queued pages in order; an empty queue
/// answers with an empty last page. After `stall`, every call parks forever
/// and only ends by being dropped.
#[derive(Default)]
pub struct FakeApi {
    pages: Mutex<VecDeque<ApiResult<ResultPage>>>,
    liked: Mutex<VecDeque<ApiResult<Vec<Song>>>>,
    searches: Mutex<Vec<(String, u32)>>,
    liked_calls: Mutex<Vec<String>>,
    interactions: Mutex<Vec<(SongId, u32, String)>>,
    fail_interactions: AtomicBool,
    stall: AtomicBool,
    parked: AtomicUsize,
    released: AtomicUsize,
}

/// Counts a parked call as released when its future is dropped.
struct Release<'a>(&'a AtomicUsize);

impl Drop for Release<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl FakeApi {
    pub fn push_page(&self, page: ResultPage) {
        self.pages.lock().unwrap().push_back(Ok(page));
    }

    pub fn push_search_error(&self) {
        self.pages.lock().unwrap().push_back(Err(server_error()));
    }

    pub fn push_liked(&self, result: ApiResult<Vec<Song>>) {
        self.liked.lock().unwrap().push_back(result);
    }

    pub fn fail_interactions(&self) {
        self.fail_interactions.store(true, Ordering::SeqCst);
    }

    pub fn stall(&self) {
        self.stall.store(true, Ordering::SeqCst);
    }

    /// Calls currently or previously parked by `stall`.
    pub fn parked(&self) -> usize {
        self.parked.load(Ordering::SeqCst)
    }

    /// Parked calls whose future has since been dropped.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    async fn park_if_stalled(&self) {
        if !self.stall.load(Ordering::SeqCst) {
            return;
        }
        let _release = Release(&self.released);
        self.parked.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
    }

    pub fn searches(&self) -> Vec<(String, u32)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn liked_calls(&self) -> Vec<String> {
        self.liked_calls.lock().unwrap().clone()
    }

    pub fn interactions(&self) -> Vec<(SongId, u32, String)> {
        self.interactions.lock().unwrap().clone()
    }
}

impl SongApi for FakeApi {
    async fn search(&self, query: &str, page: u32) -> ApiResult<ResultPage> {
        self.searches.lock().unwrap().push((query.to_string(), page));
        self.park_if_stalled().await;
        let next = self.pages.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Ok(ResultPage {
                content: Vec::new(),
                page_number: page,
                is_last: true,
            })
        })
    }

    async fn liked_songs(&self, access_token: &str) -> ApiResult<Vec<Song>> {
        self.liked_calls.lock().unwrap().push(access_token.to_string());
        self.park_if_stalled().await;
        let next = self.liked.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn record_interaction(
        &self,
        song_id: SongId,
        duration_secs: u32,
        access_token: &str,
    ) -> ApiResult<()> {
        self.park_if_stalled().await;
        self.interactions
            .lock()
            .unwrap()
            .push((song_id, duration_secs, access_token.to_string()));
        if self.fail_interactions.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(())
    }

    async fn me(&self, _access_token: &str) -> ApiResult<User> {
        Ok(User {
            id: 1,
            email: Some("listener@example.com".to_string()),
            full_name: Some("Listener".to_string()),
            avatar: None,
        })
    }
}

#[derive(Default)]
pub struct FakeSink {
    published: Mutex<Vec<Song>>,
}

impl FakeSink {
    pub fn published_ids(&self) -> Vec<SongId> {
        ids(&self.published.lock().unwrap())
    }
}

impl CurrentSongSink for FakeSink {
    async fn publish(&self, song: Song) {
        self.published.lock().unwrap().push(song);
    }
}
