//! Song backend REST client.

use std::future::Future;
use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::song::{InteractionRequest, PageResponse, ResultPage, Song, SongId, User};

/// Calls the rest of the client makes against the backend.
///
/// Methods return `Send` futures so controllers can run them on spawned tasks.
pub trait SongApi: Send + Sync + 'static {
    /// Paginated search. The empty query lists the default catalogue.
    fn search(&self, query: &str, page: u32)
        -> impl Future<Output = ApiResult<ResultPage>> + Send;

    fn liked_songs(&self, access_token: &str) -> impl Future<Output = ApiResult<Vec<Song>>> + Send;

    fn record_interaction(
        &self,
        song_id: SongId,
        duration_secs: u32,
        access_token: &str,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    fn me(&self, access_token: &str) -> impl Future<Output = ApiResult<User>> + Send;
}

#[derive(Clone)]
pub struct HttpSongApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSongApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tune/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and turn non-success statuses into `ApiError::Status`.
    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status, &body))
    }

    async fn json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl SongApi for HttpSongApi {
    async fn search(&self, query: &str, page: u32) -> ApiResult<ResultPage> {
        debug!("GET /songs/search query={:?} page={}", query, page);
        let request = self
            .client
            .get(self.url("/songs/search"))
            .header("Accept", "application/json")
            .query(&[("query", query.to_string()), ("page", page.to_string())]);
        let response = Self::send(request).await?;
        let body: PageResponse = Self::json(response).await?;
        Ok(body.into_result_page(page))
    }

    async fn liked_songs(&self, access_token: &str) -> ApiResult<Vec<Song>> {
        debug!("GET /songs/liked");
        let request = self
            .client
            .get(self.url("/songs/liked"))
            .header("Accept", "application/json")
            .bearer_auth(access_token);
        let response = Self::send(request).await?;
        Self::json(response).await
    }

    async fn record_interaction(
        &self,
        song_id: SongId,
        duration_secs: u32,
        access_token: &str,
    ) -> ApiResult<()> {
        debug!("POST /interactions song={} duration={}", song_id, duration_secs);
        let request = self
            .client
            .post(self.url("/interactions"))
            .bearer_auth(access_token)
            .json(&InteractionRequest {
                song_id,
                duration: duration_secs,
            });
        // The body, if any, carries nothing the client uses.
        Self::send(request).await?;
        Ok(())
    }

    async fn me(&self, access_token: &str) -> ApiResult<User> {
        debug!("GET /users/me");
        let request = self
            .client
            .get(self.url("/users/me"))
            .header("Accept", "application/json")
            .bearer_auth(access_token);
        let response = Self::send(request).await?;
        Self::json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let api = HttpSongApi::new("http://localhost:8080/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.url("/songs/liked"), "http://localhost:8080/api/songs/liked");
    }
}
