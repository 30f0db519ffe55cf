//! Song catalogue types and the wire shapes the backend sends them in.

use serde::{Deserialize, Serialize};

/// Backend identifier of a song.
pub type SongId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: Option<Artist>,
    /// Image reference as stored by the backend (path or URL).
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Length in whole seconds.
    #[serde(default)]
    pub duration: u32,
}

impl Song {
    /// Artist name for display, falling back to "Unknown Artist".
    pub fn display_artist(&self) -> &str {
        match &self.artist {
            Some(a) if !a.full_name.trim().is_empty() => &a.full_name,
            _ => "Unknown Artist",
        }
    }
}

/// One page of search results, as the search controller consumes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    pub content: Vec<Song>,
    /// Page number echoed by the server.
    pub page_number: u32,
    pub is_last: bool,
}

/// Spring-style page body: `{ content, pageable: { pageNumber }, number, last }`.
///
/// Unpaged responses serialize `pageable` as the string `"INSTANCE"`, so the
/// field is accepted in either shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    #[serde(default)]
    pub content: Vec<Song>,
    #[serde(default)]
    pub pageable: Option<PageableField>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub last: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PageableField {
    Paged {
        #[serde(rename = "pageNumber")]
        page_number: u32,
    },
    Other(serde_json::Value),
}

impl PageResponse {
    /// Adapt to a [`ResultPage`]. The server's page number wins; `requested`
    /// is only used when the body carries none. A missing `last` flag counts
    /// as last only when the page came back empty.
    pub fn into_result_page(self, requested: u32) -> ResultPage {
        let page_number = match self.pageable {
            Some(PageableField::Paged { page_number }) => page_number,
            _ => self.number.unwrap_or(requested),
        };
        let is_last = self.last.unwrap_or(self.content.is_empty());
        ResultPage {
            content: self.content,
            page_number,
            is_last,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Body of `POST /interactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRequest {
    pub song_id: SongId,
    pub duration: u32,
}
