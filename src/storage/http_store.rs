//! Typed HTTP client for a remote notesync server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::NoteStore;
use crate::entity::{NewNote, Note, NoteUpdate, OwnerId};
use crate::error::{NoteSyncError, Result};
use crate::search::{NoteQuery, Page, PageRequest};
use crate::suggest::{check_suggest_content, TagSuggester};

/// Header carrying the caller's identity to the server.
pub const USER_HEADER: &str = "x-user-id";

// ── Wire types ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct SuggestBody<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestedTags {
    suggested_tags: Vec<String>,
}

// ── Client impl ─────────────────────────────────────

/// [`NoteStore`] backed by the REST API served by `notesync serve`.
///
/// Every call is a single independent request. Connection failures and
/// timeouts come back as `Transient`; nothing is retried here.
pub struct HttpNoteStore {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpNoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| NoteSyncError::Config(format!("invalid server URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(NoteSyncError::Config(format!(
                "server URL '{}' cannot be used as a base",
                base_url
            )));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn check(resp: Response, id: Option<&str>) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.to_string(),
        };
        debug!(%status, %message, "remote store returned an error");

        Err(match status {
            StatusCode::BAD_REQUEST => NoteSyncError::Validation(message),
            StatusCode::UNAUTHORIZED => NoteSyncError::Unauthenticated,
            StatusCode::NOT_FOUND => NoteSyncError::NoteNotFound(id.unwrap_or(&message).to_string()),
            _ => NoteSyncError::Transient(format!("HTTP {}: {}", status, message)),
        })
    }

    async fn fetch_page(
        &self,
        owner: &OwnerId,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Page<Note>> {
        let resp = self
            .client
            .get(url)
            .header(USER_HEADER, owner.as_str())
            .query(query)
            .send()
            .await?;
        let resp = Self::check(resp, None).await?;
        Ok(resp.json::<Page<Note>>().await?)
    }
}

fn page_params(request: PageRequest) -> [(&'static str, String); 2] {
    [
        ("page", request.page.to_string()),
        ("limit", request.limit.to_string()),
    ]
}

#[async_trait]
impl NoteStore for HttpNoteStore {
    async fn create(&self, owner: &OwnerId, draft: NewNote) -> Result<Note> {
        let resp = self
            .client
            .post(self.endpoint(&["notes"]))
            .header(USER_HEADER, owner.as_str())
            .json(&draft)
            .send()
            .await?;
        let resp = Self::check(resp, None).await?;
        Ok(resp.json::<Note>().await?)
    }

    async fn get(&self, owner: &OwnerId, id: &str) -> Result<Note> {
        let resp = self
            .client
            .get(self.endpoint(&["notes", id]))
            .header(USER_HEADER, owner.as_str())
            .send()
            .await?;
        let resp = Self::check(resp, Some(id)).await?;
        Ok(resp.json::<DataEnvelope<Note>>().await?.data)
    }

    async fn update(&self, owner: &OwnerId, id: &str, update: NoteUpdate) -> Result<Note> {
        let resp = self
            .client
            .put(self.endpoint(&["notes", id]))
            .header(USER_HEADER, owner.as_str())
            .json(&update)
            .send()
            .await?;
        let resp = Self::check(resp, Some(id)).await?;
        Ok(resp.json::<Note>().await?)
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.endpoint(&["notes", id]))
            .header(USER_HEADER, owner.as_str())
            .send()
            .await?;
        Self::check(resp, Some(id)).await?;
        Ok(())
    }

    async fn list(&self, owner: &OwnerId, request: PageRequest) -> Result<Page<Note>> {
        request.validate()?;
        self.fetch_page(owner, self.endpoint(&["notes"]), &page_params(request))
            .await
    }

    async fn search(
        &self,
        owner: &OwnerId,
        query: &NoteQuery,
        request: PageRequest,
    ) -> Result<Page<Note>> {
        request.validate()?;
        let mut params: Vec<(&str, String)> = Vec::new();
        if !query.text.is_empty() {
            params.push(("query", query.text.clone()));
        }
        for tag in &query.tags {
            params.push(("tags", tag.clone()));
        }
        params.extend(page_params(request));

        self.fetch_page(owner, self.endpoint(&["notes", "search"]), &params)
            .await
    }
}

#[async_trait]
impl TagSuggester for HttpNoteStore {
    async fn suggest(&self, content: &str) -> Result<Vec<String>> {
        check_suggest_content(content)?;
        let resp = self
            .client
            .post(self.endpoint(&["notes", "suggest-tags"]))
            .json(&SuggestBody { content })
            .send()
            .await?;
        let resp = Self::check(resp, None).await?;
        Ok(resp
            .json::<DataEnvelope<SuggestedTags>>()
            .await?
            .data
            .suggested_tags)
    }
}
