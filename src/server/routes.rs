//! Axum route handlers for the notes REST API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ApiError;
use crate::entity::{NewNote, Note, NoteUpdate, OwnerId};
use crate::error::NoteSyncError;
use crate::search::{NoteQuery, Page, PageRequest};
use crate::storage::{NoteStore, USER_HEADER};
use crate::suggest::TagSuggester;

pub struct AppState {
    pub store: Arc<dyn NoteStore>,
    pub suggester: Arc<dyn TagSuggester>,
    /// Page size when the request gives no `limit`.
    pub default_limit: usize,
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTags {
    pub suggested_tags: Vec<String>,
}

/// Caller identity, read from the `x-user-id` header.
pub struct Owner(pub OwnerId);

impl<S: Send + Sync> FromRequestParts<S> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Owner(OwnerId::new(value)))
            .ok_or(ApiError(NoteSyncError::Unauthenticated))
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError(NoteSyncError::validation(rejection.body_text())))
}

fn parse_number(key: &str, value: &str) -> ApiResult<usize> {
    value
        .parse()
        .map_err(|_| ApiError(NoteSyncError::validation(format!("{} must be a positive integer", key))))
}

/// Page and filter parameters. `tags` may repeat, as `tags=` or `tags[]=`.
fn parse_params(pairs: Vec<(String, String)>, default_limit: usize) -> ApiResult<(NoteQuery, PageRequest)> {
    let mut text = String::new();
    let mut tags = Vec::new();
    let mut request = PageRequest::new(1, default_limit);

    for (key, value) in pairs {
        match key.as_str() {
            "query" | "q" => text = value,
            "tags" | "tags[]" => tags.push(value),
            "page" => request.page = parse_number("page", &value)?,
            "limit" => request.limit = parse_number("limit", &value)?,
            _ => {}
        }
    }

    Ok((NoteQuery::new(text, tags), request))
}

// GET /notes
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Page<Note>>> {
    let (_, request) = parse_params(pairs, state.default_limit)?;
    debug!(%owner, page = request.page, limit = request.limit, "list notes");
    Ok(Json(state.store.list(&owner, request).await?))
}

// GET /notes/search
pub async fn search_notes(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Page<Note>>> {
    let (query, request) = parse_params(pairs, state.default_limit)?;
    debug!(%owner, text = %query.text, tags = ?query.tags, page = request.page, "search notes");
    Ok(Json(state.store.search(&owner, &query, request).await?))
}

// GET /notes/{id}
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> ApiResult<Json<Data<Note>>> {
    let note = state.store.get(&owner, &id).await?;
    Ok(Json(Data { data: note }))
}

// POST /notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let draft = body(payload)?;
    let note = state.store.create(&owner, draft).await?;
    info!(%owner, id = %note.id, "note created");
    Ok((StatusCode::CREATED, Json(note)))
}

// PUT /notes/{id}
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let update = body(payload)?;
    let note = state.store.update(&owner, &id, update).await?;
    info!(%owner, id = %note.id, "note updated");
    Ok(Json(note))
}

// DELETE /notes/{id}
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete(&owner, &id).await?;
    info!(%owner, %id, "note deleted");
    Ok(StatusCode::NO_CONTENT)
}

// POST /notes/suggest-tags
pub async fn suggest_tags(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> ApiResult<Json<Data<SuggestedTags>>> {
    let request = body(payload)?;
    let suggested_tags = state.suggester.suggest(&request.content).await?;
    Ok(Json(Data {
        data: SuggestedTags { suggested_tags },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_params_defaults() {
        let (query, request) = parse_params(Vec::new(), 9).unwrap();
        assert!(query.is_empty());
        assert_eq!(request, PageRequest::new(1, 9));
    }

    #[test]
    fn test_parse_params_accepts_both_tag_spellings() {
        let (query, request) = parse_params(
            pairs(&[
                ("query", " Pasta "),
                ("tags", "Food"),
                ("tags[]", "recipe"),
                ("page", "2"),
                ("limit", "3"),
            ]),
            9,
        )
        .unwrap();
        assert_eq!(query.text, "Pasta");
        assert_eq!(query.tags, vec!["food", "recipe"]);
        assert_eq!(request, PageRequest::new(2, 3));
    }

    #[test]
    fn test_parse_params_rejects_bad_numbers() {
        let err = parse_params(pairs(&[("page", "two")]), 9).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = parse_params(pairs(&[("limit", "-1")]), 9).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
