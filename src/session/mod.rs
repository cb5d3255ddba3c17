//! Client-side note session: browse/search mode, paging and the view model
//! shown to the presentation layer.
//!
//! # Ordering
//! Every fetch takes a ticket from a counter before awaiting the store. When
//! the response arrives, it is applied only if its ticket is still the newest
//! one issued; otherwise it is dropped and the caller gets
//! [`FetchOutcome::Superseded`]. The state lock is never held across a store
//! call, so a slow page fetch cannot block a newer one.
//!
//! Updates and deletes that finish while a fetch is in flight are recorded
//! against the current ticket and replayed onto that fetch's page when it
//! lands, so an older read never resurrects a deleted note or an old version.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::Identity;
use crate::entity::{NewNote, Note, NoteUpdate};
use crate::error::Result;
use crate::search::{total_pages, NoteQuery, PageRequest, Pagination};
use crate::storage::NoteStore;
use crate::suggest::{exclude_existing, TagSuggester};

/// Which collection the session is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionMode {
    /// Unfiltered collection.
    #[default]
    Browsing,
    /// Collection filtered by text and/or tags. Never holds an empty query.
    Searching(NoteQuery),
}

/// Everything presentation needs to render the note list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionView {
    pub mode: SessionMode,
    pub notes: Vec<Note>,
    pub pagination: Pagination,
}

impl SessionView {
    fn empty(limit: usize) -> Self {
        Self {
            pagination: Pagination {
                limit,
                ..Pagination::default()
            },
            ..Self::default()
        }
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.mode, SessionMode::Searching(_))
    }

    pub fn search_query(&self) -> &str {
        match &self.mode {
            SessionMode::Browsing => "",
            SessionMode::Searching(query) => &query.text,
        }
    }

    pub fn search_tags(&self) -> &[String] {
        match &self.mode {
            SessionMode::Browsing => &[],
            SessionMode::Searching(query) => &query.tags,
        }
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page
    }
}

/// What happened to a fetch that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the view.
    Applied,
    /// A newer request was issued while this one was in flight; the
    /// response was dropped.
    Superseded,
    /// Nothing was requested (page 0).
    Ignored,
}

#[derive(Debug, Clone)]
enum LocalEdit {
    Updated(Note),
    Deleted(String),
}

struct SessionState {
    view: SessionView,
    /// Ticket of the most recently issued fetch.
    issued: u64,
    /// Mutations confirmed by the store since the last applied fetch, each
    /// stamped with `issued` at the time it completed.
    edits: Vec<(u64, LocalEdit)>,
}

impl SessionState {
    /// Record a confirmed mutation and patch the visible page with it.
    fn record(&mut self, edit: LocalEdit) {
        patch_view(&mut self.view, &edit);
        let stamp = self.issued;
        self.edits.push((stamp, edit));
    }
}

fn patch_view(view: &mut SessionView, edit: &LocalEdit) {
    match edit {
        LocalEdit::Updated(note) => {
            if let Some(slot) = view.notes.iter_mut().find(|n| n.id == note.id) {
                *slot = note.clone();
            }
        }
        LocalEdit::Deleted(id) => {
            let before = view.notes.len();
            view.notes.retain(|n| &n.id != id);
            if view.notes.len() < before {
                let pagination = &mut view.pagination;
                pagination.total_notes = pagination.total_notes.saturating_sub(1);
                pagination.total_pages = total_pages(pagination.total_notes, pagination.limit);
            }
        }
    }
}

pub struct NoteSession {
    store: Arc<dyn NoteStore>,
    suggester: Arc<dyn TagSuggester>,
    identity: Arc<dyn Identity>,
    limit: usize,
    state: Mutex<SessionState>,
}

impl NoteSession {
    /// Create a session in Browsing mode without fetching anything yet.
    pub fn new(
        store: Arc<dyn NoteStore>,
        suggester: Arc<dyn TagSuggester>,
        identity: Arc<dyn Identity>,
        limit: usize,
    ) -> Self {
        let limit = limit.max(1);
        Self {
            store,
            suggester,
            identity,
            limit,
            state: Mutex::new(SessionState {
                view: SessionView::empty(limit),
                issued: 0,
                edits: Vec::new(),
            }),
        }
    }

    /// Create a session and load the first page of the unfiltered collection.
    pub async fn open(
        store: Arc<dyn NoteStore>,
        suggester: Arc<dyn TagSuggester>,
        identity: Arc<dyn Identity>,
        limit: usize,
    ) -> Result<Self> {
        let session = Self::new(store, suggester, identity, limit);
        session.fetch(SessionMode::Browsing, 1).await?;
        Ok(session)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Snapshot of the current view model.
    pub async fn view(&self) -> SessionView {
        self.state.lock().await.view.clone()
    }

    /// Enter Searching mode at page 1. A blank query with no tags clears the
    /// search instead.
    pub async fn submit_search<S: AsRef<str>>(&self, query: &str, tags: &[S]) -> Result<FetchOutcome> {
        self.submit_search_at(query, tags, 1).await
    }

    /// Like [`submit_search`](Self::submit_search) but lands directly on
    /// `page`, in one request. Page 0 is ignored.
    pub async fn submit_search_at<S: AsRef<str>>(
        &self,
        query: &str,
        tags: &[S],
        page: usize,
    ) -> Result<FetchOutcome> {
        if page == 0 {
            return Ok(FetchOutcome::Ignored);
        }
        let query = NoteQuery::new(query, tags);
        let mode = if query.is_empty() {
            SessionMode::Browsing
        } else {
            SessionMode::Searching(query)
        };
        self.fetch(mode, page).await
    }

    /// Return to Browsing mode at page 1.
    pub async fn clear_search(&self) -> Result<FetchOutcome> {
        self.fetch(SessionMode::Browsing, 1).await
    }

    /// Move to page `page` within the current mode. Page 0 is ignored; pages
    /// past the end are passed through and come back empty.
    pub async fn change_page(&self, page: usize) -> Result<FetchOutcome> {
        if page == 0 {
            return Ok(FetchOutcome::Ignored);
        }
        let mode = self.state.lock().await.view.mode.clone();
        self.fetch(mode, page).await
    }

    /// Re-fetch the current page in the current mode.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let (mode, page) = {
            let state = self.state.lock().await;
            (state.view.mode.clone(), state.view.pagination.current_page)
        };
        self.fetch(mode, page).await
    }

    async fn fetch(&self, mode: SessionMode, page: usize) -> Result<FetchOutcome> {
        let owner = self.identity.require_user()?;
        let ticket = {
            let mut state = self.state.lock().await;
            state.issued += 1;
            state.issued
        };
        let request = PageRequest::new(page, self.limit);
        debug!(ticket, page, mode = ?mode, "fetching notes");

        let result = match &mode {
            SessionMode::Browsing => self.store.list(&owner, request).await,
            SessionMode::Searching(query) => self.store.search(&owner, query, request).await,
        };

        let mut state = self.state.lock().await;
        if state.issued != ticket {
            warn!(ticket, latest = state.issued, "discarding superseded note fetch");
            return result.map(|_| FetchOutcome::Superseded);
        }

        let page = result?;
        let mut view = SessionView {
            mode,
            notes: page.items,
            pagination: page.pagination,
        };
        for (stamp, edit) in std::mem::take(&mut state.edits) {
            if stamp >= ticket {
                debug!(ticket, ?edit, "replaying local edit onto late page");
                patch_view(&mut view, &edit);
            }
        }
        state.view = view;
        Ok(FetchOutcome::Applied)
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        let owner = self.identity.require_user()?;
        self.store.get(&owner, id).await
    }

    pub async fn create_note(&self, draft: NewNote) -> Result<Note> {
        let owner = self.identity.require_user()?;
        self.store.create(&owner, draft).await
    }

    /// Update a note; if it is on the current page the view shows the new
    /// version.
    pub async fn update_note(&self, id: &str, update: NoteUpdate) -> Result<Note> {
        let owner = self.identity.require_user()?;
        let note = self.store.update(&owner, id, update).await?;
        self.state.lock().await.record(LocalEdit::Updated(note.clone()));
        Ok(note)
    }

    /// Delete a note and drop it from the current page. The page number is
    /// left alone even if the page becomes empty.
    pub async fn delete_note(&self, id: &str) -> Result<()> {
        let owner = self.identity.require_user()?;
        self.store.delete(&owner, id).await?;
        self.state
            .lock()
            .await
            .record(LocalEdit::Deleted(id.to_string()));
        Ok(())
    }

    /// Suggest tags for `content`, leaving out ones in `current_tags`.
    pub async fn suggest_tags(&self, content: &str, current_tags: &[String]) -> Result<Vec<String>> {
        let suggested = self.suggester.suggest(content).await?;
        Ok(exclude_existing(suggested, current_tags))
    }
}
