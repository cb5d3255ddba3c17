mod http_store;
mod memory_store;
pub mod samples;

pub use http_store::{HttpNoteStore, USER_HEADER};
pub use memory_store::InMemoryNoteStore;

use async_trait::async_trait;

use crate::entity::{NewNote, Note, NoteUpdate, OwnerId};
use crate::error::Result;
use crate::search::{NoteQuery, Page, PageRequest};

/// Canonical note collection, scoped per owner.
///
/// Canonical order is most-recent-first by creation. `list` and `search`
/// both page through that order with the same resolver, so an empty query
/// searches exactly like a listing.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create(&self, owner: &OwnerId, draft: NewNote) -> Result<Note>;

    async fn get(&self, owner: &OwnerId, id: &str) -> Result<Note>;

    async fn update(&self, owner: &OwnerId, id: &str, update: NoteUpdate) -> Result<Note>;

    /// Remove a note permanently. Deleting an unknown id is `NoteNotFound`,
    /// including a second delete of the same id.
    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<()>;

    async fn list(&self, owner: &OwnerId, request: PageRequest) -> Result<Page<Note>>;

    async fn search(
        &self,
        owner: &OwnerId,
        query: &NoteQuery,
        request: PageRequest,
    ) -> Result<Page<Note>>;
}
