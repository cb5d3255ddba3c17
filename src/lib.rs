pub mod auth;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod search;
pub mod server;
pub mod session;
pub mod storage;
pub mod suggest;
pub mod summary;

pub use auth::{Identity, SessionIdentity};
pub use config::Config;
pub use entity::{NewNote, Note, NoteUpdate, OwnerId};
pub use error::{NoteSyncError, Result};
pub use search::{NoteQuery, Page, PageRequest, Pagination};
pub use session::{FetchOutcome, NoteSession, SessionMode, SessionView};
pub use storage::{HttpNoteStore, InMemoryNoteStore, NoteStore};
pub use suggest::{KeywordTagSuggester, TagSuggester};
