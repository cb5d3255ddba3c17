use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::samples::sample_notes;
use super::NoteStore;
use crate::entity::{NewNote, Note, NoteUpdate, OwnerId};
use crate::error::{NoteSyncError, Result};
use crate::search::{paginate, NoteQuery, Page, PageRequest};

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of the store: every note, canonical order.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    notes: Vec<Note>,
}

/// Note store held in memory, optionally mirrored to a JSON snapshot file
/// after every mutation.
pub struct InMemoryNoteStore {
    /// All owners' notes, newest first.
    notes: Mutex<Vec<Note>>,
    snapshot_path: Option<PathBuf>,
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::with_notes(Vec::new())
    }

    /// Start from `notes`, which must already be in canonical order.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: Mutex::new(notes),
            snapshot_path: None,
        }
    }

    /// Store preloaded with the demo notes for `owner`.
    pub fn with_samples(owner: &OwnerId) -> Self {
        Self::with_notes(sample_notes(owner))
    }

    /// Create a new snapshot file at `path`, seeded with the demo notes for
    /// `sample_owner` if given.
    pub fn init(path: &Path, sample_owner: Option<&OwnerId>) -> Result<Self> {
        if path.exists() {
            return Err(NoteSyncError::AlreadyInitialized);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let notes = sample_owner.map(sample_notes).unwrap_or_default();
        write_snapshot(path, &notes)?;
        info!(path = %path.display(), notes = notes.len(), "initialized note store");

        Ok(Self {
            notes: Mutex::new(notes),
            snapshot_path: Some(path.to_path_buf()),
        })
    }

    /// Open an existing snapshot file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NoteSyncError::NotInitialized);
        }

        let bytes = fs::read(path)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(NoteSyncError::Config(format!(
                "unsupported snapshot version {} in {}",
                snapshot.version,
                path.display()
            )));
        }
        debug!(path = %path.display(), notes = snapshot.notes.len(), "opened note store");

        Ok(Self {
            notes: Mutex::new(snapshot.notes),
            snapshot_path: Some(path.to_path_buf()),
        })
    }

    /// Open `path` if it exists, otherwise initialize it.
    pub fn open_or_init(path: &Path, sample_owner: Option<&OwnerId>) -> Result<Self> {
        if path.exists() {
            Self::open(path)
        } else {
            Self::init(path, sample_owner)
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Total notes across all owners.
    pub async fn len(&self) -> usize {
        self.notes.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Write `staged` to the snapshot, then make it the live collection. A
    /// failed write leaves the live collection untouched.
    fn commit(&self, notes: &mut Vec<Note>, staged: Vec<Note>) -> Result<()> {
        if let Some(path) = &self.snapshot_path {
            if let Err(e) = write_snapshot(path, &staged) {
                warn!(path = %path.display(), error = %e, "snapshot write failed; change discarded");
                return Err(e);
            }
        }
        *notes = staged;
        Ok(())
    }

    fn owned<'a>(notes: &'a [Note], owner: &'a OwnerId) -> impl Iterator<Item = &'a Note> + 'a {
        notes.iter().filter(move |n| &n.owner_id == owner)
    }

    fn position(notes: &[Note], owner: &OwnerId, id: &str) -> Result<usize> {
        notes
            .iter()
            .position(|n| n.id == id && &n.owner_id == owner)
            .ok_or_else(|| NoteSyncError::NoteNotFound(id.to_string()))
    }
}

fn write_snapshot(path: &Path, notes: &[Note]) -> Result<()> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        notes: notes.to_vec(),
    };
    fs::write(path, serde_json::to_vec_pretty(&snapshot)?)?;
    Ok(())
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn create(&self, owner: &OwnerId, draft: NewNote) -> Result<Note> {
        let note = Note::create(owner.clone(), draft)?;

        let mut notes = self.notes.lock().await;
        let mut staged = notes.clone();
        staged.insert(0, note.clone());
        self.commit(&mut notes, staged)?;

        info!(id = %note.id, owner = %owner, "created note");
        Ok(note)
    }

    async fn get(&self, owner: &OwnerId, id: &str) -> Result<Note> {
        let notes = self.notes.lock().await;
        let idx = Self::position(&notes, owner, id)?;
        Ok(notes[idx].clone())
    }

    async fn update(&self, owner: &OwnerId, id: &str, update: NoteUpdate) -> Result<Note> {
        let mut notes = self.notes.lock().await;
        let idx = Self::position(&notes, owner, id)?;

        let mut note = notes[idx].clone();
        note.apply(update)?;
        let mut staged = notes.clone();
        staged[idx] = note.clone();
        self.commit(&mut notes, staged)?;

        info!(id = %note.id, owner = %owner, "updated note");
        Ok(note)
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<()> {
        let mut notes = self.notes.lock().await;
        let idx = Self::position(&notes, owner, id)?;
        let mut staged = notes.clone();
        staged.remove(idx);
        self.commit(&mut notes, staged)?;

        info!(id = %id, owner = %owner, "deleted note");
        Ok(())
    }

    async fn list(&self, owner: &OwnerId, request: PageRequest) -> Result<Page<Note>> {
        request.validate()?;
        let notes = self.notes.lock().await;
        let owned: Vec<Note> = Self::owned(&notes, owner).cloned().collect();
        Ok(paginate(&owned, request))
    }

    async fn search(
        &self,
        owner: &OwnerId,
        query: &NoteQuery,
        request: PageRequest,
    ) -> Result<Page<Note>> {
        request.validate()?;
        let notes = self.notes.lock().await;
        let matching: Vec<Note> = Self::owned(&notes, owner)
            .filter(|n| query.matches(n))
            .cloned()
            .collect();
        debug!(owner = %owner, text = %query.text, tags = ?query.tags, hits = matching.len(), "searched notes");
        Ok(paginate(&matching, request))
    }
}
