// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_tags, OwnerId};
use crate::error::{NoteSyncError, Result};
use crate::summary::summarize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Derived from `content`, never set directly.
    pub summary: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "userId")]
    pub owner_id: OwnerId,
}

/// Payload for creating a note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update payload. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NoteSyncError::validation(format!("{} is required", field)));
    }
    Ok(())
}

impl Note {
    /// Build a fresh note with a new id, timestamps and summary.
    pub fn create(owner_id: OwnerId, draft: NewNote) -> Result<Self> {
        require_text("title", &draft.title)?;
        require_text("content", &draft.content)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            summary: summarize(&draft.content),
            title: draft.title,
            content: draft.content,
            tags: normalize_tags(&draft.tags),
            created_at: now,
            updated_at: now,
            owner_id,
        })
    }

    /// Apply a partial update. Validates every supplied field before touching
    /// the note, so a rejected update leaves it unchanged.
    pub fn apply(&mut self, update: NoteUpdate) -> Result<()> {
        if let Some(ref title) = update.title {
            require_text("title", title)?;
        }
        if let Some(ref content) = update.content {
            require_text("content", content)?;
        }

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            if content != self.content {
                self.summary = summarize(&content);
                self.content = content;
            }
        }
        if let Some(tags) = update.tags {
            self.tags = normalize_tags(&tags);
        }

        self.updated_at = Utc::now().max(self.created_at);
        Ok(())
    }

    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        wanted.iter().any(|tag| self.tags.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::new("1")
    }

    #[test]
    fn test_create_assigns_id_summary_and_timestamps() {
        let note = Note::create(owner(), NewNote::new("Groceries", "Milk, eggs")).unwrap();
        assert!(!note.id.is_empty());
        assert_eq!(note.summary, "Milk, eggs");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_create_rejects_blank_title_or_content() {
        let err = Note::create(owner(), NewNote::new("  ", "body")).unwrap_err();
        assert!(matches!(err, NoteSyncError::Validation(ref m) if m.contains("title")));

        let err = Note::create(owner(), NewNote::new("Title", "")).unwrap_err();
        assert!(matches!(err, NoteSyncError::Validation(ref m) if m.contains("content")));
    }

    #[test]
    fn test_create_normalizes_tags() {
        let draft = NewNote::new("t", "c").with_tags(["Work", "work", " Ideas "]);
        let note = Note::create(owner(), draft).unwrap();
        assert_eq!(note.tags, vec!["work", "ideas"]);
    }

    #[test]
    fn test_apply_recomputes_summary_when_content_changes() {
        let mut note = Note::create(owner(), NewNote::new("t", "short")).unwrap();
        let long = "x".repeat(150);
        note.apply(NoteUpdate {
            content: Some(long.clone()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(note.content, long);
        assert_eq!(note.summary, summarize(&long));
        assert!(note.updated_at >= note.created_at);
    }

    #[test]
    fn test_apply_title_only_keeps_summary() {
        let mut note = Note::create(owner(), NewNote::new("old", "body text")).unwrap();
        let before = note.updated_at;
        note.apply(NoteUpdate {
            title: Some("new".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(note.title, "new");
        assert_eq!(note.summary, "body text");
        assert!(note.updated_at >= before);
    }

    #[test]
    fn test_rejected_update_leaves_note_untouched() {
        let mut note = Note::create(owner(), NewNote::new("keep", "body")).unwrap();
        let snapshot = note.clone();
        let result = note.apply(NoteUpdate {
            title: Some("changed".to_string()),
            content: Some("   ".to_string()),
            tags: None,
        });
        assert!(result.is_err());
        assert_eq!(note, snapshot);
    }

    #[test]
    fn test_serializes_camel_case_fields() {
        let note = Note::create(owner(), NewNote::new("t", "c")).unwrap();
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["userId"], "1");
    }

    #[test]
    fn test_update_payload_omits_absent_fields() {
        let update = NoteUpdate {
            title: Some("x".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"title":"x"}"#);
        assert!(NoteUpdate::default().is_empty());
    }
}
