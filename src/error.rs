use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteSyncError {
    #[error("No note store found. Run 'notesync init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove the data file to reinitialize.")]
    AlreadyInitialized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Note store unavailable: {0}")]
    Transient(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl NoteSyncError {
    pub fn validation(message: impl Into<String>) -> Self {
        NoteSyncError::Validation(message.into())
    }

    /// True for failures a later retry might not see again (network, timeouts).
    pub fn is_transient(&self) -> bool {
        matches!(self, NoteSyncError::Transient(_))
    }
}

impl From<reqwest::Error> for NoteSyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NoteSyncError::Transient(format!("request timed out: {}", err))
        } else {
            NoteSyncError::Transient(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, NoteSyncError>;
