//! Error types for the storyteller engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for storyteller operations.
pub type StorytellerResult<T> = Result<T, StorytellerError>;

/// Errors raised while loading dialogs or running a conversation.
#[derive(Debug, Error)]
pub enum StorytellerError {
    /// A file or directory could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML document could not be parsed.
    #[error("failed to parse {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A JSON document could not be parsed.
    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A dialog definition was structurally invalid.
    #[error("invalid dialog definition: {0}")]
    InvalidDialog(String),

    /// No dialog carries the requested identifier.
    #[error("dialog not found: {0}")]
    DialogNotFound(String),

    /// The hot-reload watcher could not be started.
    #[error("file watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// A delegated world service failed while running an action.
    #[error("action failed: {0}")]
    Service(#[from] ServiceError),
}

/// Failure reported by a game-world collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service refused the request (e.g. not enough items to remove).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The service could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The raw action argument did not make sense to the service.
    #[error("invalid argument '{0}'")]
    InvalidArgument(String),
}
