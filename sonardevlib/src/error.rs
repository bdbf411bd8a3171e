//! Error types for sonardevlib

use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of failures.
///
/// Configuration errors are raised before any side effect. I/O errors abort
/// the operation that hit them. Remote errors come from the restart request,
/// which runs after the artifact copy; the copy is never rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid input: paths, patterns, URLs
    Configuration,
    /// A filesystem read, write, copy or listing failed
    Io,
    /// The server rejected or never answered the restart request
    Remote,
}

/// Errors that can occur while selecting, trimming or uploading files
#[derive(Error, Debug)]
pub enum SonardevError {
    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Expected a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Server home directory does not exist
    #[error("server home directory does not exist: {0}")]
    ServerHomeNotFound(PathBuf),

    /// Directory exists but is not a server installation
    #[error("not a server home directory (missing conf/sonar.properties): {0}")]
    NotAServerHome(PathBuf),

    /// Plugin artifact does not exist
    #[error("plugin artifact does not exist: {0}")]
    ArtifactNotFound(PathBuf),

    /// Server URL could not be parsed
    #[error("invalid server URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// Failed to list a directory
    #[error("failed to read directory '{path}': {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to copy the artifact into the server installation
    #[error("failed to copy '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// Restart request could not be sent
    #[error("restart request to {url} failed: {source}")]
    RestartRequest { url: String, source: reqwest::Error },

    /// Server answered a restart request with something other than 204
    #[error("server at {url} refused to restart: HTTP {status}")]
    RestartRejected {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl SonardevError {
    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SonardevError::PathNotFound(_)
            | SonardevError::NotADirectory(_)
            | SonardevError::InvalidGlob { .. }
            | SonardevError::ServerHomeNotFound(_)
            | SonardevError::NotAServerHome(_)
            | SonardevError::ArtifactNotFound(_)
            | SonardevError::InvalidUrl { .. } => ErrorKind::Configuration,
            SonardevError::DirectoryRead { .. }
            | SonardevError::FileRead { .. }
            | SonardevError::FileWrite { .. }
            | SonardevError::Copy { .. } => ErrorKind::Io,
            SonardevError::RestartRequest { .. } | SonardevError::RestartRejected { .. } => {
                ErrorKind::Remote
            }
        }
    }
}
