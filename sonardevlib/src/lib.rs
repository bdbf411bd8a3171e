//! # sonardevlib
//!
//! Development-time helpers for SonarQube plugin authors: stage a freshly
//! built plugin into a local server installation, and keep source trees free
//! of stray leading and trailing whitespace.
//!
//! ## Overview
//!
//! Two independent, synchronous operations:
//!
//! - **Upload** ([`Uploader`]): checks that the target directory really is a
//!   server installation (it must carry `conf/sonar.properties`), copies the
//!   plugin artifact into `extensions/downloads/`, then POSTs to
//!   `/api/system/restart` and requires `204 No Content`. The staged copy is
//!   kept even when the restart fails.
//! - **Trim** ([`trim_files`]): walks a root directory, selects files with
//!   ANT-style include/exclude globs ([`FileSelection`]), and strips leading
//!   and trailing whitespace from every line of every selected file.
//!   Whitespace inside a line is left alone.
//!
//! ## Example
//!
//! ```rust
//! use sonardevlib::{trim_files, FileSelection};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Set up a directory with a matching and a non-matching file
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("notes.txt"), "   hello   \n").unwrap();
//! fs::write(dir.path().join("keep.dat"), "   as is   \n").unwrap();
//!
//! // Trim only the .txt files
//! let selection = FileSelection::new(dir.path()).include("**/*.txt").unwrap();
//! let report = trim_files(&selection).unwrap();
//!
//! assert_eq!(report.rewritten(), 1);
//! assert_eq!(
//!     fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
//!     "hello\n"
//! );
//! assert_eq!(
//!     fs::read_to_string(dir.path().join("keep.dat")).unwrap(),
//!     "   as is   \n"
//! );
//! ```

pub mod error;
pub mod select;
pub mod trim;
pub mod upload;

pub use error::{ErrorKind, SonardevError};
pub use select::{FileSelection, Files};
pub use trim::{trim_file, trim_files, TrimOutcome, TrimReport, TrimResult};
pub use upload::{Uploader, DEFAULT_SERVER_URL};

/// Result type for sonardevlib operations
pub type Result<T> = std::result::Result<T, SonardevError>;
