//! Line-by-line whitespace trimming over a file selection.
//!
//! Each selected file is read as UTF-8, every line loses its leading and
//! trailing whitespace, and the file is rewritten only when that actually
//! changed something. Whitespace inside a line is never touched, so
//! alignment within the text survives while stray indentation does not.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::SonardevError;
use crate::select::FileSelection;
use crate::Result;

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimOutcome {
    /// Content was already trimmed, the file was not rewritten
    Unchanged,
    /// The file was rewritten with trimmed lines
    Rewritten,
    /// The file could not be read or written back
    Failed { message: String },
}

/// A selected file together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrimResult {
    /// Path as yielded by the traversal
    pub path: PathBuf,
    pub outcome: TrimOutcome,
}

/// Ordered results of one trim run, one entry per selected file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrimReport {
    pub results: Vec<TrimResult>,
}

impl TrimReport {
    /// Number of files rewritten.
    pub fn rewritten(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == TrimOutcome::Rewritten)
            .count()
    }

    /// Number of files that were already trimmed.
    pub fn unchanged(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == TrimOutcome::Unchanged)
            .count()
    }

    /// Results for files that could not be processed.
    pub fn failures(&self) -> impl Iterator<Item = &TrimResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, TrimOutcome::Failed { .. }))
    }

    /// Number of files that could not be processed.
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Total number of selected files.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// True when at least one file failed.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Strip leading and trailing whitespace from every line of `text`.
///
/// Lines are recognized by `\n` or `\r\n`; every output line is terminated
/// with a single `\n`.
fn trim_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(line.trim());
        out.push('\n');
    }
    out
}

/// Trim a single file in place.
///
/// Returns [`TrimOutcome::Unchanged`] without writing when the content is
/// already in trimmed form. The rewrite is not atomic; callers that need
/// durability should copy the file first.
pub fn trim_file(path: &Path) -> Result<TrimOutcome> {
    let content = fs::read_to_string(path).map_err(|source| SonardevError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let trimmed = trim_text(&content);
    if trimmed == content {
        return Ok(TrimOutcome::Unchanged);
    }

    fs::write(path, trimmed).map_err(|source| SonardevError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(TrimOutcome::Rewritten)
}

/// Trim every file picked out by `selection`.
///
/// A file that cannot be read or written is recorded as
/// [`TrimOutcome::Failed`] and the run continues with the remaining files.
/// Only a bad root directory or pattern aborts the run itself.
pub fn trim_files(selection: &FileSelection) -> Result<TrimReport> {
    let mut report = TrimReport::default();

    for path in selection.files()? {
        let outcome = match trim_file(&path) {
            Ok(outcome) => outcome,
            Err(e) => TrimOutcome::Failed {
                message: e.to_string(),
            },
        };
        debug!("{}: {:?}", path.display(), outcome);
        report.results.push(TrimResult { path, outcome });
    }

    Ok(report)
}
