//! File selection with ANT-style include/exclude patterns.
//!
//! A [`FileSelection`] pairs a root directory with two pattern lists and can
//! walk the tree lazily, yielding the regular files that survive both lists.
//! Patterns are matched against the path of each file relative to the root,
//! written with `/` separators regardless of platform.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::error::SonardevError;
use crate::Result;

/// A root directory plus include/exclude glob patterns.
///
/// A file is selected when its root-relative path matches at least one
/// include pattern (an empty include list selects everything) and matches no
/// exclude pattern. Excludes always win. Patterns use ANT-style globs: `*`
/// and `?` stay within one path component, `**` spans components, and a
/// leading `**/` also matches files directly under the root.
#[derive(Debug, Clone)]
pub struct FileSelection {
    root: PathBuf,
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl FileSelection {
    /// Create a selection of every regular file under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.includes.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.excludes.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self = self.include(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self = self.exclude(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// The root directory this selection walks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether a root-relative path is selected.
    pub fn matches(&self, relative: &Path) -> bool {
        let candidate = slash_path(relative);
        let options = match_options();

        for pattern in &self.excludes {
            if pattern.matches_with(&candidate, options) {
                return false;
            }
        }

        if self.includes.is_empty() {
            return true;
        }

        self.includes
            .iter()
            .any(|pattern| pattern.matches_with(&candidate, options))
    }

    /// Walk the root and yield every selected regular file, in traversal
    /// order.
    ///
    /// Fails up front when the root is missing, is not a directory, or
    /// cannot be listed. Entries that turn unreadable during the walk are
    /// skipped.
    pub fn files(&self) -> Result<Files<'_>> {
        if !self.root.exists() {
            return Err(SonardevError::PathNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(SonardevError::NotADirectory(self.root.clone()));
        }
        fs::read_dir(&self.root).map_err(|source| SonardevError::DirectoryRead {
            path: self.root.clone(),
            source,
        })?;

        Ok(Files {
            selection: self,
            walker: WalkDir::new(&self.root).follow_links(true).into_iter(),
        })
    }
}

/// Lazy iterator over the files picked out by a [`FileSelection`].
#[derive(Debug)]
pub struct Files<'a> {
    selection: &'a FileSelection,
    walker: walkdir::IntoIter,
}

impl Iterator for Files<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let relative = path.strip_prefix(&self.selection.root).unwrap_or(&path);
            if self.selection.matches(relative) {
                return Some(path);
            }
        }
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| SonardevError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

// `*` and `?` must stop at `/` so that only `**` spans directories.
fn match_options() -> MatchOptions {
    let mut options = MatchOptions::new();
    options.require_literal_separator = true;
    options
}

fn slash_path(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    parts.join("/")
}
