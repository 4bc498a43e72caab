//! Directory walking functionality
//!
//! Walks the scan root in file-name order, prunes excluded directories,
//! and feeds every accepted source file through the [`Extractor`]. Nothing
//! below the root precondition aborts the walk: unreadable files and
//! traversal failures end up in [`AggregateModel::skipped`].

use crate::core::extractor::{Extraction, Extractor};
use crate::error::{CodemapError, Result, ResultExt};
use crate::models::aggregate::AggregateModel;
use crate::models::config::{DepthPolicy, Settings};
use crate::models::grammar::{Grammar, GrammarProfile};
use glob::Pattern;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Path-segment exclusion rules
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    names: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    /// Build from plain segment names and glob patterns (`*`, `?` or `[`)
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut set = Self::default();
        for entry in entries {
            let entry = entry.as_ref();
            if entry.contains(['*', '?', '[']) {
                set.patterns.push(Pattern::new(entry)?);
            } else {
                set.names.insert(entry.to_string());
            }
        }
        Ok(set)
    }

    /// Whether one path segment excludes everything at and below it
    pub fn excludes_segment(&self, segment: &str) -> bool {
        segment.starts_with('.')
            || self.names.contains(segment)
            || self.patterns.iter().any(|p| p.matches(segment))
    }

    /// Whether any segment of a root-relative path is excluded
    pub fn excludes_path(&self, relative: &Path) -> bool {
        relative
            .components()
            .any(|c| self.excludes_segment(&c.as_os_str().to_string_lossy()))
    }
}

/// Main walker for directory traversal and extraction
pub struct Walker {
    settings: Settings,
    extractor: Extractor,
    excludes: ExcludeSet,
}

impl Walker {
    /// Create a walker; fails only when an exclude pattern does not compile
    pub fn new(settings: Settings) -> Result<Self> {
        let excludes = ExcludeSet::new(&settings.effective_excludes())?;
        let extractor = Extractor::new(settings.grammar, settings.depth);
        Ok(Self {
            settings,
            extractor,
            excludes,
        })
    }

    /// Get the current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn profile(&self) -> &'static GrammarProfile {
        self.settings.grammar.profile()
    }

    /// Walk the configured root
    pub fn walk(&self) -> Result<AggregateModel> {
        self.walk_with_progress(|_, _| {})
    }

    /// Walk the configured root, calling `progress` with the running file
    /// count and the relative path before each file is read
    pub fn walk_with_progress<F>(&self, mut progress: F) -> Result<AggregateModel>
    where
        F: FnMut(usize, &str),
    {
        let root = self.settings.root.as_path();
        if !root.exists() {
            return Err(CodemapError::invalid_path(root));
        }

        let profile = self.profile();
        let mut model = AggregateModel::new(profile.grammar);
        let mut seen = 0usize;

        let entries = WalkDir::new(root)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.keep_entry(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| relative_path(root, p))
                        .unwrap_or_default();
                    let warning = CodemapError::directory_traversal_error(&path, err.to_string());
                    tracing::warn!("{}", warning.user_message());
                    model.add_skipped(path, warning.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if !profile.accepts_file(&entry.file_name().to_string_lossy()) {
                tracing::trace!(path = %entry.path().display(), "not a source file");
                continue;
            }

            let relative = relative_path(root, entry.path());
            seen += 1;
            progress(seen, &relative);

            let bytes = match fs::read(entry.path()).with_file_context(&relative) {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!("{}", err.user_message());
                    model.add_skipped(relative, err.user_message());
                    continue;
                }
            };

            match self.extractor.extract(&relative, &bytes) {
                Extraction::Model(file) => model.add_file(file),
                Extraction::Skipped(reason) => {
                    let warning = CodemapError::file_skipped(&relative, &reason);
                    tracing::warn!("{}", warning);
                    model.add_skipped(relative, reason.to_string());
                }
            }
        }

        tracing::debug!(
            files = model.file_count(),
            skipped = model.skipped.len(),
            "walk complete"
        );
        Ok(model)
    }

    /// Entries below the root whose own segment is excluded are pruned
    fn keep_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if self.excludes.excludes_segment(&name) {
            tracing::debug!(path = %entry.path().display(), "excluded");
            return false;
        }
        true
    }
}

/// Walk `root` for `grammar` with the default settings otherwise
pub fn walk(root: &Path, grammar: Grammar, excludes: &[String], depth: DepthPolicy) -> Result<AggregateModel> {
    let settings = Settings {
        root: root.to_path_buf(),
        grammar,
        depth,
        exclude: excludes.to_vec(),
        ..Settings::default()
    };
    Walker::new(settings)?.walk()
}

/// `/`-separated path of `path` relative to `root`
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
