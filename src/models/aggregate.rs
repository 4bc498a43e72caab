//! Aggregated results of one tree walk

use super::grammar::{Grammar, Grouping};
use super::structure::FileModel;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Group key used for files without a namespace declaration
pub const NO_NAMESPACE: &str = "(no namespace)";

/// A file the walker could not turn into a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// File/type/member totals for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub files: usize,
    pub types: usize,
    pub members: usize,
}

/// Complete in-memory result of walking a source tree, grouped for rendering
#[derive(Debug, Clone, Serialize)]
pub struct AggregateModel {
    pub grammar: Grammar,
    /// Grouping key (namespace or directory) to the files in that group
    pub groups: BTreeMap<String, Vec<FileModel>>,
    /// Union of the import identifiers of every file
    pub imports: BTreeSet<String>,
    pub skipped: Vec<SkippedFile>,
}

impl AggregateModel {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            groups: BTreeMap::new(),
            imports: BTreeSet::new(),
            skipped: Vec::new(),
        }
    }

    /// Append a file model under its group key
    pub fn add_file(&mut self, file: FileModel) {
        self.imports.extend(file.imports.iter().cloned());
        let key = self.group_key(&file);
        self.groups.entry(key).or_default().push(file);
    }

    pub fn add_skipped(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }

    fn group_key(&self, file: &FileModel) -> String {
        match self.grammar.profile().grouping {
            Grouping::Namespace => file
                .namespace
                .clone()
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| NO_NAMESPACE.to_string()),
            Grouping::Directory => file.directory().to_string(),
        }
    }

    /// All file models, in group order then insertion order
    pub fn files(&self) -> impl Iterator<Item = &FileModel> {
        self.groups.values().flatten()
    }

    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn type_count(&self) -> usize {
        self.files().map(|f| f.types.len()).sum()
    }

    pub fn member_count(&self) -> usize {
        self.files().map(FileModel::member_count).sum()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            files: self.file_count(),
            types: self.type_count(),
            members: self.member_count(),
        }
    }
}
