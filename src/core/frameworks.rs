//! Framework detection from import identifiers

use crate::models::grammar::GrammarProfile;
use std::collections::BTreeSet;

/// Display names of the frameworks hit by `imports`, in table order, without
/// duplicates. An import hits an entry when it equals the prefix or continues
/// it with one of `separators`.
pub fn detect(
    imports: &BTreeSet<String>,
    table: &'static [(&'static str, &'static str)],
    separators: &[char],
) -> Vec<&'static str> {
    let mut found: Vec<&'static str> = Vec::new();
    for (prefix, display) in table {
        if found.contains(display) {
            continue;
        }
        if imports.iter().any(|import| hits(import, prefix, separators)) {
            found.push(*display);
        }
    }
    found
}

/// [`detect`] with the table and separators of `profile`
pub fn detect_for(profile: &'static GrammarProfile, imports: &BTreeSet<String>) -> Vec<&'static str> {
    detect(imports, profile.frameworks, profile.prefix_separators)
}

fn hits(import: &str, prefix: &str, separators: &[char]) -> bool {
    match import.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(separators),
        None => false,
    }
}
