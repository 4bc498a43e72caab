//! Sentinel-based patching of a context document
//!
//! Rendered maps are placed between two marker lines so that later runs can
//! replace them without touching the hand-written rest of the document.

use std::fmt;

pub const START_MARKER: &str = "<!-- CODEBASE-MAP:AUTO-START -->";
pub const END_MARKER: &str = "<!-- CODEBASE-MAP:AUTO-END -->";

/// Heading after which a new map section is inserted
pub const DEFAULT_INSERT_AFTER: &str = "## Project Context";

/// Characters of the payload shown by a dry run
pub const PREVIEW_LIMIT: usize = 500;

/// What [`patch`] did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchAction {
    /// Both markers existed; the text between them was replaced
    Replaced,
    /// A new section was inserted at the end of the named heading's section
    Inserted,
    /// The heading was absent; the section went to the end of the document
    Appended,
}

impl fmt::Display for PatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchAction::Replaced => write!(f, "updated existing map section"),
            PatchAction::Inserted => write!(f, "inserted map section"),
            PatchAction::Appended => write!(f, "appended map section"),
        }
    }
}

/// Join non-empty map texts under the architecture heading.
/// Returns `None` when every section is blank.
pub fn combine_maps<S: AsRef<str>>(sections: &[S], timestamp: &str) -> Option<String> {
    let bodies: Vec<&str> = sections
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();
    if bodies.is_empty() {
        return None;
    }
    Some(format!(
        "## Architecture Map\n\n*Auto-generated on {}*\n\n\n{}",
        timestamp,
        bodies.join("\n\n")
    ))
}

/// Byte offsets of the start and end markers, when both exist in order
fn marker_span(document: &str) -> Option<(usize, usize)> {
    let start = document.find(START_MARKER)?;
    let end = document[start..].find(END_MARKER)? + start;
    Some((start, end))
}

/// Place `payload` between the markers of `document`
pub fn patch(document: &str, payload: &str, insert_after: &str) -> (String, PatchAction) {
    if let Some((start, end)) = marker_span(document) {
        let patched = format!(
            "{}{}\n{}\n{}",
            &document[..start],
            START_MARKER,
            payload,
            &document[end..]
        );
        return (patched, PatchAction::Replaced);
    }

    let section = format!("\n\n{}\n{}\n{}\n", START_MARKER, payload, END_MARKER);
    match document.find(insert_after) {
        Some(heading) => {
            let from = heading + insert_after.len();
            let section_end = document[from..]
                .find("\n## ")
                .map_or(document.len(), |i| from + i);
            let patched = format!(
                "{}{}{}",
                document[..section_end].trim_end(),
                section,
                &document[section_end..]
            );
            (patched, PatchAction::Inserted)
        }
        None => (format!("{}{}", document.trim_end(), section), PatchAction::Appended),
    }
}

/// Drop the marked section; `None` when there is none
pub fn remove(document: &str) -> Option<String> {
    let (start, end) = marker_span(document)?;
    let before = document[..start].trim_end();
    let after = document[end + END_MARKER.len()..].trim_start();
    Some(format!("{}\n\n{}", before, after))
}

/// Rough token count (words × 1.3)
pub fn estimate_tokens(text: &str) -> usize {
    text.split_whitespace().count() * 13 / 10
}

/// Leading part of `payload` for a dry-run preview
pub fn preview(payload: &str) -> String {
    match payload.char_indices().nth(PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}...", &payload[..cut]),
        None => payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "### Python: app/\n- `main.py`:\n  - Functions: run()";

    #[test]
    fn test_combine_maps_skips_blank_sections() {
        let combined = combine_maps(&["  ", MAP, "\n### C#: api/\n"], "2026-10-14 09:30").unwrap();
        assert!(combined.starts_with("## Architecture Map\n\n*Auto-generated on 2026-10-14 09:30*"));
        assert!(combined.ends_with(&format!("{}\n\n### C#: api/", MAP)));
        assert!(combine_maps(&["", "\n"], "now").is_none());
    }

    #[test]
    fn test_patch_inserts_after_heading() {
        let doc = "# Project\n\n## Project Context\nSome notes.\n\n## Commands\ncargo run\n";
        let (patched, action) = patch(doc, MAP, DEFAULT_INSERT_AFTER);

        assert_eq!(action, PatchAction::Inserted);
        let map_at = patched.find(START_MARKER).unwrap();
        assert!(patched.find("Some notes.").unwrap() < map_at);
        assert!(map_at < patched.find("## Commands").unwrap());
        assert!(patched.contains(&format!("{}\n{}\n{}", START_MARKER, MAP, END_MARKER)));
    }

    #[test]
    fn test_patch_appends_without_heading() {
        let (patched, action) = patch("# Notes\n\n", MAP, DEFAULT_INSERT_AFTER);
        assert_eq!(action, PatchAction::Appended);
        assert_eq!(
            patched,
            format!("# Notes\n\n{}\n{}\n{}\n", START_MARKER, MAP, END_MARKER)
        );
    }

    #[test]
    fn test_patch_replaces_between_markers() {
        let doc = format!("intro\n{}\nold map\n{}\noutro\n", START_MARKER, END_MARKER);
        let (patched, action) = patch(&doc, MAP, DEFAULT_INSERT_AFTER);

        assert_eq!(action, PatchAction::Replaced);
        assert!(!patched.contains("old map"));
        assert!(patched.starts_with("intro\n"));
        assert!(patched.ends_with(&format!("{}\n{}\noutro\n", MAP, END_MARKER)));
    }

    #[test]
    fn test_patch_is_stable_across_runs() {
        let doc = "# Project\n\n## Project Context\nNotes.\n";
        let (once, _) = patch(doc, MAP, DEFAULT_INSERT_AFTER);
        let (twice, action) = patch(&once, MAP, DEFAULT_INSERT_AFTER);
        assert_eq!(action, PatchAction::Replaced);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_marked_section() {
        let doc = format!("intro\n\n{}\n{}\n{}\n\noutro\n", START_MARKER, MAP, END_MARKER);
        assert_eq!(remove(&doc).unwrap(), "intro\n\noutro\n");
        assert!(remove("no markers here").is_none());
    }

    #[test]
    fn test_token_estimate_and_preview() {
        assert_eq!(estimate_tokens("one two three four five six seven eight nine ten"), 13);
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(PREVIEW_LIMIT + 10);
        assert_eq!(preview(&long).len(), PREVIEW_LIMIT + 3);
    }
}
