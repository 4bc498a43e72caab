use codemap::{
    cli::commands::{update_document, UpdateOutcome},
    cli::UpdateArgs,
    output::patcher::{PatchAction, DEFAULT_INSERT_AFTER, END_MARKER, START_MARKER},
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DOC: &str = "# Shop\n\n## Project Context\n\nA small shop.\n\n## Commands\n\n- make test\n";

fn args_for(doc: &Path, maps: &[&Path]) -> UpdateArgs {
    UpdateArgs {
        doc: doc.to_path_buf(),
        maps: maps.iter().map(|m| m.display().to_string()).collect(),
        insert_after: DEFAULT_INSERT_AFTER.to_string(),
        remove: false,
        dry_run: false,
        no_colors: true,
    }
}

#[test]
fn test_update_combines_maps_in_order() {
    let temp_dir = tempdir().unwrap();
    let doc = temp_dir.path().join("CLAUDE.md");
    let api = temp_dir.path().join("api-map.md");
    let web = temp_dir.path().join("web-map.md");
    fs::write(&doc, DOC).unwrap();
    fs::write(&api, "### C#: api/\n\n<!-- C#: 1 files, 1 types, 0 members -->\n").unwrap();
    fs::write(&web, "### TypeScript: web/\n").unwrap();

    let outcome = update_document(&args_for(&doc, &[&api, &web]), "2026-03-01 09:30").unwrap();
    let UpdateOutcome::Patched { action, tokens, .. } = outcome else {
        panic!("expected a patched document");
    };
    assert_eq!(action, PatchAction::Inserted);
    assert!(tokens > 0);

    let text = fs::read_to_string(&doc).unwrap();
    let start = text.find(START_MARKER).unwrap();
    let end = text.find(END_MARKER).unwrap();
    let section = &text[start..end];
    assert!(section.contains("## Architecture Map"));
    assert!(section.find("### C#: api/").unwrap() < section.find("### TypeScript: web/").unwrap());

    // Hand-written content on both sides survives
    assert!(text.starts_with("# Shop\n\n## Project Context\n\nA small shop."));
    assert!(text.find("## Commands").unwrap() > end);
}

#[test]
fn test_update_twice_keeps_one_section() {
    let temp_dir = tempdir().unwrap();
    let doc = temp_dir.path().join("CLAUDE.md");
    let map = temp_dir.path().join("map.md");
    fs::write(&doc, DOC).unwrap();
    fs::write(&map, "### Python: svc/\n").unwrap();

    let args = args_for(&doc, &[&map]);
    update_document(&args, "first").unwrap();
    let after_first = fs::read_to_string(&doc).unwrap();
    update_document(&args, "first").unwrap();
    let after_second = fs::read_to_string(&doc).unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.matches(START_MARKER).count(), 1);
    assert_eq!(after_second.matches(END_MARKER).count(), 1);
}

#[test]
fn test_update_appends_without_heading() {
    let temp_dir = tempdir().unwrap();
    let doc = temp_dir.path().join("NOTES.md");
    let map = temp_dir.path().join("map.md");
    fs::write(&doc, "# Notes\n\nNothing here.\n").unwrap();
    fs::write(&map, "### Python: svc/\n").unwrap();

    let outcome = update_document(&args_for(&doc, &[&map]), "now").unwrap();
    assert!(matches!(
        outcome,
        UpdateOutcome::Patched { action: PatchAction::Appended, .. }
    ));
    assert!(fs::read_to_string(&doc).unwrap().trim_end().ends_with(END_MARKER));
}

#[test]
fn test_update_skips_missing_maps() {
    let temp_dir = tempdir().unwrap();
    let doc = temp_dir.path().join("CLAUDE.md");
    let map = temp_dir.path().join("map.md");
    let missing = temp_dir.path().join("missing.md");
    fs::write(&doc, DOC).unwrap();
    fs::write(&map, "### Python: svc/\n").unwrap();

    let outcome = update_document(&args_for(&doc, &[&missing, &map]), "now").unwrap();
    let UpdateOutcome::Patched { payload, .. } = outcome else {
        panic!("expected a patched document");
    };
    assert!(payload.contains("### Python: svc/"));
}
