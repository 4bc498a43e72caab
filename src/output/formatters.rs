//! Output formatting functionality
//!
//! The text map is deterministic in the aggregate alone: groups and files are
//! sorted, and nothing time-dependent is rendered.

use crate::error::{CodemapError, Result};
use crate::models::aggregate::{AggregateModel, SkippedFile, Stats};
use crate::models::grammar::{Grammar, GrammarProfile};
use crate::models::structure::{FileModel, MemberKind, TypeInfo, TypeKind};
use ansi_term::Colour::{Green, Yellow};
use ansi_term::Style;
use serde::Serialize;

/// C# attributes worth showing in the map
const SHOWN_ATTRIBUTES: &[&str] = &["ApiController", "Authorize", "Route", "Injectable", "Component"];

/// Decorators shown per TypeScript type
const SHOWN_DECORATORS: usize = 2;

/// Render the text map of `model`
pub fn render(model: &AggregateModel, root_label: &str, frameworks: &[&str]) -> String {
    let profile = model.grammar.profile();
    let mut lines = vec![format!("### {}: {}/", profile.label, root_label)];

    if !frameworks.is_empty() {
        lines.push(format!("**Frameworks detected:** {}", frameworks.join(", ")));
        lines.push(String::new());
    }

    for (key, files) in &model.groups {
        let mut files: Vec<&FileModel> = files.iter().collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let group = match model.grammar {
            Grammar::CSharp => csharp_group(profile, &files),
            Grammar::Python => python_group(profile, &files, !key.is_empty()),
            Grammar::TypeScript => typescript_group(profile, &files, !key.is_empty()),
        };
        if group.is_empty() {
            continue;
        }
        match model.grammar {
            Grammar::CSharp => lines.push(format!("- `{}`", key)),
            _ if !key.is_empty() => lines.push(format!("- `{}/`", key)),
            _ => {}
        }
        lines.extend(group);
    }

    let mut output = lines.join("\n");
    output.push_str("\n\n");
    output.push_str(&stats_line(profile, model.stats()));
    output.push('\n');
    output
}

/// Trailing statistics comment
pub fn stats_line(profile: &GrammarProfile, stats: Stats) -> String {
    format!(
        "<!-- {}: {} files, {} types, {} members -->",
        profile.label, stats.files, stats.types, stats.members
    )
}

fn csharp_group(profile: &GrammarProfile, files: &[&FileModel]) -> Vec<String> {
    let mut lines = Vec::new();
    for file in files {
        for info in &file.types {
            lines.push(format!("  - `{}`: {}", file.file_name(), csharp_type(profile, info)));
        }
    }
    lines
}

fn csharp_type(profile: &GrammarProfile, info: &TypeInfo) -> String {
    let mut head = info.name.clone();
    if !info.bases.is_empty() {
        head.push_str(" : ");
        head.push_str(&limited(&info.bases, profile.base_limit, |n| format!(" (+{})", n)));
    }
    let mut parts = vec![format!("`{}`", head)];

    if info.kind != TypeKind::Class {
        parts.push(format!("[{}]", info.kind));
    }

    let attributes: Vec<String> = info
        .decorators
        .iter()
        .filter(|d| SHOWN_ATTRIBUTES.contains(&d.as_str()))
        .cloned()
        .collect();
    if !attributes.is_empty() {
        parts.push(format!("[{}]", attributes.join(", ")));
    }

    let methods: Vec<String> = info.callables().map(|m| m.name.clone()).collect();
    if !methods.is_empty() {
        parts.push(format!("→ {}", member_list(&methods, profile.member_limit)));
    }
    parts.join(" ")
}

fn python_group(profile: &GrammarProfile, files: &[&FileModel], nested: bool) -> Vec<String> {
    let indent = if nested { "  " } else { "" };
    let mut lines = Vec::new();

    for file in files {
        let classes: Vec<&TypeInfo> = file.types.iter().filter(|t| t.kind != TypeKind::Function).collect();
        let functions: Vec<String> = file
            .types
            .iter()
            .filter(|t| t.kind == TypeKind::Function)
            .map(|t| callable_name(&t.name, t.is_async))
            .collect();
        if classes.is_empty() && functions.is_empty() {
            continue;
        }

        lines.push(format!("{}- `{}`:", indent, file.file_name()));
        for class in classes {
            lines.push(format!("{}  - {}", indent, python_class(profile, class)));
        }
        if !functions.is_empty() {
            lines.push(format!(
                "{}  - Functions: {}",
                indent,
                member_list(&functions, profile.member_limit)
            ));
        }
    }
    lines
}

fn python_class(profile: &GrammarProfile, info: &TypeInfo) -> String {
    let mut head = info.name.clone();
    if !info.bases.is_empty() {
        head.push('(');
        head.push_str(&limited(&info.bases, profile.base_limit, |n| format!(" (+{})", n)));
        head.push(')');
    }
    let mut parts = vec![format!("`{}`", head)];

    if info.has_decorator("dataclass") {
        parts.push("[dataclass]".to_string());
    }

    // Properties read like methods in Python; fields stay out of the listing
    let members: Vec<String> = info
        .members
        .iter()
        .filter(|m| m.kind != MemberKind::Field)
        .map(|m| if m.is_async { format!("async {}", m.name) } else { m.name.clone() })
        .collect();
    if !members.is_empty() {
        parts.push(format!("→ {}", member_list(&members, profile.member_limit)));
    }
    parts.join(" ")
}

fn typescript_group(profile: &GrammarProfile, files: &[&FileModel], nested: bool) -> Vec<String> {
    let indent = if nested { "  " } else { "" };
    let mut lines = Vec::new();

    for file in files {
        let exported: Vec<&TypeInfo> = file.types.iter().filter(|t| t.is_exported).collect();
        if exported.is_empty() {
            continue;
        }
        lines.push(format!("{}- `{}`:", indent, file.file_name()));
        for info in exported {
            lines.push(format!("{}  - {}", indent, typescript_type(profile, info)));
        }
    }
    lines
}

fn typescript_type(profile: &GrammarProfile, info: &TypeInfo) -> String {
    let mut parts = vec![format!("`{}`", info.name)];

    if !matches!(info.kind, TypeKind::Class | TypeKind::Function) {
        parts.push(format!("({})", info.kind));
    }
    if !info.bases.is_empty() {
        parts.push(format!(
            ": {}",
            limited(&info.bases, profile.base_limit, |n| format!(" (+{})", n))
        ));
    }
    if !info.decorators.is_empty() {
        let shown: Vec<&str> = info
            .decorators
            .iter()
            .take(SHOWN_DECORATORS)
            .map(String::as_str)
            .collect();
        parts.push(format!("[@{}]", shown.join(", ")));
    }

    let methods: Vec<String> = info.callables().map(|m| m.name.clone()).collect();
    if !methods.is_empty() {
        parts.push(format!("→ {}", member_list(&methods, profile.member_limit)));
    }
    parts.join(" ")
}

fn callable_name(name: &str, is_async: bool) -> String {
    if is_async {
        format!("async {}()", name)
    } else {
        format!("{}()", name)
    }
}

/// First `limit` items joined by `, `, with `overflow(n)` appended for the rest
fn limited(items: &[String], limit: usize, overflow: impl Fn(usize) -> String) -> String {
    let mut out = items.iter().take(limit).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > limit {
        out.push_str(&overflow(items.len() - limit));
    }
    out
}

fn member_list(names: &[String], limit: usize) -> String {
    limited(names, limit, |n| format!(" (+{} more)", n))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    label: &'a str,
    root: &'a str,
    frameworks: &'a [&'a str],
    stats: Stats,
    #[serde(flatten)]
    model: &'a AggregateModel,
}

/// Format the aggregate model as JSON
pub fn format_json(model: &AggregateModel, root_label: &str, frameworks: &[&str], pretty: bool) -> Result<String> {
    let report = JsonReport {
        label: model.grammar.profile().label,
        root: root_label,
        frameworks,
        stats: model.stats(),
        model,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(json)
}

/// Format the aggregate model as CSV, one row per type
pub fn format_csv(model: &AggregateModel) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["group", "file", "type", "kind", "bases", "members", "exported"])?;

    for (group, files) in &model.groups {
        for file in files {
            for info in &file.types {
                let bases = info.bases.join(";");
                let members = info
                    .members
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(";");
                writer.write_record([
                    group.as_str(),
                    file.path.as_str(),
                    info.name.as_str(),
                    info.kind.label(),
                    bases.as_str(),
                    members.as_str(),
                    if info.is_exported { "true" } else { "false" },
                ])?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CodemapError::io_error(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CodemapError::CsvSerialize { source: e })
}

/// One-line run summary for stderr
pub fn format_summary(label: &str, stats: Stats, skipped: &[SkippedFile], use_colors: bool) -> String {
    let counts = format!(
        "{} files, {} types, {} members",
        stats.files, stats.types, stats.members
    );
    let mut line = if use_colors {
        format!("{} {}", Green.bold().paint(format!("{} map:", label)), counts)
    } else {
        format!("{} map: {}", label, counts)
    };

    if !skipped.is_empty() {
        let note = format!("({} skipped)", skipped.len());
        line.push(' ');
        if use_colors {
            line.push_str(&Yellow.paint(note).to_string());
        } else {
            line.push_str(&note);
        }
    }
    line
}

/// Skipped-file lines for the verbose summary
pub fn format_skipped(skipped: &[SkippedFile], use_colors: bool) -> String {
    skipped
        .iter()
        .map(|s| {
            if use_colors {
                format!("  {} {}", Style::new().dimmed().paint(&s.path), s.reason)
            } else {
                format!("  {}: {}", s.path, s.reason)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
