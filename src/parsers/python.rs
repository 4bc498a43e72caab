//! Python front end
//!
//! Python blocks are delimited by indentation, so this front end works on
//! logical statements: physical lines that start outside any open bracket
//! or backslash continuation. A class body is the run of statements indented
//! deeper than its header; its members sit at the body's own indentation.
//!
//! Syntax validity is checked separately with tree-sitter, so files the
//! interpreter would reject are skipped rather than half-mapped.

use super::rules::{cap, regex};
use super::scan::{self, PYTHON_MASK};
use super::{FrontEnd, SkipReason};
use crate::models::config::DepthPolicy;
use crate::models::grammar::Grammar;
use crate::models::structure::{FileModel, MemberInfo, TypeInfo, TypeKind};
use once_cell::sync::Lazy;
use regex::Regex;

const TAB_WIDTH: usize = 8;

/// Statement keywords that look like `name:` or `name =` at a line start
const KEYWORDS: &[&str] = &[
    "if", "elif", "else", "for", "while", "try", "except", "finally", "with", "match", "case",
    "lambda", "return", "pass", "del", "global", "nonlocal", "assert", "raise", "yield",
];

static CLASS_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(r"^class\s+(?P<name>[A-Za-z_]\w*)\s*(?:\[[^\]]*\])?\s*(?P<paren>\()?")
});

static DEF_HEAD: Lazy<Regex> =
    Lazy::new(|| regex(r"^(?P<async>async\s+)?def\s+(?P<name>[A-Za-z_]\w*)"));

static DECORATOR: Lazy<Regex> = Lazy::new(|| regex(r"^@\s*(?P<name>[A-Za-z_][\w.]*)"));

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| regex(r"^(?P<name>[A-Za-z_]\w*)\s*(?::|=(?:[^=]|$))"));

static IMPORT: Lazy<Regex> = Lazy::new(|| regex(r"^import\s+(?P<names>.+)$"));

static FROM_IMPORT: Lazy<Regex> =
    Lazy::new(|| regex(r"^from\s+(?P<dots>\.*)\s*(?P<module>[\w.]*)\s+import\b"));

/// A logical statement: its first physical line, trimmed
#[derive(Debug, Clone, Copy)]
struct Statement<'t> {
    start: usize,
    indent: usize,
    text: &'t str,
}

pub struct PythonFrontEnd;

impl FrontEnd for PythonFrontEnd {
    fn grammar(&self) -> Grammar {
        Grammar::Python
    }

    fn validate(&self, text: &str) -> Result<(), SkipReason> {
        let mut parser = tree_sitter::Parser::new();
        if let Err(err) = parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
            tracing::debug!("python syntax check unavailable: {}", err);
            return Ok(());
        }
        let Some(tree) = parser.parse(text, None) else {
            return Ok(());
        };
        let root = tree.root_node();
        if !root.has_error() {
            return Ok(());
        }
        let line = first_error(root).map(|node| node.start_position().row + 1);
        Err(SkipReason::InvalidSyntax { line })
    }

    fn extract(&self, path: &str, text: &str, depth: DepthPolicy) -> FileModel {
        let masked = scan::mask_source(text, PYTHON_MASK);
        let statements = logical_statements(&masked);
        let mut model = FileModel::new(path);

        for stmt in &statements {
            collect_imports(stmt.text, &mut model);
        }

        for (idx, stmt) in statements.iter().enumerate() {
            if let Some(info) = class_info(&statements, idx, &masked, depth) {
                model.types.push(info);
            } else if stmt.indent == 0 && depth.includes_members() {
                if let Some(caps) = DEF_HEAD.captures(stmt.text) {
                    let name = cap(&caps, "name");
                    if depth.includes_private() || !name.starts_with('_') {
                        let mut info = TypeInfo::new(name, TypeKind::Function)
                            .with_decorators(decorators(&statements, idx));
                        info.is_async = caps.name("async").is_some();
                        model.types.push(info);
                    }
                }
            }
        }

        model
    }
}

/// Deepest-first search for the first error or missing node
fn first_error(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
        .or(Some(node))
}

fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => break,
        }
    }
    width
}

fn logical_statements(masked: &str) -> Vec<Statement<'_>> {
    let mut statements = Vec::new();
    let mut depth = 0i32;
    let mut continued = false;
    let mut offset = 0;

    for physical in masked.split_inclusive('\n') {
        let content = physical.trim_end_matches(['\n', '\r']);
        let stripped = content.trim_start();

        if depth <= 0 && !continued && !stripped.is_empty() {
            statements.push(Statement {
                start: offset + (content.len() - stripped.len()),
                indent: indent_width(content),
                text: stripped.trim_end(),
            });
        }

        for b in content.bytes() {
            match b {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth -= 1,
                _ => {}
            }
        }
        continued = content.trim_end().ends_with('\\');
        offset += physical.len();
    }

    statements
}

/// Decorator names on the statements directly above `idx` at its indentation
fn decorators(statements: &[Statement<'_>], idx: usize) -> Vec<String> {
    let indent = statements[idx].indent;
    let mut names: Vec<String> = statements[..idx]
        .iter()
        .rev()
        .take_while(|s| s.indent == indent && s.text.starts_with('@'))
        .filter_map(|s| DECORATOR.captures(s.text))
        .map(|c| cap(&c, "name").to_string())
        .collect();
    names.reverse();
    names
}

/// Positional bases: keyword arguments dropped, dotted names reduced to
/// their last segment, subscripts stripped
fn class_bases(arguments: &str) -> Vec<String> {
    scan::split_top_level(arguments)
        .into_iter()
        .filter(|arg| !arg.contains('=') && !arg.starts_with('*'))
        .filter_map(|arg| {
            let base = scan::strip_subscripts(arg);
            let last = base.rsplit('.').next().unwrap_or(&base).trim();
            let ident = scan::leading_identifier(last)?;
            (ident.len() == last.len()).then(|| ident.to_string())
        })
        .collect()
}

fn class_info(
    statements: &[Statement<'_>],
    idx: usize,
    masked: &str,
    depth: DepthPolicy,
) -> Option<TypeInfo> {
    let stmt = statements[idx];
    let head = &masked[stmt.start..];
    let caps = CLASS_HEAD.captures(head)?;

    let bases = match caps.name("paren") {
        Some(paren) => {
            let close = scan::find_matching(head, paren.start(), b'(', b')')?;
            class_bases(&head[paren.end()..close])
        }
        None => Vec::new(),
    };

    let members = if depth.includes_members() {
        class_members(statements, idx, depth)
    } else {
        Vec::new()
    };

    Some(
        TypeInfo::new(cap(&caps, "name"), TypeKind::Class)
            .with_bases(bases)
            .with_decorators(decorators(statements, idx))
            .with_members(members),
    )
}

fn class_members(statements: &[Statement<'_>], idx: usize, depth: DepthPolicy) -> Vec<MemberInfo> {
    let header_indent = statements[idx].indent;
    let body: Vec<(usize, &Statement<'_>)> = statements
        .iter()
        .enumerate()
        .skip(idx + 1)
        .take_while(|(_, s)| s.indent > header_indent)
        .collect();
    let Some(body_indent) = body.first().map(|(_, s)| s.indent) else {
        return Vec::new();
    };

    let mut members = Vec::new();
    for (pos, stmt) in body.iter().filter(|(_, s)| s.indent == body_indent) {
        if let Some(caps) = DEF_HEAD.captures(stmt.text) {
            let name = cap(&caps, "name");
            if name.starts_with("__") && name != "__init__" {
                continue;
            }
            if name.starts_with('_') && !name.starts_with("__") && !depth.includes_private() {
                continue;
            }
            let decorators = decorators(statements, *pos);
            // `@x.setter` / `@x.deleter` redefine an existing property
            if decorators
                .iter()
                .any(|d| d.ends_with(".setter") || d.ends_with(".deleter"))
            {
                continue;
            }
            if decorators
                .iter()
                .any(|d| d == "property" || d.ends_with(".cached_property") || d == "cached_property")
            {
                members.push(MemberInfo::property(name));
            } else {
                members.push(MemberInfo::method(name, caps.name("async").is_some()));
            }
        } else if depth.includes_fields() {
            if let Some(caps) = ATTRIBUTE.captures(stmt.text) {
                let name = cap(&caps, "name");
                if !KEYWORDS.contains(&name) && !name.starts_with("__") {
                    members.push(MemberInfo::field(name));
                }
            }
        }
    }
    members
}

fn collect_imports(statement: &str, model: &mut FileModel) {
    if let Some(caps) = IMPORT.captures(statement) {
        for item in cap(&caps, "names").split(',') {
            let module = item.split_whitespace().next().unwrap_or("");
            if !module.is_empty() && module.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
                model.imports.insert(module.to_string());
            }
        }
    } else if let Some(caps) = FROM_IMPORT.captures(statement) {
        let module = cap(&caps, "module");
        // Relative imports name local modules
        if cap(&caps, "dots").is_empty() && !module.is_empty() {
            model.imports.insert(module.to_string());
        }
    }
}
