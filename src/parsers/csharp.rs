//! C# front end
//!
//! Types are found anywhere in the masked file (nested types included);
//! members are matched only at depth one of each type body.

use super::rules::{cap, find_heads, match_rules, regex, Declaration, RegexRule};
use super::scan::{self, CSHARP_MASK};
use super::FrontEnd;
use crate::models::config::DepthPolicy;
use crate::models::grammar::Grammar;
use crate::models::structure::{FileModel, MemberInfo, TypeInfo, TypeKind};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "abstract", "sealed", "partial",
    "readonly", "unsafe", "new", "file", "ref", "virtual", "override", "async", "extern",
    "volatile", "const", "required", "event",
];

/// Tokens that make a member-shaped match something else
const DECLARATION_KEYWORDS: &[&str] = &[
    "class", "struct", "interface", "enum", "record", "delegate", "namespace", "operator",
    "implicit", "explicit", "using", "return",
];

const ACCESSORS: &[&str] = &["get", "set", "add", "remove", "init"];

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "foreach", "while", "switch", "catch", "using", "lock", "return", "nameof",
    "typeof", "sizeof", "default", "checked", "unchecked", "fixed",
];

static NAMESPACE: Lazy<Regex> =
    Lazy::new(|| regex(r"(?m)^\s*namespace\s+(?P<name>[\w.]+)\s*[;{]"));

static USING: Lazy<Regex> = Lazy::new(|| {
    regex(r"(?m)^\s*(?:global\s+)?using\s+(?:static\s+)?(?P<name>[\w.]+)\s*;")
});

static TYPE_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?x)
        (?P<attrs>(?:\[(?:[^\[\]]|\[[^\[\]]*\])*\]\s*)*)
        (?P<mods>(?:\b(?:public|private|protected|internal|static|abstract|sealed|partial|readonly|unsafe|new|file|ref)\s+)*)
        \b(?P<kind>class|interface|enum|struct|record(?:\s+(?:struct|class))?)\s+
        (?P<name>[A-Za-z_]\w*)
        \s*(?:<[^{};()]*?>)?
        \s*(?:\((?P<params>[^)]*)\))?
        \s*(?::\s*(?P<bases>[^{;]+?))?
        \s*(?:\bwhere\b[^{;]*)?
        (?P<open>[{;])",
    )
});

static METHOD_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?mx)
        (?:^|[;{}])[[:blank:]]*
        (?P<attrs>(?:\[(?:[^\[\]]|\[[^\[\]]*\])*\]\s*)*)
        (?P<prefix>(?:[\w.?\[\],<>]+\s+)+?)
        (?P<name>[A-Za-z_]\w*)
        (?:<[^()<>;{}]*(?:<[^()<>;{}]*>[^()<>;{}]*)*>)?\s*\(",
    )
});

static PROPERTY_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?mx)
        (?:^|[;{}])[[:blank:]]*
        (?P<attrs>(?:\[(?:[^\[\]]|\[[^\[\]]*\])*\]\s*)*)
        (?P<prefix>(?:[\w.?\[\],<>]+\s+)+?)
        (?P<name>[A-Za-z_]\w*)
        \s*(?P<tail>\{|=>)",
    )
});

static FIELD_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?mx)
        (?:^|[;{}])[[:blank:]]*
        (?P<attrs>(?:\[(?:[^\[\]]|\[[^\[\]]*\])*\]\s*)*)
        (?P<prefix>(?:[\w.?\[\],<>]+\s+)+?)
        (?P<name>[A-Za-z_]\w*)
        \s*(?:=(?:[^>;{}][^;{}]*)?(?:\{[^}]*\}[^;{}]*)*)?;",
    )
});

/// What follows a property's `{`: optional attributes and access modifier, then an accessor
static ACCESSOR_BLOCK: Lazy<Regex> = Lazy::new(|| {
    regex(r"^\s*(?:\[[^\]]*\]\s*)*(?:(?:public|private|protected|internal)\s+)*(?:get|set|init)\b")
});

static ATTRIBUTE_GROUP: Lazy<Regex> = Lazy::new(|| regex(r"\[([^\[\]]*(?:\[[^\[\]]*\][^\[\]]*)*)\]"));

static TYPE_RULE: RegexRule = RegexRule {
    name: "csharp-type",
    regex: &TYPE_HEAD,
    build: build_type,
};

pub struct CSharpFrontEnd;

impl FrontEnd for CSharpFrontEnd {
    fn grammar(&self) -> Grammar {
        Grammar::CSharp
    }

    fn extract(&self, path: &str, text: &str, depth: DepthPolicy) -> FileModel {
        let masked = scan::mask_source(text, CSHARP_MASK);
        let mut model = FileModel::new(path);

        model.namespace = NAMESPACE
            .captures(&masked)
            .map(|c| cap(&c, "name").to_string());
        model.imports = USING
            .captures_iter(&masked)
            .map(|c| cap(&c, "name").to_string())
            .collect();

        for decl in match_rules(&[&TYPE_RULE], &masked) {
            let members = if depth.includes_members() {
                members_of(&decl, &masked, depth)
            } else {
                Vec::new()
            };
            let mut info = TypeInfo::new(decl.name.as_str(), decl.kind)
                .with_bases(decl.bases.clone())
                .with_decorators(decl.decorators.clone())
                .with_members(members);
            info.is_partial = decl.has_modifier("partial");
            model.types.push(info);
        }

        model
    }
}

fn build_type(caps: &Captures<'_>, _text: &str) -> Option<Declaration> {
    let whole = caps.get(0)?;
    let open = caps.name("open")?;
    let keyword = cap(caps, "kind");
    let is_record = keyword.starts_with("record");

    // Only records may omit their body
    if open.as_str() == ";" && !is_record {
        return None;
    }

    let kind = if is_record {
        TypeKind::Record
    } else {
        TypeKind::from_keyword(keyword)?
    };

    let mut decl = Declaration::new(kind, cap(caps, "name"), whole.range());
    decl.modifiers = cap(caps, "mods")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    decl.decorators = attribute_names(cap(caps, "attrs"));
    decl.bases = clean_bases(cap(caps, "bases"));
    if open.as_str() == "{" {
        decl.body_open = Some(open.start());
    }
    Some(decl)
}

/// Attribute names from one or more `[...]` groups, in order
fn attribute_names(attrs: &str) -> Vec<String> {
    let mut names = Vec::new();
    for group in ATTRIBUTE_GROUP.captures_iter(attrs) {
        let inner = group.get(1).map_or("", |m| m.as_str());
        // Drop an `assembly:` / `return:` style target
        let inner = match inner.split_once(':') {
            Some((target, rest)) if !target.contains('(') => rest,
            _ => inner,
        };
        for attribute in scan::split_top_level(inner) {
            let name: String = attribute
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
                .collect();
            if !name.is_empty() {
                names.push(name);
            }
        }
    }
    names
}

fn clean_bases(list: &str) -> Vec<String> {
    scan::split_top_level(list)
        .into_iter()
        .map(|base| {
            // `Person(Name)` in a record's base list
            let base = base.split('(').next().unwrap_or(base);
            scan::strip_generics(base)
        })
        .filter(|base| !base.is_empty())
        .collect()
}

/// A member head split into modifiers and the remaining type tokens
struct MemberHead<'t> {
    name: &'t str,
    at: usize,
    modifiers: Vec<&'t str>,
}

impl MemberHead<'_> {
    fn is_hidden(&self) -> bool {
        self.modifiers
            .iter()
            .any(|m| *m == "private" || *m == "protected")
    }

    fn is_async(&self) -> bool {
        self.modifiers.contains(&"async")
    }
}

fn member_head<'t>(caps: &Captures<'t>) -> Option<MemberHead<'t>> {
    let name = caps.name("name")?;
    let mut modifiers = Vec::new();
    let mut type_tokens = 0;
    for token in cap(caps, "prefix").split_whitespace() {
        if DECLARATION_KEYWORDS.contains(&token) {
            return None;
        }
        if MODIFIERS.contains(&token) {
            modifiers.push(token);
        } else {
            type_tokens += 1;
        }
    }
    // A member always declares a type; constructors and statements do not
    if type_tokens == 0 {
        return None;
    }
    Some(MemberHead {
        name: name.as_str(),
        at: name.start(),
        modifiers,
    })
}

fn members_of(decl: &Declaration, masked: &str, depth: DepthPolicy) -> Vec<MemberInfo> {
    let Some(open) = decl.body_open else {
        return Vec::new();
    };
    let close = scan::find_block_end(masked, open).max(open + 1);
    let body = &masked[open + 1..close];
    let flat = scan::flatten_nested(body);

    if decl.kind == TypeKind::Enum {
        return if depth.includes_fields() {
            enum_values(&flat)
        } else {
            Vec::new()
        };
    }

    let visible = |head: &MemberHead<'_>| depth.includes_private() || !head.is_hidden();
    let mut found: Vec<(usize, MemberInfo)> = Vec::new();

    for caps in find_heads(&METHOD_HEAD, &flat, "name") {
        let Some(head) = member_head(&caps) else {
            continue;
        };
        if head.name == decl.name
            || ACCESSORS.contains(&head.name)
            || CONTROL_KEYWORDS.contains(&head.name)
            || !visible(&head)
        {
            continue;
        }
        found.push((head.at, MemberInfo::method(head.name, head.is_async())));
    }

    for caps in find_heads(&PROPERTY_HEAD, &flat, "name") {
        let Some(head) = member_head(&caps) else {
            continue;
        };
        let Some(tail) = caps.name("tail") else {
            continue;
        };
        let is_property = tail.as_str() == "=>" || ACCESSOR_BLOCK.is_match(&body[tail.end()..]);
        if is_property && head.name != decl.name && visible(&head) {
            found.push((head.at, MemberInfo::property(head.name)));
        }
    }

    if depth.includes_fields() {
        for caps in find_heads(&FIELD_HEAD, &flat, "name") {
            if let Some(head) = member_head(&caps) {
                found.push((head.at, MemberInfo::field(head.name)));
            }
        }
    }

    found.sort_by_key(|(at, _)| *at);
    found.into_iter().map(|(_, member)| member).collect()
}

fn enum_values(flat_body: &str) -> Vec<MemberInfo> {
    scan::split_top_level(flat_body)
        .into_iter()
        .filter_map(|item| {
            let mut item = item.trim_start();
            // Attributes on enum members
            while item.starts_with('[') {
                let end = scan::find_matching(item, 0, b'[', b']')?;
                item = item[end + 1..].trim_start();
            }
            scan::leading_identifier(item).map(MemberInfo::field)
        })
        .collect()
}
