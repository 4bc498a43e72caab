//! TypeScript / JavaScript front end
//!
//! Import sources are read from a copy with only comments masked.
//! Declarations and members are matched on a copy with string contents
//! blanked as well, so delimiters inside literals never shift the balance.

use super::rules::{cap, find_heads, match_all, match_rules, regex, Declaration, HeadRule, RegexRule};
use super::scan::{self, MaskStyle, TYPESCRIPT_MASK};
use super::FrontEnd;
use crate::models::config::DepthPolicy;
use crate::models::grammar::Grammar;
use crate::models::structure::{FileModel, MemberInfo, TypeInfo, TypeKind};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashSet};

/// Framework hooks and accessors that add no structural information
const LIFECYCLE: &[&str] = &[
    "constructor",
    "ngOnInit",
    "ngOnDestroy",
    "componentDidMount",
    "componentWillUnmount",
    "render",
    "get",
    "set",
];

const CODE_MASK: MaskStyle = MaskStyle {
    mask_strings: true,
    ..TYPESCRIPT_MASK
};

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "return", "function"];

/// Words that can follow `export default` without naming a local binding
const DEFAULT_EXPORT_KEYWORDS: &[&str] = &[
    "class", "function", "async", "abstract", "interface", "enum", "new", "await",
];

static CLASS_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?x)
        (?P<export>\bexport\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?
        \bclass\s+(?P<name>[A-Za-z_$][\w$]*)
        \s*(?:<[^{]*?>)?
        (?:\s*\bextends\s+(?P<extends>[^{]+?))?
        (?:\s*\bimplements\s+(?P<implements>[^{]+?))?
        \s*\{",
    )
});

static INTERFACE_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?x)
        (?P<export>\bexport\s+)?(?:declare\s+)?
        \binterface\s+(?P<name>[A-Za-z_$][\w$]*)
        \s*(?:<[^{]*?>)?
        (?:\s*\bextends\s+(?P<extends>[^{]+?))?
        \s*\{",
    )
});

static TYPE_ALIAS_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?x)
        (?P<export>\bexport\s+)?(?:declare\s+)?
        \btype\s+(?P<name>[A-Za-z_$][\w$]*)
        \s*(?:<[^=]*?>)?\s*=",
    )
});

static ENUM_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?x)
        (?P<export>\bexport\s+)?(?:declare\s+)?(?:const\s+)?
        \benum\s+(?P<name>[A-Za-z_$][\w$]*)\s*\{",
    )
});

static FUNCTION_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?x)
        (?P<export>\bexport\s+)?(?:default\s+)?(?:declare\s+)?(?P<async>async\s+)?
        \bfunction\b\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)
        \s*(?:<[^(]*?>)?\s*(?P<paren>\()",
    )
});

static FC_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?x)
        (?P<export>\bexport\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)
        \s*:\s*(?:React\.)?(?:FC|FunctionComponent|VFC)\b",
    )
});

static ARROW_HEAD: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?x)
        (?P<export>\bexport\s+)?(?:const|let)\s+(?P<name>[A-Za-z_$][\w$]*)
        \s*(?::[^=;]+?)?=\s*(?P<async>async\s+)?
        (?:\([^()]*(?:\([^()]*\)[^()]*)*\)|[A-Za-z_$][\w$]*)
        \s*(?::[^=;]+?)?=>",
    )
});

static METHOD_MEMBER: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?mx)
        (?:^|[;{}])[[:blank:]]*
        (?P<decorators>(?:@[\w$.]+\b(?:\([^()]*(?:\([^()]*\)[^()]*)*\))?\s*)*)
        (?P<mods>(?:(?:public|private|protected|static|readonly|abstract|override|async|declare|accessor)\s+)*)
        (?:(?P<accessor>get|set)\s+)?
        (?P<star>\*\s*)?
        (?:[A-Za-z_$][\w$.]*(?:<[^()]*?>)?(?:\[\])*\s+)?
        (?P<name>\#?[A-Za-z_$][\w$]*)
        \s*\??\s*(?:<[^()]*?>)?\s*\(",
    )
});

static ARROW_MEMBER: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?mx)
        (?:^|[;{}])[[:blank:]]*
        (?P<decorators>(?:@[\w$.]+\b(?:\([^()]*(?:\([^()]*\)[^()]*)*\))?\s*)*)
        (?P<mods>(?:(?:public|private|protected|static|readonly|override|declare)\s+)*)
        (?P<name>\#?[A-Za-z_$][\w$]*)\s*[?!]?\s*(?::[^=;]+?)?=\s*(?P<async>async\s+)?
        (?:\([^()]*(?:\([^()]*\)[^()]*)*\)|[A-Za-z_$][\w$]*)
        \s*(?::[^=;]+?)?=>",
    )
});

static FIELD_MEMBER: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?mx)
        (?:^|[;{}])[[:blank:]]*
        (?P<decorators>(?:@[\w$.]+\b(?:\([^()]*(?:\([^()]*\)[^()]*)*\))?\s*)*)
        (?P<mods>(?:(?:public|private|protected|static|readonly|override|declare|accessor)\s+)*)
        (?P<name>\#?[A-Za-z_$][\w$]*)\s*[?!]?[[:blank:]]*
        (?::[^;=\n]+)?(?:=[^;\n]*)?[[:blank:]]*(?:;|$)",
    )
});

static COMPONENT_RETURN: Lazy<Regex> = Lazy::new(|| regex(r"\breturn\s*\(?\s*<[A-Za-z>]"));

static CONCISE_MARKUP: Lazy<Regex> = Lazy::new(|| regex(r"^\s*\(?\s*<[A-Za-z>]"));

static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    regex(
        r#"\bimport\s+(?:type\s+)?(?:[\w$]+\s*,?\s*)?(?:\*\s+as\s+[\w$]+|\{[^}]*\})?\s*from\s*['"](?P<source>[^'"]+)['"]"#,
    )
});

static SIDE_EFFECT_IMPORT: Lazy<Regex> =
    Lazy::new(|| regex(r#"\bimport\s*['"](?P<source>[^'"]+)['"]"#));

static EXPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    regex(
        r#"\bexport\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"](?P<source>[^'"]+)['"]"#,
    )
});

static REQUIRE: Lazy<Regex> =
    Lazy::new(|| regex(r#"\brequire\s*\(\s*['"](?P<source>[^'"]+)['"]\s*\)"#));

static DYNAMIC_IMPORT: Lazy<Regex> =
    Lazy::new(|| regex(r#"\bimport\s*\(\s*['"](?P<source>[^'"]+)['"]\s*\)"#));

static EXPORT_LIST: Lazy<Regex> = Lazy::new(|| regex(r"\bexport\s+(?:type\s+)?\{(?P<names>[^}]*)\}"));

static EXPORT_DEFAULT: Lazy<Regex> =
    Lazy::new(|| regex(r"\bexport\s+default\s+(?P<name>[A-Za-z_$][\w$]*)"));

static CLASS_RULE: RegexRule = RegexRule {
    name: "ts-class",
    regex: &CLASS_HEAD,
    build: build_class,
};

static INTERFACE_RULE: RegexRule = RegexRule {
    name: "ts-interface",
    regex: &INTERFACE_HEAD,
    build: build_interface,
};

static TYPE_ALIAS_RULE: RegexRule = RegexRule {
    name: "ts-type-alias",
    regex: &TYPE_ALIAS_HEAD,
    build: build_type_alias,
};

static ENUM_RULE: RegexRule = RegexRule {
    name: "ts-enum",
    regex: &ENUM_HEAD,
    build: build_enum,
};

static FUNCTION_RULE: RegexRule = RegexRule {
    name: "ts-function",
    regex: &FUNCTION_HEAD,
    build: build_function,
};

static FC_RULE: RegexRule = RegexRule {
    name: "ts-function-component",
    regex: &FC_HEAD,
    build: build_function_component,
};

static ARROW_RULE: RegexRule = RegexRule {
    name: "ts-arrow-function",
    regex: &ARROW_HEAD,
    build: build_arrow,
};

pub struct TypeScriptFrontEnd;

impl FrontEnd for TypeScriptFrontEnd {
    fn grammar(&self) -> Grammar {
        Grammar::TypeScript
    }

    fn extract(&self, path: &str, text: &str, depth: DepthPolicy) -> FileModel {
        let mut model = FileModel::new(path);
        model.imports = imports(&scan::mask_source(text, TYPESCRIPT_MASK));
        let code = scan::mask_source(text, CODE_MASK);

        // Overload signatures repeat a name; the first declaration wins
        let rules: [&dyn HeadRule; 6] = [
            &CLASS_RULE,
            &INTERFACE_RULE,
            &TYPE_ALIAS_RULE,
            &ENUM_RULE,
            &FUNCTION_RULE,
            &FC_RULE,
        ];
        let mut declarations = match_rules(&rules, &code);

        // Arrow functions are kept only when exported and not already declared
        for decl in match_all(&ARROW_RULE, &code) {
            if decl.is_exported && !declarations.iter().any(|d| d.name == decl.name) {
                declarations.push(decl);
            }
        }

        let exported = exported_names(&code);

        for decl in declarations {
            let members = if depth.includes_members() {
                members_of(&decl, &code, depth)
            } else {
                Vec::new()
            };
            let heuristic = decl.kind == TypeKind::Function && is_component(&decl, &code);
            let kind = if heuristic { TypeKind::Component } else { decl.kind };

            let mut info = TypeInfo::new(decl.name.as_str(), kind)
                .with_bases(decl.bases.clone())
                .with_decorators(decl.decorators.clone())
                .with_members(members)
                .exported(decl.is_exported || exported.contains(decl.name.as_str()));
            info.is_async = decl.is_async;
            info.heuristic = heuristic;
            model.types.push(info);
        }

        model
    }
}

fn head_declaration(caps: &Captures<'_>, kind: TypeKind) -> Option<Declaration> {
    let mut decl = Declaration::new(kind, cap(caps, "name"), caps.get(0)?.range());
    decl.is_exported = caps.name("export").is_some();
    decl.is_async = caps.name("async").is_some();
    Some(decl)
}

/// Offset of the last `{` in the match, which opens the body
fn trailing_brace(caps: &Captures<'_>) -> Option<usize> {
    let whole = caps.get(0)?;
    whole.as_str().rfind('{').map(|i| whole.start() + i)
}

fn base_names(list: &str) -> impl Iterator<Item = String> + '_ {
    scan::split_top_level(list)
        .into_iter()
        .map(scan::strip_generics)
        .filter(|b| !b.is_empty())
}

fn build_class(caps: &Captures<'_>, text: &str) -> Option<Declaration> {
    let mut decl = head_declaration(caps, TypeKind::Class)?;
    decl.body_open = trailing_brace(caps);
    decl.decorators = preceding_decorators(text, decl.span.start);

    let extends = cap(caps, "extends");
    if !extends.is_empty() {
        // `extends Mixin(Base)` keeps the callee
        let base = extends.split('(').next().unwrap_or(extends);
        decl.bases.push(scan::strip_generics(base));
    }
    decl.bases.extend(base_names(cap(caps, "implements")));
    decl.bases.retain(|b| !b.is_empty());

    let decorated = |name: &str| {
        decl.decorators
            .iter()
            .any(|d| d == name || d.rsplit('.').next() == Some(name))
    };
    let kind = if decorated("Component") {
        TypeKind::Component
    } else if decorated("Injectable") {
        TypeKind::Service
    } else {
        TypeKind::Class
    };
    decl.kind = kind;
    Some(decl)
}

fn build_interface(caps: &Captures<'_>, _text: &str) -> Option<Declaration> {
    let mut decl = head_declaration(caps, TypeKind::Interface)?;
    decl.body_open = trailing_brace(caps);
    decl.bases = base_names(cap(caps, "extends")).collect();
    Some(decl)
}

fn build_type_alias(caps: &Captures<'_>, _text: &str) -> Option<Declaration> {
    head_declaration(caps, TypeKind::TypeAlias)
}

fn build_enum(caps: &Captures<'_>, _text: &str) -> Option<Declaration> {
    let mut decl = head_declaration(caps, TypeKind::Enum)?;
    decl.body_open = trailing_brace(caps);
    Some(decl)
}

fn build_function(caps: &Captures<'_>, text: &str) -> Option<Declaration> {
    let mut decl = head_declaration(caps, TypeKind::Function)?;
    let paren = caps.name("paren")?;
    let close = scan::find_matching(text, paren.start(), b'(', b')')?;
    let rest = &text[close + 1..];
    // An overload signature ends with `;` before any body
    if let Some(brace) = rest.find('{') {
        if !rest[..brace].contains(';') {
            decl.body_open = Some(close + 1 + brace);
        }
    }
    Some(decl)
}

fn build_function_component(caps: &Captures<'_>, _text: &str) -> Option<Declaration> {
    let mut decl = head_declaration(caps, TypeKind::Component)?;
    decl.bases.push("FC".to_string());
    Some(decl)
}

fn build_arrow(caps: &Captures<'_>, _text: &str) -> Option<Declaration> {
    head_declaration(caps, TypeKind::Function)
}

/// Decorator names written directly before `start`, in source order
fn preceding_decorators(text: &str, start: usize) -> Vec<String> {
    let bytes = text.as_bytes();
    let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.';
    let mut names = Vec::new();
    let mut end = start;

    loop {
        let mut i = end;
        while i > 0 && bytes[i - 1].is_ascii_whitespace() {
            i -= 1;
        }
        if i > 0 && bytes[i - 1] == b')' {
            match matching_open(bytes, i - 1) {
                Some(open) => i = open,
                None => break,
            }
        }
        let ident_end = i;
        while i > 0 && is_ident(bytes[i - 1]) {
            i -= 1;
        }
        if i == ident_end || i == 0 || bytes[i - 1] != b'@' {
            break;
        }
        names.push(text[i..ident_end].to_string());
        end = i - 1;
    }

    names.reverse();
    names
}

/// Offset of the `(` balancing the `)` at `close`, scanning backwards
fn matching_open(bytes: &[u8], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        match bytes[i] {
            b')' => depth += 1,
            b'(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Whether a function-kind declaration returns markup
fn is_component(decl: &Declaration, text: &str) -> bool {
    if !decl.name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return false;
    }
    if let Some(open) = decl.body_open {
        let close = scan::find_block_end(text, open);
        return COMPONENT_RETURN.is_match(&text[open..close]);
    }
    // Arrow function: block body or concise expression after `=>`
    let after = text[decl.span.end..].trim_start();
    if after.starts_with('{') {
        let open = text.len() - after.len();
        let close = scan::find_block_end(text, open);
        COMPONENT_RETURN.is_match(&text[open..close])
    } else {
        CONCISE_MARKUP.is_match(after)
    }
}

/// Nesting depth of parentheses at `at`
fn paren_depth(text: &str, at: usize) -> i32 {
    text.as_bytes()[..at].iter().fold(0, |depth, b| match b {
        b'(' => depth + 1,
        b')' => depth - 1,
        _ => depth,
    })
}

/// Whether `at` continues an identifier, as a name split off a decorator would
fn follows_identifier(text: &str, at: usize) -> bool {
    at.checked_sub(1)
        .and_then(|i| text.as_bytes().get(i))
        .is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
}

fn is_hidden(mods: &str, name: &str) -> bool {
    name.starts_with('#')
        || mods
            .split_whitespace()
            .any(|m| m == "private" || m == "protected")
}

fn members_of(decl: &Declaration, masked: &str, depth: DepthPolicy) -> Vec<MemberInfo> {
    let Some(open) = decl.body_open else {
        return Vec::new();
    };
    let close = scan::find_block_end(masked, open).max(open + 1);
    let flat = scan::flatten_nested(&masked[open + 1..close]);

    if decl.kind == TypeKind::Enum {
        if !depth.includes_fields() {
            return Vec::new();
        }
        return scan::split_top_level(&flat)
            .into_iter()
            .filter_map(scan::leading_identifier)
            .map(MemberInfo::field)
            .collect();
    }

    let visible = |mods: &str, name: &str| depth.includes_private() || !is_hidden(mods, name);
    let mut found: Vec<(usize, MemberInfo)> = Vec::new();
    let mut claimed: HashSet<usize> = HashSet::new();

    for caps in find_heads(&ARROW_MEMBER, &flat, "name") {
        let Some(name) = caps.name("name") else {
            continue;
        };
        if follows_identifier(&flat, name.start()) {
            continue;
        }
        claimed.insert(name.start());
        if paren_depth(&flat, name.start()) > 0 || !visible(cap(&caps, "mods"), name.as_str()) {
            continue;
        }
        let is_async = caps.name("async").is_some();
        found.push((name.start(), MemberInfo::function(name.as_str(), is_async)));
    }

    for caps in find_heads(&METHOD_MEMBER, &flat, "name") {
        let Some(name) = caps.name("name") else {
            continue;
        };
        let mods = cap(&caps, "mods");
        if caps.name("accessor").is_some()
            || follows_identifier(&flat, name.start())
            || LIFECYCLE.contains(&name.as_str())
            || CONTROL_KEYWORDS.contains(&name.as_str())
            || paren_depth(&flat, name.start()) > 0
            || !visible(mods, name.as_str())
        {
            continue;
        }
        let is_async = mods.split_whitespace().any(|m| m == "async");
        found.push((name.start(), MemberInfo::method(name.as_str(), is_async)));
    }

    if depth.includes_fields() {
        for caps in find_heads(&FIELD_MEMBER, &flat, "name") {
            let Some(name) = caps.name("name") else {
                continue;
            };
            if claimed.contains(&name.start())
                || follows_identifier(&flat, name.start())
                || paren_depth(&flat, name.start()) > 0
                || LIFECYCLE.contains(&name.as_str())
            {
                continue;
            }
            found.push((name.start(), MemberInfo::field(name.as_str())));
        }
    }

    found.sort_by_key(|(at, _)| *at);
    found.into_iter().map(|(_, member)| member).collect()
}

fn imports(masked: &str) -> BTreeSet<String> {
    [
        &*IMPORT_FROM,
        &*SIDE_EFFECT_IMPORT,
        &*EXPORT_FROM,
        &*REQUIRE,
        &*DYNAMIC_IMPORT,
    ]
    .into_iter()
    .flat_map(|re| re.captures_iter(masked))
    .map(|caps| cap(&caps, "source").to_string())
    .collect()
}

/// Local names exported through `export { a, b as c }` or `export default a`
fn exported_names(masked: &str) -> HashSet<&str> {
    let mut names = HashSet::new();
    for caps in EXPORT_LIST.captures_iter(masked) {
        for item in cap(&caps, "names").split(',') {
            if let Some(local) = item.split_whitespace().next() {
                names.insert(local);
            }
        }
    }
    for caps in EXPORT_DEFAULT.captures_iter(masked) {
        let name = cap(&caps, "name");
        if !DEFAULT_EXPORT_KEYWORDS.contains(&name) {
            names.insert(name);
        }
    }
    names
}
