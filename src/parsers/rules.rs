//! Declaration-head matching
//!
//! A front end is a list of [`HeadRule`]s tried against the masked source.
//! Each rule finds the next head of one declaration form at or after an
//! offset and hands back a [`Declaration`] for the front end to refine.

use crate::models::structure::TypeKind;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

/// A declaration head recognized in a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: TypeKind,
    pub name: String,
    /// Byte range of the whole head match
    pub span: Range<usize>,
    /// Offset of the opening `{` of the declaration body, if it has one
    pub body_open: Option<usize>,
    pub bases: Vec<String>,
    pub decorators: Vec<String>,
    pub modifiers: Vec<String>,
    pub is_exported: bool,
    pub is_async: bool,
}

impl Declaration {
    pub fn new(kind: TypeKind, name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            name: name.into(),
            span,
            body_open: None,
            bases: Vec::new(),
            decorators: Vec::new(),
            modifiers: Vec::new(),
            is_exported: true,
            is_async: false,
        }
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }
}

/// One declaration form of a grammar
pub trait HeadRule: Sync {
    /// Short name of the form, used in trace output
    fn name(&self) -> &'static str;

    /// The first head of this form starting at or after `offset`
    fn try_match(&self, text: &str, offset: usize) -> Option<Declaration>;
}

/// A [`HeadRule`] built from a regex and a function that turns its captures
/// into a declaration. Returning `None` from `build` rejects that match and
/// the search continues after it.
pub struct RegexRule {
    pub name: &'static str,
    pub regex: &'static Lazy<Regex>,
    pub build: fn(&Captures<'_>, &str) -> Option<Declaration>,
}

impl HeadRule for RegexRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn try_match(&self, text: &str, offset: usize) -> Option<Declaration> {
        let mut at = offset;
        while at <= text.len() {
            let caps = self.regex.captures_at(text, at)?;
            let whole = caps.get(0)?;
            if let Some(decl) = (self.build)(&caps, text) {
                return Some(decl);
            }
            if whole.end() <= at {
                return None;
            }
            at = whole.end();
        }
        None
    }
}

/// Every declaration `rule` finds in `text`, in source order
pub fn match_all(rule: &dyn HeadRule, text: &str) -> Vec<Declaration> {
    let mut found = Vec::new();
    let mut offset = 0;
    while let Some(decl) = rule.try_match(text, offset) {
        let next = decl.span.end.max(offset + 1);
        tracing::trace!(rule = rule.name(), name = %decl.name, "matched declaration head");
        found.push(decl);
        if next > text.len() {
            break;
        }
        offset = next;
    }
    found
}

/// Apply each rule in turn and keep the first declaration of every name.
/// Results come in rule order, then source order within a rule.
pub fn match_rules(rules: &[&dyn HeadRule], text: &str) -> Vec<Declaration> {
    let mut found: Vec<Declaration> = Vec::new();
    for rule in rules {
        for decl in match_all(*rule, text) {
            if !found.iter().any(|d| d.name == decl.name) {
                found.push(decl);
            }
        }
    }
    found
}

/// Every match of a boundary-anchored member pattern.
///
/// Each search resumes at the end of the `resume` group rather than the end
/// of the whole match, so a statement terminator consumed by one match can
/// still anchor the next.
pub fn find_heads<'t>(re: &Regex, text: &'t str, resume: &str) -> Vec<Captures<'t>> {
    let mut found = Vec::new();
    let mut at = 0;
    while at <= text.len() {
        let Some(caps) = re.captures_at(text, at) else {
            break;
        };
        let next = caps
            .name(resume)
            .or_else(|| caps.get(0))
            .map_or(text.len() + 1, |m| m.end());
        found.push(caps);
        if next <= at {
            break;
        }
        at = next;
    }
    found
}

/// Compile a pattern literal
pub(crate) fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

/// Text of a named capture, or the empty string
pub fn cap<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}
