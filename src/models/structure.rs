//! Per-file structural model: declared types and their members

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of a member inside a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Function,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemberKind::Method => "method",
            MemberKind::Property => "property",
            MemberKind::Field => "field",
            MemberKind::Function => "function",
        };
        f.write_str(label)
    }
}

/// A recognized member. Method names carry a trailing `()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    pub is_async: bool,
}

impl MemberInfo {
    /// Method member; `name` is the bare identifier
    pub fn method(name: &str, is_async: bool) -> Self {
        Self {
            name: format!("{}()", name),
            kind: MemberKind::Method,
            is_async,
        }
    }

    /// Function-valued property such as `onClick = () => {}`
    pub fn function(name: &str, is_async: bool) -> Self {
        Self {
            name: format!("{}()", name),
            kind: MemberKind::Function,
            is_async,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, MemberKind::Method | MemberKind::Function)
    }

    pub fn property(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Property,
            is_async: false,
        }
    }

    pub fn field(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Field,
            is_async: false,
        }
    }
}

/// Kind of a declared entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Struct,
    Record,
    TypeAlias,
    Function,
    Component,
    Service,
}

impl TypeKind {
    /// Label used by the renderers
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
            TypeKind::TypeAlias => "type",
            TypeKind::Function => "function",
            TypeKind::Component => "component",
            TypeKind::Service => "service",
        }
    }

    /// Resolve a declaration keyword (`class`, `struct`, ...)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(TypeKind::Class),
            "interface" => Some(TypeKind::Interface),
            "enum" => Some(TypeKind::Enum),
            "struct" => Some(TypeKind::Struct),
            "record" => Some(TypeKind::Record),
            "type" => Some(TypeKind::TypeAlias),
            "function" => Some(TypeKind::Function),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A declared type (or type-like entity such as a function or component)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub kind: TypeKind,
    /// Supertypes in declaration order, generic parameters stripped
    pub bases: Vec<String>,
    pub members: Vec<MemberInfo>,
    /// Attribute or decorator names, in declaration order
    pub decorators: Vec<String>,
    pub is_exported: bool,
    pub is_partial: bool,
    pub is_async: bool,
    /// Kind was inferred by the component heuristic, not by syntax
    pub heuristic: bool,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bases: Vec::new(),
            members: Vec::new(),
            decorators: Vec::new(),
            is_exported: true,
            is_partial: false,
            is_async: false,
            heuristic: false,
        }
    }

    pub fn with_bases(mut self, bases: Vec<String>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_members(mut self, members: Vec<MemberInfo>) -> Self {
        self.members = members;
        self
    }

    pub fn with_decorators(mut self, decorators: Vec<String>) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn exported(mut self, is_exported: bool) -> Self {
        self.is_exported = is_exported;
        self
    }

    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators
            .iter()
            .any(|d| d == name || d.rsplit('.').next() == Some(name))
    }

    /// Methods and function-valued members, in order
    pub fn callables(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(|m| m.is_callable())
    }
}

/// Everything extracted from one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModel {
    /// Path relative to the scan root, `/`-separated
    pub path: String,
    pub namespace: Option<String>,
    pub types: Vec<TypeInfo>,
    pub imports: BTreeSet<String>,
}

impl FileModel {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: None,
            types: Vec::new(),
            imports: BTreeSet::new(),
        }
    }

    /// File name component of `path`
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Containing directory relative to the root, empty for root-level files
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }

    pub fn member_count(&self) -> usize {
        self.types.iter().map(|t| t.members.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_carry_parens() {
        let m = MemberInfo::method("Baz", false);
        assert_eq!(m.name, "Baz()");
        assert_eq!(m.kind, MemberKind::Method);
    }

    #[test]
    fn test_file_model_paths() {
        let root_file = FileModel::new("main.py");
        assert_eq!(root_file.file_name(), "main.py");
        assert_eq!(root_file.directory(), "");

        let nested = FileModel::new("app/api/routes.py");
        assert_eq!(nested.file_name(), "routes.py");
        assert_eq!(nested.directory(), "app/api");
    }

    #[test]
    fn test_has_decorator_matches_dotted_forms() {
        let t = TypeInfo::new("Point", TypeKind::Class)
            .with_decorators(vec!["dataclasses.dataclass".to_string()]);
        assert!(t.has_decorator("dataclass"));
        assert!(!t.has_decorator("frozen"));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(TypeKind::TypeAlias.label(), "type");
        assert_eq!(TypeKind::from_keyword("struct"), Some(TypeKind::Struct));
        assert_eq!(TypeKind::from_keyword("delegate"), None);
    }
}
