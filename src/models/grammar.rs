//! Supported source grammars and their static configuration
//!
//! Each grammar's defaults (file extensions, exclusions, framework table,
//! rendering limits) live in a `const` [`GrammarProfile`]. Nothing here is
//! mutable at runtime; callers receive a `&'static GrammarProfile`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source grammar handled by one front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    CSharp,
    Python,
    TypeScript,
}

impl Grammar {
    pub const ALL: [Grammar; 3] = [Grammar::CSharp, Grammar::Python, Grammar::TypeScript];

    pub fn profile(&self) -> &'static GrammarProfile {
        match self {
            Grammar::CSharp => &CSHARP,
            Grammar::Python => &PYTHON,
            Grammar::TypeScript => &TYPESCRIPT,
        }
    }
}

impl FromStr for Grammar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csharp" | "cs" | "c#" => Ok(Grammar::CSharp),
            "python" | "py" => Ok(Grammar::Python),
            "typescript" | "ts" | "javascript" | "js" => Ok(Grammar::TypeScript),
            _ => Err(format!("Invalid language: {}", s)),
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::CSharp => write!(f, "csharp"),
            Grammar::Python => write!(f, "python"),
            Grammar::TypeScript => write!(f, "typescript"),
        }
    }
}

/// Text encodings tried, in order, when decoding a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8, with a leading byte-order mark stripped
    Utf8,
    /// ISO-8859-1; every byte sequence decodes
    Latin1,
}

/// How the renderer groups files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// By declared namespace (explicit-namespace grammars)
    Namespace,
    /// By containing directory relative to the root
    Directory,
}

/// Static per-grammar configuration
#[derive(Debug)]
pub struct GrammarProfile {
    pub grammar: Grammar,
    /// Display label used in the title and statistics lines
    pub label: &'static str,
    pub extensions: &'static [&'static str],
    /// File-name suffixes of declaration-only artifacts, always excluded
    pub declaration_suffixes: &'static [&'static str],
    pub default_excludes: &'static [&'static str],
    /// Import prefix to display name, in display order
    pub frameworks: &'static [(&'static str, &'static str)],
    /// Characters that may follow a framework prefix in an import identifier
    pub prefix_separators: &'static [char],
    pub encodings: &'static [Encoding],
    pub grouping: Grouping,
    /// Maximum member names listed per type before `(+n more)`
    pub member_limit: usize,
    /// Maximum base types listed before `(+n)`
    pub base_limit: usize,
}

impl GrammarProfile {
    /// Whether `file_name` belongs to this grammar and is not a declaration artifact
    pub fn accepts_file(&self, file_name: &str) -> bool {
        if self
            .declaration_suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix))
        {
            return false;
        }
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self.extensions.contains(&ext),
            _ => false,
        }
    }
}

pub const CSHARP: GrammarProfile = GrammarProfile {
    grammar: Grammar::CSharp,
    label: "C#",
    extensions: &["cs"],
    declaration_suffixes: &[],
    default_excludes: &[
        "bin",
        "obj",
        ".git",
        "node_modules",
        "packages",
        "TestResults",
        ".vs",
        "Debug",
        "Release",
    ],
    frameworks: &[
        ("Microsoft.AspNetCore", "ASP.NET Core"),
        ("Microsoft.EntityFrameworkCore", "EF Core"),
        ("System.Text.Json", "System.Text.Json"),
        ("Newtonsoft.Json", "Newtonsoft.Json"),
        ("MediatR", "MediatR"),
        ("FluentValidation", "FluentValidation"),
        ("Serilog", "Serilog"),
        ("AutoMapper", "AutoMapper"),
        ("Dapper", "Dapper"),
        ("xunit", "xUnit"),
        ("Xunit", "xUnit"),
        ("NUnit", "NUnit"),
        ("Moq", "Moq"),
    ],
    prefix_separators: &['.'],
    encodings: &[Encoding::Utf8, Encoding::Latin1],
    grouping: Grouping::Namespace,
    member_limit: 5,
    base_limit: 3,
};

pub const PYTHON: GrammarProfile = GrammarProfile {
    grammar: Grammar::Python,
    label: "Python",
    extensions: &["py"],
    declaration_suffixes: &[],
    default_excludes: &[
        "__pycache__",
        ".git",
        "venv",
        ".venv",
        "env",
        ".env",
        "node_modules",
        "build",
        "dist",
        ".tox",
        ".pytest_cache",
        ".mypy_cache",
        "eggs",
        "*.egg-info",
        ".eggs",
    ],
    frameworks: &[
        ("fastapi", "FastAPI"),
        ("flask", "Flask"),
        ("django", "Django"),
        ("sqlalchemy", "SQLAlchemy"),
        ("pydantic", "Pydantic"),
        ("pytest", "pytest"),
        ("celery", "Celery"),
        ("httpx", "httpx"),
        ("aiohttp", "aiohttp"),
    ],
    prefix_separators: &['.'],
    encodings: &[Encoding::Utf8],
    grouping: Grouping::Directory,
    member_limit: 5,
    base_limit: 3,
};

pub const TYPESCRIPT: GrammarProfile = GrammarProfile {
    grammar: Grammar::TypeScript,
    label: "TypeScript",
    extensions: &["ts", "tsx", "js", "jsx"],
    declaration_suffixes: &[".d.ts"],
    default_excludes: &[
        "node_modules",
        "dist",
        "build",
        ".git",
        "coverage",
        "__tests__",
        "__mocks__",
        ".next",
        ".nuxt",
        ".output",
    ],
    frameworks: &[
        ("react", "React"),
        ("@angular", "Angular"),
        ("vue", "Vue"),
        ("next", "Next.js"),
        ("express", "Express"),
        ("fastify", "Fastify"),
        ("nestjs", "NestJS"),
        ("@nestjs", "NestJS"),
        ("typeorm", "TypeORM"),
        ("prisma", "Prisma"),
        ("@prisma", "Prisma"),
        ("zod", "Zod"),
        ("trpc", "tRPC"),
        ("@trpc", "tRPC"),
    ],
    prefix_separators: &['/', '-'],
    encodings: &[Encoding::Utf8],
    grouping: Grouping::Directory,
    member_limit: 4,
    base_limit: 3,
};
