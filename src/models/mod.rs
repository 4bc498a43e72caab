//! Data models and structures for codemap

pub mod aggregate;
pub mod config;
pub mod grammar;
pub mod structure;

pub use aggregate::{AggregateModel, SkippedFile, Stats};
pub use config::{DepthPolicy, OutputFormat, PartialSettings, Settings};
pub use grammar::{Encoding, Grammar, GrammarProfile, Grouping};
pub use structure::{FileModel, MemberInfo, MemberKind, TypeInfo, TypeKind};
