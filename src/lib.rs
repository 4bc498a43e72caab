//! codemap - structure maps of C#, Python and TypeScript codebases
//!
//! Walks a source tree, recognises type and member declarations per file,
//! aggregates them by namespace or directory and renders a compact map for
//! context documents. The `update` side splices rendered maps into a
//! document between sentinel markers.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;

// Re-export commonly used types
pub use crate::core::{Extraction, Extractor, Walker};
pub use error::{handle_error, try_with_recovery, CodemapError, ErrorSeverity, OptionExt, Result, ResultExt};
pub use models::{
    aggregate::AggregateModel,
    config::{DepthPolicy, Settings},
    grammar::Grammar,
    structure::{FileModel, MemberInfo, TypeInfo, TypeKind},
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
