//! Error handling for codemap
//!
//! Error types, the result alias, and context utilities. Per-file problems
//! never surface here as hard errors; see `core::extractor::Extraction`.

pub mod context;
pub mod types;

pub use context::{handle_error, try_with_recovery, OptionExt, ResultExt};
pub use types::{CodemapError, ErrorSeverity, Result};
