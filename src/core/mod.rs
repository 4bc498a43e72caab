//! Core functionality: per-file extraction, tree walking and framework detection

pub mod extractor;
pub mod frameworks;
pub mod walker;

pub use extractor::{Extraction, Extractor};
pub use walker::{ExcludeSet, Walker};
