//! Grammar front ends
//!
//! Each supported grammar has a front end that turns decoded source text
//! into a [`FileModel`] using lightweight pattern matching over a masked
//! copy of the file. No front end builds a syntax tree of its own.

pub mod csharp;
pub mod python;
pub mod rules;
pub mod scan;
pub mod typescript;

pub use csharp::CSharpFrontEnd;
pub use python::PythonFrontEnd;
pub use rules::{Declaration, HeadRule, RegexRule};
pub use typescript::TypeScriptFrontEnd;

use crate::models::config::DepthPolicy;
use crate::models::grammar::Grammar;
use crate::models::structure::FileModel;
use std::fmt;

/// Why a file produced no model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No encoding in the grammar's chain could decode the bytes
    Undecodable,
    /// The grammar's syntax check rejected the file
    InvalidSyntax { line: Option<usize> },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Undecodable => write!(f, "could not decode file contents"),
            SkipReason::InvalidSyntax { line: Some(line) } => {
                write!(f, "invalid syntax near line {}", line)
            }
            SkipReason::InvalidSyntax { line: None } => write!(f, "invalid syntax"),
        }
    }
}

/// Per-grammar extraction of declared structure from source text
pub trait FrontEnd: Send + Sync {
    fn grammar(&self) -> Grammar;

    /// Reject text the grammar cannot map; accepts everything by default
    fn validate(&self, _text: &str) -> Result<(), SkipReason> {
        Ok(())
    }

    /// Build the model of one file. `path` is relative to the scan root.
    fn extract(&self, path: &str, text: &str, depth: DepthPolicy) -> FileModel;
}

/// Front end for `grammar`
pub fn front_end(grammar: Grammar) -> Box<dyn FrontEnd> {
    match grammar {
        Grammar::CSharp => Box::new(CSharpFrontEnd),
        Grammar::Python => Box::new(PythonFrontEnd),
        Grammar::TypeScript => Box::new(TypeScriptFrontEnd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_end_dispatch() {
        for grammar in Grammar::ALL {
            assert_eq!(front_end(grammar).grammar(), grammar);
        }
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::InvalidSyntax { line: Some(3) }.to_string(),
            "invalid syntax near line 3"
        );
        assert_eq!(SkipReason::Undecodable.to_string(), "could not decode file contents");
    }
}
