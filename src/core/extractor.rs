//! Per-file extraction
//!
//! Decodes the raw bytes of one file through the grammar's encoding chain,
//! lets the front end reject invalid text, and builds the file model.
//! Nothing here touches the filesystem.

use crate::models::config::DepthPolicy;
use crate::models::grammar::{Encoding, Grammar, GrammarProfile};
use crate::models::structure::FileModel;
use crate::parsers::{front_end, FrontEnd, SkipReason};
use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Outcome of extracting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Model(FileModel),
    Skipped(SkipReason),
}

/// Extractor bound to one grammar and depth policy for a whole run
pub struct Extractor {
    front_end: Box<dyn FrontEnd>,
    profile: &'static GrammarProfile,
    depth: DepthPolicy,
}

impl Extractor {
    pub fn new(grammar: Grammar, depth: DepthPolicy) -> Self {
        Self {
            front_end: front_end(grammar),
            profile: grammar.profile(),
            depth,
        }
    }

    pub fn grammar(&self) -> Grammar {
        self.profile.grammar
    }

    pub fn depth(&self) -> DepthPolicy {
        self.depth
    }

    /// Extract the model of the file at `path` (relative to the root) from its bytes
    pub fn extract(&self, path: &str, bytes: &[u8]) -> Extraction {
        let Some(text) = decode(bytes, self.profile.encodings) else {
            return Extraction::Skipped(SkipReason::Undecodable);
        };

        if let Err(reason) = self.front_end.validate(&text) {
            return Extraction::Skipped(reason);
        }

        let model = self.front_end.extract(path, &text, self.depth);
        tracing::trace!(
            path,
            types = model.types.len(),
            members = model.member_count(),
            "extracted file"
        );
        Extraction::Model(model)
    }
}

/// One-shot extraction without keeping an [`Extractor`] around
pub fn extract(path: &str, bytes: &[u8], grammar: Grammar, depth: DepthPolicy) -> Extraction {
    Extractor::new(grammar, depth).extract(path, bytes)
}

/// Decode `bytes` with the first encoding in `chain` that accepts them
pub fn decode<'a>(bytes: &'a [u8], chain: &[Encoding]) -> Option<Cow<'a, str>> {
    chain.iter().find_map(|encoding| match encoding {
        Encoding::Utf8 => {
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            std::str::from_utf8(body).ok().map(Cow::Borrowed)
        }
        Encoding::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())),
    })
}
