//! External (host-implemented) tokenizers
//!
//! Not every token can be recognized by a packed group-DFA (indentation
//! sensitivity, nested comments, nothing-but-lookahead heuristics). The
//! compiled tables name these by [`rglr_tables::ExternalTokenizerId`]; the
//! host supplies the matching behavior through this trait, the same split
//! a bytecode VM draws between its interpreted opcodes and host-native
//! builtins.

use crate::input::InputStream;

/// One recognition attempt's outcome.
pub struct ExternalResult {
    pub term: rglr_tables::TermId,
    /// Offset from the stream's current `pos` marking the end of the
    /// recognized token.
    pub end_offset: isize,
}

/// A host-provided tokenizer referenced from the compiled tables by id.
pub trait ExternalTokenizer {
    /// Attempt to recognize a token starting at the stream's current
    /// position. `valid_terms` lists which terms are acceptable in the
    /// current parse state, letting a tokenizer skip work for terms that
    /// could never be shifted anyway
    fn scan(
        &self,
        stream: &mut InputStream<'_>,
        valid_terms: &[rglr_tables::TermId],
    ) -> Option<ExternalResult>;
}

/// Looks up a host tokenizer by id. Implemented by the embedder; the
/// runtime never constructs tokenizers itself
pub trait ExternalTokenizers {
    fn get(&self, id: rglr_tables::ExternalTokenizerId) -> Option<&dyn ExternalTokenizer>;
}

/// An embedder with no external tokenizers at all.
pub struct NoExternalTokenizers;

impl ExternalTokenizers for NoExternalTokenizers {
    fn get(&self, _id: rglr_tables::ExternalTokenizerId) -> Option<&dyn ExternalTokenizer> {
        None
    }
}
