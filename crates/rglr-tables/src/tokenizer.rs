//! Tokenizer variants
//!
//! A closed enum over `{Group, External}` rather than open-ended subtyping,
//! with the three priority flags stored inline on each variant.

use serde::{Deserialize, Serialize};

use crate::dfa::GroupTable;

/// Flags shared by every tokenizer, controlling how the interpreter
/// combines results across tokenizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenizerFlags {
    /// Result depends on parse state; never cached across stacks.
    pub contextual: bool,
    /// Only runs when a higher-priority tokenizer produced a token not
    /// accepted by the current state's actions.
    pub fallback: bool,
    /// Other, lower-priority tokenizers may still run after this one even
    /// if it produces a token.
    pub extend: bool,
}

/// Index into an externally-registered tokenizer callback, resolved at
/// parse time by the engine (the table only carries the id + flags; the
/// callback itself is a host-provided `dyn` object).
pub type ExternalTokenizerId = u16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TokenizerSpec {
    /// Packed DFA table executed by the group-tokenizer interpreter.
    Group {
        table: GroupTable,
        /// Which bit of a state's `group_mask` this tokenizer occupies. A
        /// single physical [`GroupTable`] is frequently shared by several
        /// `TokenizerSpec::Group` entries (e.g. one DFA covering every
        /// keyword-like token, with each state in the grammar only
        /// enabling the subset of groups it can shift); `group_id` picks
        /// out which subset this entry walks
        group_id: u16,
        flags: TokenizerFlags,
    },
    /// Host callback over the character stream.
    External {
        id: ExternalTokenizerId,
        flags: TokenizerFlags,
    },
}

impl TokenizerSpec {
    pub fn flags(&self) -> TokenizerFlags {
        match self {
            TokenizerSpec::Group { flags, .. } => *flags,
            TokenizerSpec::External { flags, .. } => *flags,
        }
    }
}
