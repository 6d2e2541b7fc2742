//! Term codes: numeric encoding of terminals and non-terminals.
//!
//! The low bit of a [`TermId`] marks whether the term is *tagged* — whether
//! it appears as a node in the output tree. Untagged terms exist purely as
//! stack bookkeeping and never produce a node in the output tree.

use serde::{Deserialize, Serialize};

/// A terminal or non-terminal identifier.
///
/// Bit 0 is the tagged flag; the remaining bits are a dense index assigned
/// by the (out-of-scope) table generator. The runtime never allocates new
/// term ids, it only reads them from a [`crate::tables::Tables`] blob.
pub type TermId = u16;

/// The end-of-input terminal. Always untagged.
pub const EOF: TermId = 0;

/// The error terminal produced by recovery. Always tagged, so ERR leaves
/// show up in the resulting tree
pub const ERR: TermId = 1;

/// Returns whether `term` is tagged, i.e. produces a tree node.
#[inline]
pub const fn is_tagged(term: TermId) -> bool {
    term & 1 != 0
}
