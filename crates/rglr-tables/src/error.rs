//! Table inconsistency is a programming error, not a parse error: bad
//! tables fail loudly instead of being recovered from.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("bad table magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("unsupported table format version {found}, this runtime supports {expected}")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("table blob truncated or corrupt: {0}")]
    Corrupt(String),

    #[error("state {state} out of range (table has {count} states)")]
    UnknownState { state: u32, count: u32 },

    #[error("action references out-of-range state {state}")]
    ActionOutOfRange { state: u32 },
}
