//! Term codes, packed action encoding, per-state tables, and the binary
//! table format that the GLR engine (`rglr-engine`) executes against.
//!
//! This crate holds data only: no tokenization or parsing logic lives
//! here, only the read-only shapes a (generator-produced) compiled grammar
//! takes at runtime.

pub mod action;
pub mod dfa;
pub mod error;
pub mod state;
pub mod tables;
pub mod term;
pub mod tokenizer;

pub use action::Action;
pub use dfa::GroupTable;
pub use error::TableError;
pub use state::{ParseState, TokenizerId, NO_REDUCE};
pub use tables::{Tables, TablesBuilder};
pub use term::{is_tagged, TermId, EOF, ERR};
pub use tokenizer::{ExternalTokenizerId, TokenizerFlags, TokenizerSpec};
