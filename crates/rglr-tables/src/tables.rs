//! The full compiled table set: the binary blob the
//! out-of-scope grammar generator produces and this runtime loads without
//! mutation.
//!
//! The exact byte layout is a generator concern this runtime doesn't
//! own, so tables round-trip through `postcard` rather than a
//! hand-rolled byte format. A small fixed header (magic + version) is
//! kept in front of the postcard body so a corrupt or foreign blob is
//! rejected before a potentially expensive deserialize.

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::state::ParseState;
use crate::term::TermId;
use crate::tokenizer::TokenizerSpec;

const MAGIC: [u8; 4] = *b"RGLR";
const VERSION: u32 = 1;

/// A fully loaded, immutable table set. Shared (`Arc`-friendly, no
/// interior mutability) across every stack head in a parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tables {
    pub states: Box<[ParseState]>,
    pub tokenizers: Box<[TokenizerSpec]>,
    /// Term id -> display name, indexed densely
    pub tag_names: Box<[Box<str>]>,
    /// Term id -> bitmask of dialects under which the term is active.
    pub dialect_masks: Box<[u32]>,
    /// State the parser starts in.
    pub start_state: u32,
    pub eof: TermId,
    pub err: TermId,
}

impl Tables {
    pub fn state(&self, id: u32) -> Result<&ParseState, TableError> {
        self.states.get(id as usize).ok_or(TableError::UnknownState {
            state: id,
            count: self.states.len() as u32,
        })
    }

    pub fn tokenizer(&self, id: u16) -> Option<&TokenizerSpec> {
        self.tokenizers.get(id as usize)
    }

    pub fn tag_name(&self, term: TermId) -> Option<&str> {
        self.tag_names.get(term as usize).map(|s| s.as_ref())
    }

    /// Whether `term` is permitted under the active `dialect` bitmask. A
    /// term with mask `0` is treated as always-active (the common case for
    /// grammars with no dialects at all).
    pub fn allowed_under(&self, term: TermId, dialect: u32) -> bool {
        match self.dialect_masks.get(term as usize) {
            None | Some(0) => true,
            Some(mask) => mask & dialect != 0,
        }
    }

    /// Serialize to the on-disk blob format: a fixed header followed by a
    /// postcard-encoded body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        let body = postcard::to_allocvec(self).expect("table serialization should not fail");
        out.extend_from_slice(&body);
        out
    }

    /// Load a table set produced by [`Tables::to_bytes`]. Structural
    /// problems here are fatal/programming errors, not
    /// recoverable parse errors.
    pub fn from_bytes(bytes: &[u8]) -> Result<Tables, TableError> {
        if bytes.len() < 8 {
            return Err(TableError::Corrupt("blob shorter than header".into()));
        }
        let mut found = [0u8; 4];
        found.copy_from_slice(&bytes[0..4]);
        if found != MAGIC {
            return Err(TableError::BadMagic {
                expected: MAGIC,
                found,
            });
        }
        let version = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        if version != VERSION {
            return Err(TableError::UnsupportedVersion {
                expected: VERSION,
                found: version,
            });
        }
        postcard::from_bytes(&bytes[8..]).map_err(|e| TableError::Corrupt(e.to_string()))
    }
}

/// Constructs a [`Tables`] value programmatically. Exists because the real
/// generator is out of scope for this runtime — tests and
/// embedders that don't have a compiled grammar handy still need a way to
/// stand up a tiny, valid table set.
#[derive(Default)]
pub struct TablesBuilder {
    states: Vec<ParseState>,
    tokenizers: Vec<TokenizerSpec>,
    tag_names: Vec<Box<str>>,
    dialect_masks: Vec<u32>,
    start_state: u32,
    eof: TermId,
    err: TermId,
}

impl TablesBuilder {
    pub fn new() -> Self {
        Self {
            eof: crate::term::EOF,
            err: crate::term::ERR,
            ..Default::default()
        }
    }

    pub fn start_state(mut self, id: u32) -> Self {
        self.start_state = id;
        self
    }

    pub fn add_state(&mut self, state: ParseState) -> u32 {
        self.states.push(state);
        self.states.len() as u32 - 1
    }

    pub fn add_tokenizer(&mut self, spec: TokenizerSpec) -> u16 {
        self.tokenizers.push(spec);
        self.tokenizers.len() as u16 - 1
    }

    pub fn set_tag_name(&mut self, term: TermId, name: impl Into<Box<str>>) {
        let idx = term as usize;
        if self.tag_names.len() <= idx {
            self.tag_names.resize(idx + 1, Box::from(""));
        }
        self.tag_names[idx] = name.into();
    }

    pub fn build(self) -> Tables {
        Tables {
            states: self.states.into_boxed_slice(),
            tokenizers: self.tokenizers.into_boxed_slice(),
            tag_names: self.tag_names.into_boxed_slice(),
            dialect_masks: self.dialect_masks.into_boxed_slice(),
            start_state: self.start_state,
            eof: self.eof,
            err: self.err,
        }
    }
}
