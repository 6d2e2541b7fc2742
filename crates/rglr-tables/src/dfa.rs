//! Packed group-DFA table for the [group tokenizer](crate::tokenizer)
//!
//!
//! The table is a flat `u16` array addressed by *word* index, with
//! offsets computed from counts rather than stored separately — every
//! state's layout is computed from three leading words instead of a
//! separate offset table:
//!
//! ```text
//! data[state]     = group_mask   (bitmask of token groups reachable here)
//! data[state + 1] = acc_end      (end, exclusive, of the accepting-entry region)
//! data[state + 2] = edge_count   (number of outgoing edges)
//! data[state + 3 .. acc_end]            = accepting entries: (term, mask) pairs
//! data[acc_end .. acc_end + edge_count*3] = edges: (from, to_exclusive, next_state)
//! ```
//!
//! The next state's record begins immediately after the last edge word.
//! Edge bounds are `u16` code units, so characters above `U+FFFF` never
//! match a group-DFA edge (they fall through to external tokenizers, which
//! see the full `u32` scalar value) — an explicit, documented scope
//! reduction rather than a silent truncation bug.

use serde::{Deserialize, Serialize};

use crate::term::TermId;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GroupTable {
    data: Box<[u16]>,
}

/// State index 0 is always the DFA's start state.
pub const START_STATE: usize = 0;

impl GroupTable {
    pub fn new(data: Box<[u16]>) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn group_mask(&self, state: usize) -> u16 {
        self.data[state]
    }

    #[inline]
    fn acc_end(&self, state: usize) -> usize {
        self.data[state + 1] as usize
    }

    #[inline]
    fn edge_count(&self, state: usize) -> usize {
        self.data[state + 2] as usize
    }

    /// Accepting `(term, group_mask)` pairs for `state`.
    pub fn accepting(&self, state: usize) -> impl Iterator<Item = (TermId, u16)> + '_ {
        let acc_end = self.acc_end(state);
        self.data[state + 3..acc_end]
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }

    /// Outgoing edges for `state`, sorted by `from`.
    fn edges(&self, state: usize) -> &[u16] {
        let acc_end = self.acc_end(state);
        let n = self.edge_count(state);
        &self.data[acc_end..acc_end + n * 3]
    }

    /// Word offset immediately past `state`'s record — where the next
    /// state's record begins.
    pub fn next_state_offset(&self, state: usize) -> usize {
        let acc_end = self.acc_end(state);
        acc_end + self.edge_count(state) * 3
    }

    /// Follow the outgoing edge matching `ch`, if any. Binary search over
    /// edges sorted by `from`; ranges are half-open `[from, to_exclusive)`.
    pub fn step(&self, state: usize, ch: u32) -> Option<usize> {
        let ch16 = if ch > u16::MAX as u32 {
            return None;
        } else {
            ch as u16
        };
        let edges = self.edges(state);
        let n = edges.len() / 3;
        // Find the last edge whose `from` is <= ch16, then check containment.
        let idx = edges
            .chunks_exact(3)
            .take(n)
            .rposition(|e| e[0] <= ch16)?;
        let edge = &edges[idx * 3..idx * 3 + 3];
        if ch16 < edge[1] {
            Some(edge[2] as usize)
        } else {
            None
        }
    }
}

/// Builds a [`GroupTable`] from structured states, computing the packed
/// offsets so tests and the (out-of-scope) generator don't have to.
#[derive(Default)]
pub struct GroupTableBuilder {
    states: Vec<BuilderState>,
}

#[derive(Default)]
struct BuilderState {
    group_mask: u16,
    accepting: Vec<(TermId, u16)>,
    /// `(from, to_exclusive, next_state_index)`, where `next_state_index`
    /// refers to the index among `states`, resolved to a word offset at
    /// [`GroupTableBuilder::build`] time.
    edges: Vec<(u16, u16, usize)>,
}

impl GroupTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new state, returning its index for use as an edge target.
    pub fn add_state(&mut self, group_mask: u16) -> usize {
        self.states.push(BuilderState {
            group_mask,
            accepting: Vec::new(),
            edges: Vec::new(),
        });
        self.states.len() - 1
    }

    pub fn accept(&mut self, state: usize, term: TermId, mask: u16) {
        self.states[state].accepting.push((term, mask));
    }

    pub fn edge(&mut self, state: usize, from: u16, to_exclusive: u16, next: usize) {
        self.states[state].edges.push((from, to_exclusive, next));
    }

    pub fn build(mut self) -> GroupTable {
        for s in &mut self.states {
            s.edges.sort_by_key(|(from, ..)| *from);
        }

        // First pass: compute each state's word offset.
        let mut offsets = vec![0usize; self.states.len()];
        let mut cursor = 0usize;
        for (i, s) in self.states.iter().enumerate() {
            offsets[i] = cursor;
            cursor += 3 + s.accepting.len() * 2 + s.edges.len() * 3;
        }

        let mut data = Vec::with_capacity(cursor);
        for s in &self.states {
            let acc_end = data.len() + 3 + s.accepting.len() * 2;
            data.push(s.group_mask);
            data.push(acc_end as u16);
            data.push(s.edges.len() as u16);
            for (term, mask) in &s.accepting {
                data.push(*term);
                data.push(*mask);
            }
            for (from, to, next) in &s.edges {
                data.push(*from);
                data.push(*to);
                data.push(offsets[*next] as u16);
            }
        }

        GroupTable::new(data.into_boxed_slice())
    }
}
