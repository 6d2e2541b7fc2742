//! Incremental reuse: matching unchanged subtrees from a prior parse
//! against an edit description so the parser can skip over them.
//!
//! Reusability is judged by a subtree's `look_ahead` (how far
//! tokenization actually inspected to build it), not its raw `end`, so a
//! subtree whose recognition peeked past its own span never gets reused
//! across an edit that touched what it peeked at. An implementation that
//! instead truncated the unchanged span at the literal edit boundary
//! would lose exactly that one character of context and wrongly reuse a
//! subtree whose lookahead crossed it; tracking `look_ahead` explicitly
//! avoids that off-by-one.

use std::rc::Rc;

use crate::tree::{Node, TreeSlot};

/// One edit, in both pre- and post-edit coordinates
/// Callers supply these sorted by `from_a` and non-overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedRange {
    pub from_a: u32,
    pub to_a: u32,
    pub from_b: u32,
    pub to_b: u32,
}

/// One unchanged span of the prior document, carrying the coordinate
/// shift to apply to anything found inside it.
#[derive(Debug, Clone, Copy)]
struct UnchangedSpan {
    from_a: u32,
    to_a: u32,
    /// `post_pos = pre_pos as i64 + delta`.
    delta: i64,
}

/// A subtree from a prior parse that survived an edit, along with the
/// position it now sits at in post-edit coordinates.
#[derive(Clone)]
pub struct Reusable {
    pub post_start: u32,
    pub tree: TreeSlot,
}

impl Reusable {
    pub fn post_end(&self) -> u32 {
        self.post_start + (self.tree.end() - self.tree.start())
    }
}

/// A lookup table from post-edit position to the subtree (if any) that
/// may be shifted in wholesale at that position
pub struct ReuseMap {
    /// Sorted by `post_start`.
    entries: Vec<Reusable>,
}

impl ReuseMap {
    /// Build a reuse map for `prior` given `changes`. `changes` must be
    /// sorted by `from_a` and non-overlapping
    pub fn build(prior: &TreeSlot, changes: &[ChangedRange]) -> Self {
        let spans = unchanged_spans(changes, prior.end());
        let mut entries = Vec::new();
        collect(prior, &spans, &mut entries);
        entries.sort_by_key(|r| r.post_start);
        ReuseMap { entries }
    }

    /// The reusable subtree beginning exactly at post-edit position
    /// `pos`, if any.
    pub fn at(&self, pos: u32) -> Option<&Reusable> {
        self.entries
            .binary_search_by_key(&pos, |r| r.post_start)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Computes the unchanged spans of the pre-edit document, each carrying
/// the coordinate delta to translate a position inside it to post-edit
/// coordinates.
fn unchanged_spans(changes: &[ChangedRange], doc_end_a: u32) -> Vec<UnchangedSpan> {
    let mut spans = Vec::new();
    let mut cursor_a = 0u32;
    let mut delta: i64 = 0;
    for c in changes {
        if c.from_a > cursor_a {
            spans.push(UnchangedSpan {
                from_a: cursor_a,
                to_a: c.from_a,
                delta,
            });
        }
        delta += (c.to_b as i64 - c.from_b as i64) - (c.to_a as i64 - c.from_a as i64);
        cursor_a = c.to_a;
    }
    if cursor_a < doc_end_a {
        spans.push(UnchangedSpan {
            from_a: cursor_a,
            to_a: doc_end_a,
            delta,
        });
    }
    spans
}

/// Walks `slot`, collecting every maximal subtree whose `[start,
/// look_ahead)` lies entirely within one unchanged span. `TreeBuffer`s are
/// atomic: a buffer-backed subtree that doesn't fit
/// wholesale is discarded rather than descended into, since its internal
/// quads aren't individually addressable as standalone subtrees. `Node`s
/// that don't fit are descended into, since each child is its own
/// independently reusable [`TreeSlot`].
fn collect(slot: &TreeSlot, spans: &[UnchangedSpan], out: &mut Vec<Reusable>) {
    if let Some(span) = containing_span(spans, slot.start(), slot.look_ahead()) {
        out.push(Reusable {
            post_start: (slot.start() as i64 + span.delta) as u32,
            tree: slot.clone(),
        });
        return;
    }
    if let TreeSlot::Node(node) = slot {
        let node: &Rc<Node> = node;
        for child in node.children.iter() {
            collect(child, spans, out);
        }
    }
}

fn containing_span(spans: &[UnchangedSpan], start: u32, look_ahead: u32) -> Option<&UnchangedSpan> {
    spans.iter().find(|s| s.from_a <= start && look_ahead <= s.to_a)
}
