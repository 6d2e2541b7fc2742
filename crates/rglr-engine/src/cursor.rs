//! The context/cursor API
//!
//! A [`Cursor`] resolves a position to the innermost node covering it and
//! walks the tree in document order, the same job a wrapper over a
//! `tree_sitter::TreeCursor` would do — but here there is no single raw
//! cursor type to wrap, since a [`TreeSlot`] is one of two backing shapes
//! (`tree.rs`). [`Loc`] is the thing that unifies them: it names a node
//! relative to whichever shape it came from (a `Node` child index, or a
//! quad index inside a shared `TreeBuffer`), so the cursor's navigation
//! logic never has to branch on representation.

use std::rc::Rc;

use rglr_tables::{is_tagged, TermId};

use crate::tree::{Node, TreeBuffer, TreeSlot};

/// One position in the tree, however it's backed.
#[derive(Clone)]
enum Loc {
    Node(Rc<Node>),
    /// A subtree rooted at `buf.quads[index]`.
    Buffer { buf: Rc<TreeBuffer>, index: usize },
}

impl Loc {
    fn from_slot(slot: &TreeSlot) -> Loc {
        match slot {
            TreeSlot::Node(n) => Loc::Node(n.clone()),
            TreeSlot::Buffer(b) => Loc::Buffer { buf: b.clone(), index: 0 },
        }
    }

    fn tag(&self) -> TermId {
        match self {
            Loc::Node(n) => n.tag,
            Loc::Buffer { buf, index } => buf.quads[*index].tag,
        }
    }

    fn start(&self) -> u32 {
        match self {
            Loc::Node(n) => n.start,
            Loc::Buffer { buf, index } => buf.quads[*index].start,
        }
    }

    fn end(&self) -> u32 {
        match self {
            Loc::Node(n) => n.end,
            Loc::Buffer { buf, index } => buf.quads[*index].end,
        }
    }

    fn look_ahead(&self) -> u32 {
        match self {
            Loc::Node(n) => n.look_ahead,
            Loc::Buffer { buf, index } => buf.quads[*index].look_ahead,
        }
    }

    fn child_count(&self) -> usize {
        match self {
            Loc::Node(n) => n.children.len(),
            Loc::Buffer { buf, index } => buf.quads[*index].child_count as usize,
        }
    }

    fn child(&self, i: usize) -> Loc {
        match self {
            Loc::Node(n) => Loc::from_slot(&n.children[i]),
            Loc::Buffer { buf, index } => {
                let child_index = buf.children_of(*index)[i];
                Loc::Buffer {
                    buf: buf.clone(),
                    index: child_index,
                }
            }
        }
    }

    /// Whether `pos` falls inside this node's span. Zero-width nodes (an
    /// empty reduction) only contain the single position at their start.
    fn contains_pos(&self, pos: u32) -> bool {
        if self.start() == self.end() {
            pos == self.start()
        } else {
            self.start() <= pos && pos < self.end()
        }
    }
}

/// Walks a parsed tree, resolving positions and iterating tagged nodes in
/// document order Untagged container nodes (anonymous
/// groupings, repeat-rule scaffolding) are present in the backing tree but
/// never surfaced as a cursor position in their own right.
pub struct Cursor {
    /// Ancestor chain from the tree root (index 0) to the current node
    /// (the last entry).
    path: Vec<Loc>,
    /// `indices[i]` is `path[i + 1]`'s child index within `path[i]`.
    indices: Vec<usize>,
}

impl Cursor {
    /// A cursor positioned at the root of `tree`.
    pub fn new(tree: &TreeSlot) -> Self {
        Self {
            path: vec![Loc::from_slot(tree)],
            indices: Vec::new(),
        }
    }

    /// The term of the node the cursor is on.
    pub fn node_type(&self) -> TermId {
        self.current().tag()
    }

    pub fn is_tagged(&self) -> bool {
        is_tagged(self.node_type())
    }

    pub fn start(&self) -> u32 {
        self.current().start()
    }

    pub fn end(&self) -> u32 {
        self.current().end()
    }

    /// How many ancestors separate the current node from the tree root.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    fn current(&self) -> &Loc {
        self.path.last().expect("cursor path is never empty")
    }

    /// Move to the current node's first child. Returns `false` (cursor
    /// unchanged) if the current node is a leaf.
    pub fn goto_first_child(&mut self) -> bool {
        let cur = self.current().clone();
        if cur.child_count() == 0 {
            return false;
        }
        self.path.push(cur.child(0));
        self.indices.push(0);
        true
    }

    /// Move to the current node's next sibling. Returns `false` (cursor
    /// unchanged) at the last child, or at the root.
    pub fn goto_next_sibling(&mut self) -> bool {
        if self.path.len() < 2 {
            return false;
        }
        let parent = self.path[self.path.len() - 2].clone();
        let idx = *self.indices.last().expect("non-root node has a recorded child index");
        let next_idx = idx + 1;
        if next_idx >= parent.child_count() {
            return false;
        }
        let next = parent.child(next_idx);
        *self.path.last_mut().unwrap() = next;
        *self.indices.last_mut().unwrap() = next_idx;
        true
    }

    /// Move to the current node's parent. Returns `false` (cursor
    /// unchanged) at the root.
    pub fn goto_parent(&mut self) -> bool {
        if self.path.len() < 2 {
            return false;
        }
        self.path.pop();
        self.indices.pop();
        true
    }

    /// One step of a preorder (document-order) depth-first walk: first
    /// child, else next sibling, else the nearest ancestor with an
    /// unvisited next sibling. Returns `false` once the walk from the
    /// cursor's current position is exhausted.
    pub fn advance_preorder(&mut self) -> bool {
        if self.goto_first_child() {
            return true;
        }
        loop {
            if self.goto_next_sibling() {
                return true;
            }
            if !self.goto_parent() {
                return false;
            }
        }
    }

    /// Advance in document order until landing on a tagged node, skipping
    /// untagged containers Returns `false` once the walk is exhausted.
    pub fn next_tagged(&mut self) -> bool {
        while self.advance_preorder() {
            if self.is_tagged() {
                return true;
            }
        }
        false
    }

    /// Reposition the cursor to the innermost *tagged* node covering
    /// `pos`, descending from the root. Returns `false` (cursor
    /// left at the root) if `pos` falls outside the tree's span.
    pub fn goto(&mut self, pos: u32) -> bool {
        self.path.truncate(1);
        self.indices.clear();
        if !self.current().contains_pos(pos) {
            return false;
        }
        loop {
            let cur = self.current().clone();
            let mut descended = false;
            for i in 0..cur.child_count() {
                let child = cur.child(i);
                if child.contains_pos(pos) {
                    self.path.push(child);
                    self.indices.push(i);
                    descended = true;
                    break;
                }
            }
            if !descended {
                break;
            }
        }
        while !self.is_tagged() && self.goto_parent() {}
        true
    }

    /// Furthest position tokenization inspected while building the current
    /// node's subtree
    pub fn look_ahead(&self) -> u32 {
        self.current().look_ahead()
    }
}
