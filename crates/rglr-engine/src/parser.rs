//! The GLR step loop and its builder/limits/outcome types.
//!
//! A builder assembles immutable configuration, `ParseLimits` bounds the
//! work a single `advance()` call may do, and the `Parser` itself — not a
//! separately captured snapshot — is the resumable handle: its frontier
//! and input position live in `self`, so calling `advance` again after a
//! `Paused` result simply continues.

use rglr_tables::{Action, ParseState, TermId, Tables};

use crate::error::RuntimeError;
use crate::external::{ExternalTokenizers, NoExternalTokenizers};
use crate::input::{Input, InputGap, InputStream};
use crate::recovery::{recover, RecoveryOutcome};
use crate::reuse::ReuseMap;
use crate::stack::{NodeId, StackArena};
use crate::tokenize::tokenize;
use crate::trace::{NoopTracer, Tracer};
use crate::tree::TreeSlot;

/// Bounds on a single parse: a step budget and a recursion/fork cap,
/// generalized to a multi-headed parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseLimits {
    /// Maximum number of step-loop iterations performed by one
    /// [`Parser::advance`] call before returning `Paused`
    pub max_steps: u32,
    /// Maximum number of simultaneously live heads before the lowest
    /// scoring ones are pruned
    pub max_heads: u32,
    /// Maximum recovery attempts per parse before forcing acceptance
    ///
    pub max_recovery_attempts: u32,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            max_heads: 32,
            max_recovery_attempts: 64,
        }
    }
}

impl ParseLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_steps(mut self, n: u32) -> Self {
        self.max_steps = n;
        self
    }

    pub fn max_heads(mut self, n: u32) -> Self {
        self.max_heads = n;
        self
    }

    pub fn max_recovery_attempts(mut self, n: u32) -> Self {
        self.max_recovery_attempts = n;
        self
    }
}

/// What a call to [`Parser::advance`] produced.
pub enum ParseOutcome {
    /// The parse finished; here is the resulting tree.
    Accepted(TreeSlot),
    /// The step budget ran out before the parse finished. Call `advance`
    /// again on the same `Parser` to continue — it is its own resumable
    /// handle
    Paused,
    /// A cancellation flag was observed between steps; here is a partial
    /// tree with the unconsumed remainder wrapped in an ERR node
    ///
    Cancelled(TreeSlot),
}

pub struct ParserBuilder<'t, 'i> {
    tables: &'t Tables,
    input: &'i dyn Input,
    gaps: Vec<InputGap>,
    dialect: u32,
    limits: ParseLimits,
    externals: &'i dyn ExternalTokenizers,
    reuse: Option<ReuseMap>,
}

impl<'t, 'i> ParserBuilder<'t, 'i> {
    pub fn new(tables: &'t Tables, input: &'i dyn Input) -> Self {
        Self {
            tables,
            input,
            gaps: Vec::new(),
            dialect: 0,
            limits: ParseLimits::default(),
            externals: &NoExternalTokenizers,
            reuse: None,
        }
    }

    pub fn gaps(mut self, gaps: Vec<InputGap>) -> Self {
        self.gaps = gaps;
        self
    }

    pub fn dialect(mut self, dialect: u32) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn max_steps(mut self, n: u32) -> Self {
        self.limits = self.limits.max_steps(n);
        self
    }

    pub fn externals(mut self, externals: &'i dyn ExternalTokenizers) -> Self {
        self.externals = externals;
        self
    }

    /// Supply a reuse map built from a prior parse's tree and the edits
    /// since. Consulted once per head, before tokenizing, at that head's
    /// current input position.
    pub fn reuse(mut self, reuse: ReuseMap) -> Self {
        self.reuse = Some(reuse);
        self
    }

    pub fn build(self) -> Parser<'t, 'i> {
        let mut arena = StackArena::new();
        let root = arena.push_root(self.tables.start_state, self.tables.eof);
        Parser {
            tables: self.tables,
            stream: InputStream::new(self.input, self.gaps),
            arena,
            frontier: vec![root],
            finished: Vec::new(),
            dialect: self.dialect,
            limits: self.limits,
            externals: self.externals,
            recovery_attempts_remaining: self.limits.max_recovery_attempts,
            cancelled: false,
            reuse: self.reuse,
        }
    }
}

pub struct Parser<'t, 'i> {
    tables: &'t Tables,
    stream: InputStream<'i>,
    arena: StackArena,
    frontier: Vec<NodeId>,
    finished: Vec<NodeId>,
    dialect: u32,
    limits: ParseLimits,
    externals: &'i dyn ExternalTokenizers,
    recovery_attempts_remaining: u32,
    cancelled: bool,
    reuse: Option<ReuseMap>,
}

impl<'t, 'i> Parser<'t, 'i> {
    /// Request that the parse stop at the next step boundary
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn input_pos(&self) -> usize {
        self.stream.pos
    }

    /// Run the step loop until acceptance, cancellation, or the step
    /// budget is exhausted.
    pub fn advance(&mut self) -> Result<ParseOutcome, RuntimeError> {
        self.advance_with(&mut NoopTracer)
    }

    pub fn advance_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<ParseOutcome, RuntimeError> {
        let mut steps = 0u32;
        loop {
            if self.cancelled {
                return Ok(ParseOutcome::Cancelled(self.partial_tree()));
            }
            if self.frontier.is_empty() {
                return self.finish();
            }
            if steps >= self.limits.max_steps {
                return Ok(ParseOutcome::Paused);
            }
            steps += 1;

            let idx = self.select_head();
            let head = self.frontier.remove(idx);
            let new_heads = self.step(head, tracer)?;
            for nh in new_heads {
                self.insert_with_merge(nh, tracer);
            }
            self.enforce_head_bound();
        }
    }

    /// Index of the head with the lowest `pos`, ties broken by the
    /// highest `score`
    fn select_head(&self) -> usize {
        let mut best = 0;
        for i in 1..self.frontier.len() {
            let a = self.arena.get(self.frontier[i]);
            let b = self.arena.get(self.frontier[best]);
            if a.pos < b.pos || (a.pos == b.pos && a.score > b.score) {
                best = i;
            }
        }
        best
    }

    fn insert_with_merge<T: Tracer>(&mut self, node: NodeId, tracer: &mut T) {
        let (state, pos) = {
            let n = self.arena.get(node);
            (n.state, n.pos)
        };
        if let Some(existing_idx) = self
            .frontier
            .iter()
            .position(|&id| self.arena.get(id).state == state && self.arena.get(id).pos == pos)
        {
            let existing = self.frontier[existing_idx];
            if self.arena.get(node).score > self.arena.get(existing).score {
                tracer.trace_merge(node, existing);
                self.arena.release(existing);
                self.frontier[existing_idx] = node;
            } else {
                tracer.trace_merge(existing, node);
                self.arena.release(node);
            }
        } else {
            self.frontier.push(node);
        }
    }

    /// Cap live heads at `limits.max_heads`, dropping the lowest scoring
    /// ones
    fn enforce_head_bound(&mut self) {
        while self.frontier.len() as u32 > self.limits.max_heads {
            let mut worst = 0;
            for i in 1..self.frontier.len() {
                if self.arena.get(self.frontier[i]).score < self.arena.get(self.frontier[worst]).score {
                    worst = i;
                }
            }
            let dropped = self.frontier.remove(worst);
            self.arena.release(dropped);
        }
    }

    fn step<T: Tracer>(&mut self, head: NodeId, tracer: &mut T) -> Result<Vec<NodeId>, RuntimeError> {
        let state_id = self.arena.get(head).state;
        let state = self.tables.state(state_id)?.clone();

        // The stream is shared across every live head, and a sibling fork
        // (or a previous iteration's shift) may have left it positioned
        // past this head's own `pos` — reposition before tokenizing so a
        // lower-`pos` sibling of a shift/reduce conflict never reads the
        // shifted branch's advanced offset.
        self.stream.reset(self.arena.get(head).pos, None);

        if let Some(reusable) = self.try_reuse_at(head, &state) {
            return Ok(vec![reusable]);
        }

        let term = tokenize(&state, self.tables, self.dialect, &mut self.stream, self.externals)
            .unwrap_or(self.tables.eof);

        let actions: Vec<Action> = state.actions_for(term).collect();

        if !actions.is_empty() {
            // If more than one action applies (shift + reduce, or several
            // reduces), fork once per alternative; each fork receives a
            // copy of the current buffer and parent pointer
            let mut out = Vec::with_capacity(actions.len());
            for (i, action) in actions.iter().enumerate() {
                if i > 0 {
                    self.arena.retain(head);
                    tracer.trace_fork(head as usize, head as usize);
                }
                match action {
                    Action::Shift { target } => {
                        tracer.trace_shift(head as usize, *target, term);
                        out.push(self.do_shift(head, *target, term));
                    }
                    Action::Reduce { depth, term: rt } => {
                        out.push(self.do_reduce(head, *depth, *rt, 0, tracer));
                    }
                    Action::Accept => {
                        tracer.trace_accept(head as usize);
                        self.finished.push(head);
                    }
                    Action::None => unreachable!("actions_for never yields None"),
                }
            }
            return Ok(out);
        }
        if state.has_always_reduce() {
            let Action::Reduce { depth, term: rt } = Action::decode(state.always_reduce) else {
                unreachable!()
            };
            return Ok(vec![self.do_reduce(head, depth, rt, 0, tracer)]);
        }
        if state.has_default_reduce() {
            let Action::Reduce { depth, term: rt } = Action::decode(state.default_reduce) else {
                unreachable!()
            };
            return Ok(vec![self.do_reduce(head, depth, rt, 0, tracer)]);
        }

        tracer.trace_recover(head as usize, self.stream.pos);
        match recover(
            head,
            &state,
            self.tables,
            &mut self.stream,
            &mut self.arena,
            self.externals,
            self.dialect,
            &mut self.recovery_attempts_remaining,
        )? {
            RecoveryOutcome::Continued(new_head) => {
                self.arena.release(head);
                Ok(vec![new_head])
            }
            RecoveryOutcome::ForceAccept(tree) => {
                self.arena.release(head);
                let wrapped = wrap_root(tree, self.stream.len() as u32);
                let root = self.arena.push_root(state_id, self.tables.eof);
                self.arena.set_label(root, wrapped);
                self.finished.push(root);
                tracer.trace_accept(root as usize);
                Ok(Vec::new())
            }
        }
    }

    /// Consult the reuse map for a subtree covering `head`'s current input
    /// position that the grammar can shift in wholesale in its current
    /// state, skipping tokenization and parsing of its contents entirely
    ///
    fn try_reuse_at(&mut self, head: NodeId, state: &ParseState) -> Option<NodeId> {
        let reuse = self.reuse.as_ref()?;
        // `step` has already repositioned the stream to `head`'s own `pos`.
        let pos = self.arena.get(head).pos as u32;
        let reusable = reuse.at(pos)?;
        let target = state.get_goto(reusable.tree.tag())?;
        let score = self.arena.get(head).score;
        let new_pos = reusable.post_end() as usize;
        let node = self.arena.push(head, target, new_pos, score, Some(reusable.tree.clone()), reusable.tree.tag());
        self.arena.release(head);
        self.stream.reset(new_pos, None);
        Some(node)
    }

    fn do_shift(&mut self, head: NodeId, target: u32, term: TermId) -> NodeId {
        let tok_start = self.stream.pos as u32;
        let tok_end = self.stream.token.end as u32;
        let look_ahead = self.stream.token.look_ahead as u32;
        let label = rglr_tables::is_tagged(term)
            .then(|| TreeSlot::leaf_with_look_ahead(term, tok_start, tok_end, look_ahead));
        let score = self.arena.get(head).score + 1;
        let new_pos = self.stream.token.end;
        self.stream.reset(new_pos, None);
        let node = self.arena.push(head, target, new_pos, score, label, term);
        self.arena.release(head);
        node
    }

    fn do_reduce<T: Tracer>(
        &mut self,
        head: NodeId,
        depth: u8,
        term: TermId,
        score_delta: i32,
        tracer: &mut T,
    ) -> NodeId {
        tracer.trace_reduce(head as usize, depth, term);
        let (base, mut labels) = self.arena.ancestors(head, depth);
        labels.reverse(); // innermost-first -> document order
        let children: Vec<TreeSlot> = labels.into_iter().flatten().collect();
        let start = children.first().map(|c| c.start()).unwrap_or(self.arena.get(head).pos as u32);
        let end = children.last().map(|c| c.end()).unwrap_or(self.arena.get(head).pos as u32);
        let slot = if rglr_tables::is_tagged(term) || !children.is_empty() {
            Some(TreeSlot::reduce(term, start, end, children))
        } else {
            None
        };
        let base_state = self.arena.get(base).state;
        let base_tables_state = self.tables.state(base_state).expect("valid base state");
        let target = base_tables_state
            .get_goto(term)
            .expect("goto must exist for a valid reduce");
        let pos = self.arena.get(head).pos;
        let score = self.arena.get(head).score + score_delta - 1;
        let node = self.arena.push(base, target, pos, score, slot, term);
        self.arena.release(head);
        node
    }

    fn finish(&mut self) -> Result<ParseOutcome, RuntimeError> {
        if self.finished.is_empty() {
            return Err(RuntimeError::NoViableHeads {
                pos: self.stream.pos,
            });
        }
        let mut best = self.finished[0];
        for &candidate in &self.finished[1..] {
            if self.arena.get(candidate).score > self.arena.get(best).score {
                best = candidate;
            }
        }
        let tree = self
            .arena
            .get(best)
            .label
            .clone()
            .unwrap_or_else(|| TreeSlot::leaf(self.tables.eof, 0, 0));
        let wrapped = wrap_root(tree, self.stream.len() as u32);
        Ok(ParseOutcome::Accepted(wrapped))
    }

    fn partial_tree(&self) -> TreeSlot {
        let best = self
            .frontier
            .iter()
            .copied()
            .chain(self.finished.iter().copied())
            .max_by_key(|&id| self.arena.get(id).score);
        let consumed = best.and_then(|id| self.arena.get(id).label.clone());
        let remainder_start = consumed.as_ref().map(|c| c.end()).unwrap_or(0);
        let err = TreeSlot::leaf(rglr_tables::ERR, remainder_start, self.stream.len() as u32);
        let tree = match consumed {
            Some(c) => TreeSlot::reduce(self.tables.eof, c.start(), self.stream.len() as u32, vec![c, err]),
            None => err,
        };
        wrap_root(tree, self.stream.len() as u32)
    }
}

/// Ensures the output tree's root always spans `[0, length)`.
fn wrap_root(tree: TreeSlot, length: u32) -> TreeSlot {
    if tree.start() == 0 && tree.end() == length {
        tree
    } else {
        TreeSlot::reduce(rglr_tables::EOF, 0, length, vec![tree])
    }
}

/// Applies a reduce chosen as a recovery's synthetic-insertion strategy,
/// penalizing the head's score.
pub(crate) fn apply_synthetic_reduce(head: NodeId, action: Action, arena: &mut StackArena, penalty: i32) -> NodeId {
    let Action::Reduce { depth, term } = action else {
        // `anyReduce` only ever returns a reduce (or nothing); `recover`
        // checks `is_some` before calling this.
        unreachable!("any_reduce always yields a Reduce action")
    };
    let (base, _labels) = arena.ancestors(head, depth);
    let pos = arena.get(head).pos;
    let score = arena.get(head).score + penalty;
    let node = arena.push(base, base, pos, score, None, term);
    arena.release(head);
    node
}
