//! Error recovery
//!
//! Recovery is always soft: whatever else happens, the parser must
//! produce a tree. Two strategies are tried, in order, and a head always
//! survives even if both fail outright.

use rglr_tables::{ParseState, Tables, TermId};

use crate::error::RuntimeError;
use crate::external::ExternalTokenizers;
use crate::input::InputStream;
use crate::stack::{NodeId, StackArena};
use crate::tokenize::tokenize;
use crate::tree::TreeSlot;

/// Score penalty applied per skipped token during panic-mode recovery.
const SKIP_PENALTY: i32 = -3;
/// Score penalty applied for a synthetic-insertion recovery.
const SYNTHETIC_PENALTY: i32 = -5;
/// Hard cap on tokens skipped while hunting for a recovery terminal, so a
/// grammar with no matching recovery point can't spin forever.
const MAX_SKIP_SCAN: u32 = 256;

pub enum RecoveryOutcome {
    /// Recovery produced a new head to continue parsing from.
    Continued(NodeId),
    /// Every strategy failed; the parser should force-accept with an ERR
    /// node spanning the rest of the input.
    ForceAccept(TreeSlot),
}

/// Attempt to recover a head that has no applicable action at its current
/// position. `head` remains owned by the caller (its arena reference is
/// not released here even on failure).
pub fn recover(
    head: NodeId,
    state: &ParseState,
    tables: &Tables,
    stream: &mut InputStream<'_>,
    arena: &mut StackArena,
    externals: &dyn ExternalTokenizers,
    dialect: u32,
    attempts_remaining: &mut u32,
) -> Result<RecoveryOutcome, RuntimeError> {
    if *attempts_remaining == 0 {
        return Ok(force_accept(head, stream, arena));
    }

    for &(recover_term, recover_state) in state.recover.iter() {
        if let Some(outcome) = try_skip_to(
            head,
            recover_term,
            recover_state,
            state,
            tables,
            stream,
            arena,
            externals,
            dialect,
        ) {
            *attempts_remaining -= 1;
            return Ok(outcome);
        }
    }

    if let Some(action) = state.any_reduce() {
        *attempts_remaining -= 1;
        return Ok(RecoveryOutcome::Continued(crate::parser::apply_synthetic_reduce(
            head, action, arena, SYNTHETIC_PENALTY,
        )));
    }

    *attempts_remaining -= 1;
    Ok(force_accept(head, stream, arena))
}

/// Skip tokens from `stream`'s current position until one matching
/// `recover_term` appears (or the scan bound / end of input is reached),
/// inserting an ERR leaf for each skipped token.
#[allow(clippy::too_many_arguments)]
fn try_skip_to(
    head: NodeId,
    recover_term: TermId,
    recover_state: u32,
    state: &ParseState,
    tables: &Tables,
    stream: &mut InputStream<'_>,
    arena: &mut StackArena,
    externals: &dyn ExternalTokenizers,
    dialect: u32,
) -> Option<RecoveryOutcome> {
    let mut cur = head;
    let mut score = arena.get(head).score;

    for _ in 0..MAX_SKIP_SCAN {
        let start = stream.pos as u32;
        let Some(term) = tokenize(state, tables, dialect, stream, externals) else {
            return None;
        };
        if term == recover_term {
            let new = arena.push(cur, recover_state, stream.token.start, score, None, term);
            if cur != head {
                arena.release(cur);
            }
            return Some(RecoveryOutcome::Continued(new));
        }
        let end = stream.token.end as u32;
        score += SKIP_PENALTY;
        let leaf = rglr_tables::is_tagged(term).then(|| TreeSlot::leaf(rglr_tables::ERR, start, end));
        let next = arena.push(cur, state_for_self(arena, cur), end as usize, score, leaf, term);
        if cur != head {
            arena.release(cur);
        }
        cur = next;
        stream.reset(end as usize, None);
    }
    if cur != head {
        arena.release(cur);
    }
    None
}

fn state_for_self(arena: &StackArena, node: NodeId) -> u32 {
    arena.get(node).state
}

/// Every recovery strategy is exhausted: wrap whatever was already built
/// under an ERR node spanning the remainder of the input and call it
/// accepted
fn force_accept(head: NodeId, stream: &InputStream<'_>, arena: &StackArena) -> RecoveryOutcome {
    let node = arena.get(head);
    let err_start = node.pos as u32;
    let err_end = stream.len() as u32;
    let err_leaf = TreeSlot::leaf(rglr_tables::ERR, err_start, err_end);
    let tree = match node.label {
        Some(ref existing) => TreeSlot::reduce(
            rglr_tables::EOF,
            existing.start(),
            err_end,
            vec![existing.clone(), err_leaf],
        ),
        None => err_leaf,
    };
    RecoveryOutcome::ForceAccept(tree)
}

#[cfg(test)]
mod recovery_tests {
    use super::*;
    use crate::external::NoExternalTokenizers;
    use rglr_tables::TablesBuilder;

    #[test]
    fn force_accept_wraps_remaining_input_in_err() {
        let mut arena = StackArena::new();
        let root = arena.push_root(0, rglr_tables::EOF);
        let tables = TablesBuilder::new().build();
        let stream = InputStream::new("abc", vec![]);
        let outcome = force_accept(root, &stream, &arena);
        match outcome {
            RecoveryOutcome::ForceAccept(tree) => {
                assert_eq!(tree.start(), 0);
                assert_eq!(tree.end(), 3);
                assert_eq!(tree.tag(), rglr_tables::ERR);
            }
            _ => panic!("expected ForceAccept"),
        }
        let _ = (tables, NoExternalTokenizers);
    }
}
