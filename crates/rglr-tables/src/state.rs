//! `ParseState`: per-state action, goto, recovery, and default-reduce data
//!

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::term::TermId;

/// Sentinel meaning "no always-reduce / default-reduce configured".
pub const NO_REDUCE: i32 = -1;

/// Index into [`crate::tables::Tables::tokenizers`].
pub type TokenizerId = u16;

/// An immutable, table-owned parser state.
///
/// All lookup methods perform an associative search over a small sorted
/// array; states rarely have more than a few dozen distinct actions, so a
/// binary search (falling back to linear scan for very small arrays) beats
/// any hash map in practice and keeps the table trivially serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseState {
    /// Sorted by terminal id.
    pub actions: Box<[(TermId, i32)]>,
    /// Sorted by non-terminal id.
    pub goto: Box<[(TermId, u32)]>,
    /// Sorted by terminal id. Used only during error recovery.
    pub recover: Box<[(TermId, u32)]>,
    /// Reduce applied unconditionally before tokenization, unless a shift
    /// for the current token also applies
    pub always_reduce: i32,
    /// Reduce applied when no action matches the token but this state
    /// still permits falling back to a default production.
    pub default_reduce: i32,
    /// Tokenizer used for whitespace/comments; `None` if this state has no
    /// skippable trivia.
    pub skip: Option<TokenizerId>,
    /// Tokenizers tried in priority order for this state.
    pub tokenizers: Box<[TokenizerId]>,
}

impl ParseState {
    /// `actions[term]`, by binary search.
    pub fn has_action(&self, term: TermId) -> Option<Action> {
        self.actions
            .binary_search_by_key(&term, |(t, _)| *t)
            .ok()
            .map(|i| Action::decode(self.actions[i].1))
    }

    /// All actions registered for `term`. A state may legitimately list more
    /// than one action for the same terminal (shift/reduce or reduce/reduce
    /// conflicts); `has_action` above only ever finds one entry because the
    /// binary search assumes the common unambiguous case. Conflicting
    /// states must instead search linearly, since `actions` is sorted by
    /// term but entries sharing a term are adjacent and not otherwise
    /// ordered.
    pub fn actions_for(&self, term: TermId) -> impl Iterator<Item = Action> + '_ {
        let start = self.actions.partition_point(|(t, _)| *t < term);
        self.actions[start..]
            .iter()
            .take_while(move |(t, _)| *t == term)
            .map(|(_, raw)| Action::decode(*raw))
    }

    pub fn get_goto(&self, nonterminal: TermId) -> Option<u32> {
        self.goto
            .binary_search_by_key(&nonterminal, |(t, _)| *t)
            .ok()
            .map(|i| self.goto[i].1)
    }

    pub fn get_recover(&self, term: TermId) -> Option<u32> {
        self.recover
            .binary_search_by_key(&term, |(t, _)| *t)
            .ok()
            .map(|i| self.recover[i].1)
    }

    /// Any reduce available in this state, used as the synthetic-insertion
    /// strategy during panic-mode recovery
    pub fn any_reduce(&self) -> Option<Action> {
        if self.always_reduce >= 0 {
            return Some(Action::decode(self.always_reduce));
        }
        self.actions
            .iter()
            .map(|(_, raw)| Action::decode(*raw))
            .find(|a| a.is_reduce())
    }

    pub fn has_always_reduce(&self) -> bool {
        self.always_reduce >= 0
    }

    pub fn has_default_reduce(&self) -> bool {
        self.default_reduce >= 0
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;

    fn state() -> ParseState {
        ParseState {
            actions: Box::new([(2, Action::Shift { target: 5 }.encode()), (4, Action::Reduce { depth: 1, term: 10 }.encode())]),
            goto: Box::new([(10, 7)]),
            recover: Box::new([(6, 3)]),
            always_reduce: NO_REDUCE,
            default_reduce: NO_REDUCE,
            skip: None,
            tokenizers: Box::new([]),
        }
    }

    #[test]
    fn looks_up_shift() {
        assert_eq!(state().has_action(2), Some(Action::Shift { target: 5 }));
    }

    #[test]
    fn missing_action_is_none() {
        assert_eq!(state().has_action(99), None);
    }

    #[test]
    fn goto_lookup() {
        assert_eq!(state().get_goto(10), Some(7));
    }

    #[test]
    fn recover_lookup() {
        assert_eq!(state().get_recover(6), Some(3));
    }

    #[test]
    fn any_reduce_prefers_always_reduce() {
        let mut s = state();
        s.always_reduce = Action::Reduce { depth: 0, term: 1 }.encode();
        assert_eq!(s.any_reduce(), Some(Action::Reduce { depth: 0, term: 1 }));
    }

    #[test]
    fn any_reduce_falls_back_to_actions() {
        assert_eq!(
            state().any_reduce(),
            Some(Action::Reduce { depth: 1, term: 10 })
        );
    }

    #[test]
    fn actions_for_returns_all_conflicting_entries() {
        let s = ParseState {
            actions: Box::new([
                (2, Action::Shift { target: 5 }.encode()),
                (2, Action::Reduce { depth: 1, term: 8 }.encode()),
                (3, Action::Shift { target: 1 }.encode()),
            ]),
            goto: Box::new([]),
            recover: Box::new([]),
            always_reduce: NO_REDUCE,
            default_reduce: NO_REDUCE,
            skip: None,
            tokenizers: Box::new([]),
        };
        let found: Vec<_> = s.actions_for(2).collect();
        assert_eq!(found.len(), 2);
    }
}
