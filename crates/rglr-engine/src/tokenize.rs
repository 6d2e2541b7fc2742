//! The tokenizer interpreter
//!
//! Runs a state's `skip` tokenizer to consume any leading trivia, then its
//! `tokenizers` list, in priority order, against the live [`InputStream`].
//! Skip matches are never handed to the grammar — they only advance the
//! stream position — so a state never needs a dedicated action to shift
//! past whitespace or comments. Among the real tokenizers, at most one
//! writes into `stream.token`; how several results combine is governed by
//! their `contextual`/`fallback`/`extend` flags.

use rglr_tables::{ParseState, TermId, Tables, TokenizerSpec};

use crate::external::{ExternalTokenizers, NoExternalTokenizers};
use crate::input::InputStream;

/// The outcome of running one tokenizer.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    term: TermId,
    end: usize,
}

/// Execute the packed group-DFA table starting at its state 0, tracking
/// the best (longest/overriding) accepted term as the scan proceeds.
fn run_group_dfa(
    table: &rglr_tables::GroupTable,
    group_id: u16,
    dialect: u32,
    tables: &Tables,
    stream: &mut InputStream<'_>,
) -> Option<Candidate> {
    use rglr_tables::dfa::START_STATE;

    let group_mask = 1u16 << group_id;
    let mut state = START_STATE;
    let mut pos = stream.pos;
    let mut best: Option<Candidate> = None;

    loop {
        if table.group_mask(state) & group_mask == 0 {
            break;
        }
        for (term, mask) in table.accepting(state) {
            if mask & group_mask != 0 && tables.allowed_under(term, dialect) {
                let better = match best {
                    None => true,
                    Some(b) => pos > b.end || (pos == b.end && term > b.term),
                };
                if better {
                    best = Some(Candidate { term, end: pos });
                }
            }
        }
        let Some(ch) = stream.peek((pos - stream.pos) as isize) else {
            break;
        };
        let Some(next) = table.step(state, ch as u32) else {
            break;
        };
        state = next;
        pos += ch.len_utf8();
    }

    best
}

/// Run a single tokenizer (by id) and report what it recognized, if
/// anything, without mutating `stream.token` directly — the caller
/// arbitrates between candidates from multiple tokenizers before
/// committing one via [`InputStream::accept_token`].
fn run_tokenizer(
    tokenizer_id: rglr_tables::TokenizerId,
    tables: &Tables,
    dialect: u32,
    stream: &mut InputStream<'_>,
    valid_terms: &[TermId],
    externals: &dyn ExternalTokenizers,
) -> Option<Candidate> {
    match tables.tokenizer(tokenizer_id)? {
        TokenizerSpec::Group { table, group_id, .. } => {
            run_group_dfa(table, *group_id, dialect, tables, stream)
        }
        TokenizerSpec::External { id, .. } => {
            let tokenizer = externals.get(*id)?;
            let result = tokenizer.scan(stream, valid_terms)?;
            Some(Candidate {
                term: result.term,
                end: stream.resolve_pos(stream.pos, result.end_offset),
            })
        }
    }
}

fn usable_in(state: &ParseState, term: TermId) -> bool {
    state.has_action(term).is_some() || state.get_recover(term).is_some()
}

/// Try `state.skip`, then `state.tokenizers` in priority order, honoring
/// `fallback`/`extend`. Returns the term actually accepted into
/// `stream.token`, if any.
pub fn tokenize(
    state: &ParseState,
    tables: &Tables,
    dialect: u32,
    stream: &mut InputStream<'_>,
    externals: &dyn ExternalTokenizers,
) -> Option<TermId> {
    let valid_terms: Vec<TermId> = state.actions.iter().map(|(t, _)| *t).collect();

    if let Some(skip_id) = state.skip {
        while let Some(c) = run_tokenizer(skip_id, tables, dialect, stream, &valid_terms, externals) {
            if c.end <= stream.pos {
                break;
            }
            stream.reset(c.end, None);
        }
    }

    // First pass: non-fallback tokenizers, in priority order. The first
    // one to produce a token normally wins; an `extend` tokenizer's result
    // stays provisional, letting a lower-priority tokenizer override it.
    let mut winner: Option<Candidate> = None;
    for &tok_id in &state.tokenizers {
        let flags = tables.tokenizer(tok_id).map(|t| t.flags()).unwrap_or_default();
        if flags.fallback {
            continue;
        }
        if let Some(c) = run_tokenizer(tok_id, tables, dialect, stream, &valid_terms, externals) {
            winner = Some(c);
            if !flags.extend {
                break;
            }
        }
    }

    // Second pass: if nothing usable was found, give `fallback` tokenizers
    // a chance, in priority order
    let needs_fallback = match winner {
        None => true,
        Some(c) => !usable_in(state, c.term),
    };
    if needs_fallback {
        for &tok_id in &state.tokenizers {
            let flags = tables.tokenizer(tok_id).map(|t| t.flags()).unwrap_or_default();
            if !flags.fallback {
                continue;
            }
            if let Some(c) = run_tokenizer(tok_id, tables, dialect, stream, &valid_terms, externals) {
                winner = Some(c);
                break;
            }
        }
    }

    winner.map(|c| {
        stream.accept_token(c.term, (c.end - stream.pos) as isize);
        c.term
    })
}

/// Convenience for callers (tests, single-language embedders) with no
/// external tokenizers registered.
pub fn tokenize_simple(
    state: &ParseState,
    tables: &Tables,
    dialect: u32,
    stream: &mut InputStream<'_>,
) -> Option<TermId> {
    tokenize(state, tables, dialect, stream, &NoExternalTokenizers)
}
