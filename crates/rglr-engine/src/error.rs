//! Errors the runtime can surface
//!
//! Kept deliberately small: an incoherent compiled table is a programming
//! error in the (out-of-scope) generator, not a recoverable parse failure,
//! so it gets its own variant rather than being folded into the parse
//! result. Budget exhaustion is explicitly *not* a variant here — the step
//! loop reports it by returning a resumable [`crate::parser::ParseOutcome`]
//! handle instead of an `Err` — unlike a fuel-exhaustion error that
//! terminates the run outright, running out of budget here is always
//! recoverable by calling `advance` again.

#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    /// The compiled tables referenced a state, tokenizer, or term that
    /// doesn't exist. Always a generator bug.
    #[error(transparent)]
    Table(#[from] rglr_tables::TableError),

    /// Every live head died with no valid action and no recovery strategy
    /// produced a synthetic continuation.
    #[error("parse failed: no live heads remain at position {pos}")]
    NoViableHeads { pos: usize },
}
