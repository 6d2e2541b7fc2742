//! The GLR runtime: tokenizer interpreter, graph-structured stack, step
//! loop, error recovery, incremental reuse, and the tree/cursor API that
//! consumers read results through. Executes the tables `rglr-tables`
//! describes; builds no tables of its own.

pub mod cursor;
pub mod error;
pub mod external;
pub mod input;
pub mod parser;
pub mod recovery;
pub mod reuse;
pub mod sexp;
pub mod stack;
pub mod tokenize;
pub mod trace;
pub mod tree;

pub use cursor::Cursor;
pub use error::RuntimeError;
pub use external::{ExternalResult, ExternalTokenizer, ExternalTokenizers, NoExternalTokenizers};
pub use input::{Input, InputGap, InputStream};
pub use parser::{ParseLimits, ParseOutcome, Parser, ParserBuilder};
pub use reuse::{ChangedRange, Reusable, ReuseMap};
pub use sexp::to_sexp;
pub use trace::{NoopTracer, PrintTracer, Tracer};
pub use tree::{Node, TreeBuffer, TreeSlot};
