//! Execution tracing for the GLR step loop.
//!
//! A zero-cost tracer split: a generic `Tracer` parameter lets
//! [`crate::parser::Parser`] call trace hooks unconditionally, and
//! `NoopTracer`'s empty `#[inline(always)]` bodies compile away completely
//! when no tracing is requested. `PrintTracer` mirrors it for ad hoc
//! debugging, collecting lines instead of printing eagerly so a caller can
//! decide whether to show them.

/// Instrumentation hooks for one parse run Each
/// method corresponds to a specific step-loop event; implementations that
/// don't care about a given event leave it empty.
pub trait Tracer {
    /// A head shifted `term` and moved to `state`.
    fn trace_shift(&mut self, head: usize, state: u32, term: u16) {
        let _ = (head, state, term);
    }
    /// A head performed a reduce of `depth` symbols down to `term`.
    fn trace_reduce(&mut self, head: usize, depth: u8, term: u16) {
        let _ = (head, depth, term);
    }
    /// A head forked into `new_head` because more than one action applied.
    fn trace_fork(&mut self, head: usize, new_head: usize) {
        let _ = (head, new_head);
    }
    /// Two heads converged onto the same `(state, pos)` and were merged.
    fn trace_merge(&mut self, survivor: usize, absorbed: usize) {
        let _ = (survivor, absorbed);
    }
    /// A head died with no valid action.
    fn trace_die(&mut self, head: usize) {
        let _ = head;
    }
    /// Error recovery kicked in at `pos`.
    fn trace_recover(&mut self, head: usize, pos: usize) {
        let _ = (head, pos);
    }
    /// One head reached an accepting configuration.
    fn trace_accept(&mut self, head: usize) {
        let _ = head;
    }
}

/// Tracer that does nothing; every call is optimized away.
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Tracer that records one line of text per event, for debugging a parse
/// interactively.
#[derive(Default)]
pub struct PrintTracer {
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }
}

impl Tracer for PrintTracer {
    fn trace_shift(&mut self, head: usize, state: u32, term: u16) {
        self.lines
            .push(format!("head {head}: shift term {term} -> state {state}"));
    }

    fn trace_reduce(&mut self, head: usize, depth: u8, term: u16) {
        self.lines
            .push(format!("head {head}: reduce {depth} symbols -> term {term}"));
    }

    fn trace_fork(&mut self, head: usize, new_head: usize) {
        self.lines.push(format!("head {head}: fork -> head {new_head}"));
    }

    fn trace_merge(&mut self, survivor: usize, absorbed: usize) {
        self.lines
            .push(format!("head {absorbed}: merged into head {survivor}"));
    }

    fn trace_die(&mut self, head: usize) {
        self.lines.push(format!("head {head}: died"));
    }

    fn trace_recover(&mut self, head: usize, pos: usize) {
        self.lines
            .push(format!("head {head}: recovering at position {pos}"));
    }

    fn trace_accept(&mut self, head: usize) {
        self.lines.push(format!("head {head}: accept"));
    }
}
