// File: src/diagnostics.rs
use crate::core::types::RhymeOrder;
use std::time::{Duration, Instant};

/// Events emitted while building or querying the rhyme index.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic<'a> {
    /// One order of the index was built.
    OrderBuilt {
        order: RhymeOrder,
        keys: usize,
        words: usize,
    },
    /// A query key was derived for one of the word's variants.
    QueryKey {
        word: &'a str,
        order: RhymeOrder,
        key: &'a str,
    },
    /// The index holds nothing at this order.
    NoRhymesAtOrder { order: RhymeOrder },
    /// A key matched a group of this many words (before self-exclusion).
    Candidates { order: RhymeOrder, count: usize },
    /// A timed phase finished.
    PhaseFinished { phase: &'static str, elapsed: Duration },
    /// A saved index was loaded.
    Loaded {
        entries: usize,
        orders: usize,
    },
}

/// Receiver for diagnostics, passed explicitly into build and query calls.
///
/// Implementations must be usable from several threads at once since
/// read-only queries can run in parallel.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: Diagnostic<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _event: Diagnostic<'_>) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    profile: bool,
}

impl TracingSink {
    pub fn new() -> Self {
        Self { profile: false }
    }

    /// Phase timings are reported at `info` instead of `debug`.
    pub fn profiling() -> Self {
        Self { profile: true }
    }
}

impl DiagnosticSink for TracingSink {
    fn record(&self, event: Diagnostic<'_>) {
        match event {
            Diagnostic::OrderBuilt { order, keys, words } => {
                tracing::debug!(order, keys, words, "order built");
            }
            Diagnostic::QueryKey { word, order, key } => {
                tracing::debug!(word, order, key, "query key");
            }
            Diagnostic::NoRhymesAtOrder { order } => {
                tracing::debug!(order, "no rhymes of this order present");
            }
            Diagnostic::Candidates { order, count } => {
                tracing::debug!(order, count, "candidates");
            }
            Diagnostic::PhaseFinished { phase, elapsed } => {
                let micros = elapsed.as_micros() as u64;
                if self.profile {
                    tracing::info!(phase, micros, "phase finished");
                } else {
                    tracing::debug!(phase, micros, "phase finished");
                }
            }
            Diagnostic::Loaded { entries, orders } => {
                tracing::debug!(entries, orders, "loaded rhyme index");
            }
        }
    }
}

/// Scoped timer: reports `PhaseFinished` when dropped, on every exit path.
pub struct PhaseTimer<'a> {
    phase: &'static str,
    started: Instant,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> PhaseTimer<'a> {
    pub fn start(phase: &'static str, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            phase,
            started: Instant::now(),
            sink,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        self.sink.record(Diagnostic::PhaseFinished {
            phase: self.phase,
            elapsed: self.started.elapsed(),
        });
    }
}
