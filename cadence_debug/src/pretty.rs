// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable one-line-per-event output.

use std::io::{self, Write};

use cadence_core::trace::{
    DeliveredEvent, DispatchBeginEvent, DispatchEndEvent, FpsComputedEvent, ListenerDroppedEvent,
    TaskMatchedEvent, TraceSink,
};

/// A [`TraceSink`] that writes one formatted line per event.
///
/// Write errors are swallowed: diagnostics must never disturb the dispatch
/// cycle they observe.
#[derive(Debug)]
pub struct PrettyPrintSink<W: Write> {
    out: W,
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: core::fmt::Arguments<'_>) {
        _ = writeln!(self.out, "{args}");
    }
}

/// Formats a timestamp as fractional milliseconds for log lines.
fn ms(nanos: u64) -> f64 {
    nanos as f64 / 1_000_000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        self.line(format_args!(
            "[{:>12.3}ms] dispatch begin: {} live, {} due group(s)",
            ms(e.now.nanos()),
            e.live_listeners,
            e.due_groups
        ));
    }

    fn on_task_matched(&mut self, e: &TaskMatchedEvent) {
        self.line(format_args!(
            "  task {:?}: {} layer(s), {} due listener(s)",
            e.task, e.matched_layers, e.due_listeners
        ));
    }

    fn on_fps_computed(&mut self, e: &FpsComputedEvent) {
        self.line(format_args!("  task {:?}: {:.2} fps", e.task, e.fps));
    }

    fn on_delivered(&mut self, e: &DeliveredEvent) {
        self.line(format_args!(
            "    -> {:?} received {:.2} fps",
            e.key, e.fps
        ));
    }

    fn on_listener_dropped(&mut self, e: &ListenerDroppedEvent) {
        self.line(format_args!(
            "    !! {:?} unreachable, subscription dropped (task {:?})",
            e.key, e.task
        ));
    }

    fn on_dispatch_end(&mut self, e: &DispatchEndEvent) {
        self.line(format_args!(
            "[{:>12.3}ms] dispatch end: {} delivered, {} dropped",
            ms(e.now.nanos()),
            e.delivered,
            e.dropped
        ));
    }
}

/// Convenience constructor for a stderr-backed sink.
#[must_use]
pub fn stderr_sink() -> PrettyPrintSink<io::Stderr> {
    PrettyPrintSink::new(io::stderr())
}
