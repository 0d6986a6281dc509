// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the dispatch cycle.
//!
//! [`TraceSink`] has one method per dispatch-cycle event, all defaulting to
//! no-ops, so a sink implements only what it cares about. [`Tracer`] wraps
//! an optional `&mut dyn TraceSink`: with the `trace` feature **off** every
//! `Tracer` method compiles to nothing; with it **on** each method is a
//! single `Option` branch before dispatching.
//!
//! Sinks for development and post-mortem analysis (pretty printing,
//! recording, Chrome trace export) live in the `cadence_debug` crate.

use crate::registry::ListenerKey;
use crate::scene::TaskId;
use crate::time::Timestamp;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of a dispatch cycle that has work to consider.
///
/// The completely idle path (zero subscriptions) emits nothing: it is the
/// hot path of a compositor with no FPS consumers.
#[derive(Clone, Copy, Debug)]
pub struct DispatchBeginEvent {
    /// Clock reading for this cycle.
    pub now: Timestamp,
    /// Live subscriptions at cycle start.
    pub live_listeners: usize,
    /// Task groups with at least one due subscription.
    pub due_groups: usize,
}

/// Emitted after the task matcher runs for one due group.
#[derive(Clone, Copy, Debug)]
pub struct TaskMatchedEvent {
    /// The task that was matched.
    pub task: TaskId,
    /// Layers collected for the task (zero means the group is skipped).
    pub matched_layers: usize,
    /// Due subscriptions waiting on this group.
    pub due_listeners: usize,
}

/// Emitted when the statistics engine returns a value for a group.
#[derive(Clone, Copy, Debug)]
pub struct FpsComputedEvent {
    /// The task the value belongs to.
    pub task: TaskId,
    /// The computed frame rate.
    pub fps: f32,
}

/// Emitted after a successful delivery to one listener.
#[derive(Clone, Copy, Debug)]
pub struct DeliveredEvent {
    /// The listener that received the value.
    pub key: ListenerKey,
    /// The task the value belongs to.
    pub task: TaskId,
    /// The delivered frame rate.
    pub fps: f32,
}

/// Emitted when a delivery fails and the subscription is dropped.
#[derive(Clone, Copy, Debug)]
pub struct ListenerDroppedEvent {
    /// The listener whose subscription was dropped.
    pub key: ListenerKey,
    /// The task it was subscribed to.
    pub task: TaskId,
}

/// Emitted at the end of a dispatch cycle that began with work to consider.
#[derive(Clone, Copy, Debug)]
pub struct DispatchEndEvent {
    /// Clock reading the cycle ran at.
    pub now: Timestamp,
    /// Successful deliveries this cycle.
    pub delivered: usize,
    /// Subscriptions dropped due to delivery failure this cycle.
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the dispatch cycle.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called at the start of a non-idle dispatch cycle.
    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        _ = e;
    }

    /// Called after the task matcher runs for a due group.
    fn on_task_matched(&mut self, e: &TaskMatchedEvent) {
        _ = e;
    }

    /// Called when the statistics engine produces a value.
    fn on_fps_computed(&mut self, e: &FpsComputedEvent) {
        _ = e;
    }

    /// Called after each successful delivery.
    fn on_delivered(&mut self, e: &DeliveredEvent) {
        _ = e;
    }

    /// Called when a subscription is dropped after a failed delivery.
    fn on_listener_dropped(&mut self, e: &ListenerDroppedEvent) {
        _ = e;
    }

    /// Called at the end of a non-idle dispatch cycle.
    fn on_dispatch_end(&mut self, e: &DispatchEndEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`DispatchBeginEvent`].
    #[inline]
    pub fn dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TaskMatchedEvent`].
    #[inline]
    pub fn task_matched(&mut self, e: &TaskMatchedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_task_matched(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`FpsComputedEvent`].
    #[inline]
    pub fn fps_computed(&mut self, e: &FpsComputedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_fps_computed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DeliveredEvent`].
    #[inline]
    pub fn delivered(&mut self, e: &DeliveredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_delivered(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ListenerDroppedEvent`].
    #[inline]
    pub fn listener_dropped(&mut self, e: &ListenerDroppedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_listener_dropped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchEndEvent`].
    #[inline]
    pub fn dispatch_end(&mut self, e: &DispatchEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> DispatchBeginEvent {
        DispatchBeginEvent {
            now: Timestamp(1_000_000),
            live_listeners: 2,
            due_groups: 1,
        }
    }

    #[test]
    fn noop_sink_accepts_all_events() {
        let mut sink = NoopSink;
        sink.on_dispatch_begin(&sample_begin());
        sink.on_task_matched(&TaskMatchedEvent {
            task: TaskId(12),
            matched_layers: 3,
            due_listeners: 1,
        });
        sink.on_fps_computed(&FpsComputedEvent {
            task: TaskId(12),
            fps: 60.0,
        });
        sink.on_delivered(&DeliveredEvent {
            key: ListenerKey(1),
            task: TaskId(12),
            fps: 60.0,
        });
        sink.on_listener_dropped(&ListenerDroppedEvent {
            key: ListenerKey(1),
            task: TaskId(12),
        });
        sink.on_dispatch_end(&DispatchEndEvent {
            now: Timestamp(1_000_000),
            delivered: 1,
            dropped: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.dispatch_begin(&sample_begin());
        tracer.fps_computed(&FpsComputedEvent {
            task: TaskId(1),
            fps: 44.0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        #[derive(Default)]
        struct CountingSink {
            computed: Vec<f32>,
        }
        impl TraceSink for CountingSink {
            fn on_fps_computed(&mut self, e: &FpsComputedEvent) {
                self.computed.push(e.fps);
            }
        }

        let mut sink = CountingSink::default();
        let mut tracer = Tracer::new(&mut sink);
        tracer.fps_computed(&FpsComputedEvent {
            task: TaskId(1),
            fps: 44.0,
        });
        drop(tracer);
        assert_eq!(sink.computed, &[44.0]);
    }
}
