// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and stores every event as an
//! owned [`RecordedEvent`], in arrival order. The log can be inspected
//! directly, asserted on in tests, or fed to [`chrome::export`] for
//! visualization.
//!
//! [`chrome::export`]: crate::chrome::export

use cadence_core::trace::{
    DeliveredEvent, DispatchBeginEvent, DispatchEndEvent, FpsComputedEvent, ListenerDroppedEvent,
    TaskMatchedEvent, TraceSink,
};

/// One recorded dispatch-cycle event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A dispatch cycle began.
    DispatchBegin(DispatchBeginEvent),
    /// The matcher ran for a due group.
    TaskMatched(TaskMatchedEvent),
    /// The statistics engine produced a value.
    FpsComputed(FpsComputedEvent),
    /// A value was delivered to a listener.
    Delivered(DeliveredEvent),
    /// A subscription was dropped after a failed delivery.
    ListenerDropped(ListenerDroppedEvent),
    /// A dispatch cycle ended.
    DispatchEnd(DispatchEndEvent),
}

/// A [`TraceSink`] that stores events as owned values.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the event log.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        self.events.push(RecordedEvent::DispatchBegin(*e));
    }

    fn on_task_matched(&mut self, e: &TaskMatchedEvent) {
        self.events.push(RecordedEvent::TaskMatched(*e));
    }

    fn on_fps_computed(&mut self, e: &FpsComputedEvent) {
        self.events.push(RecordedEvent::FpsComputed(*e));
    }

    fn on_delivered(&mut self, e: &DeliveredEvent) {
        self.events.push(RecordedEvent::Delivered(*e));
    }

    fn on_listener_dropped(&mut self, e: &ListenerDroppedEvent) {
        self.events.push(RecordedEvent::ListenerDropped(*e));
    }

    fn on_dispatch_end(&mut self, e: &DispatchEndEvent) {
        self.events.push(RecordedEvent::DispatchEnd(*e));
    }
}
