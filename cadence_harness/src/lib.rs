// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable test doubles and report-cadence metrics.
//!
//! Integration tests and demo harnesses all need the same few fakes: a
//! scripted statistics engine, observable listeners (the registry owns the
//! listener, the test keeps a shared handle), a canned scene source, and a
//! way to measure how often reports actually arrive. This crate collects
//! them so downstream code does not re-implement them per test file.
//!
//! Everything here is `no_std` + `alloc`, like the core.

#![no_std]

extern crate alloc;

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use cadence_core::registry::{DeliveryError, FpsListener};
use cadence_core::reporter::FrameStats;
use cadence_core::scene::{LayerId, SceneSnapshot, SceneSource};
use cadence_core::time::{Interval, Timestamp};

// ---------------------------------------------------------------------------
// ScriptedStats
// ---------------------------------------------------------------------------

/// A [`FrameStats`] double with a scripted sequence of return values.
///
/// Each invocation pops the next scripted value and records the layer set
/// it was asked about. An exhausted script answers `None` (engine failure),
/// which surfaces accidental extra computations as missing reports.
#[derive(Debug, Default)]
pub struct ScriptedStats {
    script: VecDeque<Option<f32>>,
    calls: Vec<Vec<LayerId>>,
}

impl ScriptedStats {
    /// Creates an engine that returns the given values in order.
    #[must_use]
    pub fn returning(values: &[f32]) -> Self {
        Self {
            script: values.iter().map(|v| Some(*v)).collect(),
            calls: Vec::new(),
        }
    }

    /// Appends one scripted outcome (`None` simulates engine failure).
    pub fn push(&mut self, value: Option<f32>) {
        self.script.push_back(value);
    }

    /// Number of times the engine was invoked.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// The layer set of invocation `idx`, sorted for comparison.
    #[must_use]
    pub fn sorted_call(&self, idx: usize) -> Vec<LayerId> {
        let mut layers = self.calls[idx].clone();
        layers.sort();
        layers
    }
}

impl FrameStats for ScriptedStats {
    fn compute_fps(&mut self, layers: &[LayerId]) -> Option<f32> {
        self.calls.push(layers.to_vec());
        self.script.pop_front().unwrap_or(None)
    }
}

// ---------------------------------------------------------------------------
// RecordingListener
// ---------------------------------------------------------------------------

/// Shared observation state of a [`RecordingListener`].
#[derive(Debug, Default)]
struct ListenerLog {
    reports: Vec<(Timestamp, f32)>,
}

/// An observable listener handle.
///
/// [`listener`](Self::listener) produces the boxed half that the registry
/// owns; the handle half stays with the test and exposes what arrived.
/// Report timestamps come from the shared [`ManualClock`] handle given at
/// construction, so cadence can be asserted, not just values.
///
/// [`ManualClock`]: cadence_core::clock::ManualClock
#[derive(Clone, Debug, Default)]
pub struct RecordingListener {
    log: Rc<RefCell<ListenerLog>>,
    clock: cadence_core::clock::ManualClock,
}

impl RecordingListener {
    /// Creates a handle that stamps reports with the given clock.
    #[must_use]
    pub fn with_clock(clock: cadence_core::clock::ManualClock) -> Self {
        Self {
            log: Rc::default(),
            clock,
        }
    }

    /// Produces the registry-owned listener half.
    #[must_use]
    pub fn listener(&self) -> alloc::boxed::Box<dyn FpsListener> {
        alloc::boxed::Box::new(RecordingHalf {
            log: Rc::clone(&self.log),
            clock: self.clock.clone(),
        })
    }

    /// The most recently received value, if any.
    #[must_use]
    pub fn last_fps(&self) -> Option<f32> {
        self.log.borrow().reports.last().map(|(_, fps)| *fps)
    }

    /// Number of reports received.
    #[must_use]
    pub fn report_count(&self) -> usize {
        self.log.borrow().reports.len()
    }

    /// All received reports as (timestamp, fps) pairs.
    #[must_use]
    pub fn reports(&self) -> Vec<(Timestamp, f32)> {
        self.log.borrow().reports.clone()
    }
}

struct RecordingHalf {
    log: Rc<RefCell<ListenerLog>>,
    clock: cadence_core::clock::ManualClock,
}

impl FpsListener for RecordingHalf {
    fn on_fps_reported(&mut self, fps: f32) -> Result<(), DeliveryError> {
        use cadence_core::clock::Clock as _;
        let now = self.clock.now();
        self.log.borrow_mut().reports.push((now, fps));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FailingListener
// ---------------------------------------------------------------------------

/// A listener that simulates a remote dying after N successful deliveries.
#[derive(Debug)]
pub struct FailingListener {
    succeed_for: usize,
}

impl FailingListener {
    /// Fails every delivery from the start.
    #[must_use]
    pub fn immediately() -> Self {
        Self { succeed_for: 0 }
    }

    /// Succeeds for the first `n` deliveries, then fails.
    #[must_use]
    pub fn after(n: usize) -> Self {
        Self { succeed_for: n }
    }
}

impl FpsListener for FailingListener {
    fn on_fps_reported(&mut self, _fps: f32) -> Result<(), DeliveryError> {
        if self.succeed_for == 0 {
            return Err(DeliveryError::Unreachable);
        }
        self.succeed_for -= 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StaticScene
// ---------------------------------------------------------------------------

/// A [`SceneSource`] serving a canned snapshot, counting accesses.
#[derive(Debug)]
pub struct StaticScene {
    snapshot: SceneSnapshot,
    taken: core::cell::Cell<usize>,
}

impl StaticScene {
    /// Wraps a prebuilt snapshot.
    #[must_use]
    pub fn new(snapshot: SceneSnapshot) -> Self {
        Self {
            snapshot,
            taken: core::cell::Cell::new(0),
        }
    }

    /// Replaces the snapshot served from now on.
    pub fn replace(&mut self, snapshot: SceneSnapshot) {
        self.snapshot = snapshot;
    }

    /// How many times the scene was snapshotted.
    #[must_use]
    pub fn snapshots_taken(&self) -> usize {
        self.taken.get()
    }
}

impl SceneSource for StaticScene {
    fn snapshot(&self) -> SceneSnapshot {
        self.taken.set(self.taken.get() + 1);
        self.snapshot.clone()
    }
}

// ---------------------------------------------------------------------------
// CadenceTracker
// ---------------------------------------------------------------------------

/// Rolling statistics over a stream of observed reports.
///
/// Soak tests and demo HUDs feed every `(timestamp, fps)` report in and
/// read back the count and the spacing between consecutive reports, which
/// is how rate-limit regressions show up in practice.
#[derive(Debug, Default)]
pub struct CadenceTracker {
    last: Option<Timestamp>,
    count: u64,
    min_gap: Option<Interval>,
    max_gap: Option<Interval>,
    gap_total: Interval,
}

impl CadenceTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes one delivered report.
    pub fn observe(&mut self, at: Timestamp) {
        if let Some(last) = self.last {
            let gap = at.saturating_since(last);
            self.min_gap = Some(match self.min_gap {
                Some(m) if m <= gap => m,
                _ => gap,
            });
            self.max_gap = Some(match self.max_gap {
                Some(m) if m >= gap => m,
                _ => gap,
            });
            self.gap_total = self.gap_total.saturating_add(gap);
        }
        self.last = Some(at);
        self.count += 1;
    }

    /// Total reports observed.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Smallest spacing between two consecutive reports, if two arrived.
    #[must_use]
    pub fn min_gap(&self) -> Option<Interval> {
        self.min_gap
    }

    /// Largest spacing between two consecutive reports, if two arrived.
    #[must_use]
    pub fn max_gap(&self) -> Option<Interval> {
        self.max_gap
    }

    /// Mean spacing between consecutive reports, if two arrived.
    #[must_use]
    pub fn mean_gap(&self) -> Option<Interval> {
        if self.count < 2 {
            return None;
        }
        Some(Interval(self.gap_total.nanos() / (self.count - 1)))
    }
}
