// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatcher: one reporting cycle over all subscribed tasks.
//!
//! [`FpsReporter`] owns the listener registry and the injected clock, and is
//! invoked synchronously once per composition cycle via
//! [`dispatch_layer_fps`](FpsReporter::dispatch_layer_fps). A cycle:
//!
//! 1. No subscriptions at all → return. Neither the scene source nor the
//!    statistics engine is touched.
//! 2. Ask the registry which subscriptions are due, grouped by task. No due
//!    group → return, still without snapshotting the scene.
//! 3. Snapshot the scene once, then per due group: match the task's
//!    subtree, compute FPS (exactly one engine call per group), and deliver
//!    to every due member.
//! 4. Successful delivery resets that subscription's rate-limit window. A
//!    failed delivery drops that subscription and nothing else — errors
//!    never cross task groups, and nothing here is fatal to the host.
//!
//! The reporter never blocks: delivery is fire-and-forget with a
//! synchronous failure signal, and the engine call is expected to be
//! CPU-bound. One reporter instance is owned by the compositor and torn
//! down with it; there is no ambient global state.

use alloc::boxed::Box;

use crate::clock::Clock;
use crate::matcher::{ConflictPolicy, collect_task_layers};
use crate::registry::{
    DEFAULT_MIN_REPORT_INTERVAL, FpsListener, ListenerKey, ListenerRegistry,
};
use crate::scene::{LayerId, SceneSource, TaskId};
use crate::time::Interval;
use crate::trace::{
    DeliveredEvent, DispatchBeginEvent, DispatchEndEvent, FpsComputedEvent, ListenerDroppedEvent,
    TaskMatchedEvent, Tracer,
};

/// The frame statistics engine collaborator.
///
/// Given the identity set of one task's layers, returns the effective frame
/// rate over the engine's retained history. `None` means the engine has no
/// value this cycle; the affected task group is skipped and retried on the
/// next due dispatch, without disturbing other groups.
pub trait FrameStats {
    /// Computes one FPS value for the given layer set.
    fn compute_fps(&mut self, layers: &[LayerId]) -> Option<f32>;
}

/// Configuration for the [`FpsReporter`].
#[derive(Clone, Copy, Debug)]
pub struct ReporterConfig {
    /// Minimum time between two reports to the same listener.
    pub min_report_interval: Interval,
    /// How to treat re-tagged descendants during subtree matching.
    pub conflict_policy: ConflictPolicy,
}

impl ReporterConfig {
    /// The default configuration: 500 ms minimum interval, whole subtrees.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_report_interval: DEFAULT_MIN_REPORT_INTERVAL,
            conflict_policy: ConflictPolicy::IncludeEntireSubtree,
        }
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-task frame-rate reporting service.
///
/// Owned by the compositor; the scene source and statistics engine are
/// passed in per dispatch so the reporter holds no references into the
/// host's state between cycles.
#[derive(Debug)]
pub struct FpsReporter<C: Clock> {
    clock: C,
    conflict_policy: ConflictPolicy,
    registry: ListenerRegistry,
}

impl<C: Clock> FpsReporter<C> {
    /// Creates a reporter with the given clock and configuration.
    #[must_use]
    pub fn new(clock: C, config: ReporterConfig) -> Self {
        Self {
            clock,
            conflict_policy: config.conflict_policy,
            registry: ListenerRegistry::new(config.min_report_interval),
        }
    }

    /// Registers a listener for a task, replacing any existing subscription
    /// under the same key. Does not itself trigger a report.
    pub fn add_listener(&mut self, key: ListenerKey, listener: Box<dyn FpsListener>, task: TaskId) {
        self.registry.add_listener(key, listener, task);
    }

    /// Removes a subscription. Idempotent; returns whether one existed.
    pub fn remove_listener(&mut self, key: ListenerKey) -> bool {
        self.registry.remove_listener(key)
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Runs one reporting cycle.
    pub fn dispatch_layer_fps(&mut self, scene: &impl SceneSource, stats: &mut impl FrameStats) {
        self.dispatch_layer_fps_traced(scene, stats, &mut Tracer::none());
    }

    /// Runs one reporting cycle, emitting trace events to `tracer`.
    pub fn dispatch_layer_fps_traced(
        &mut self,
        scene: &impl SceneSource,
        stats: &mut impl FrameStats,
        tracer: &mut Tracer<'_>,
    ) {
        if self.registry.is_empty() {
            return;
        }
        let now = self.clock.now();
        let due = self.registry.collect_due(now);
        if due.is_empty() {
            return;
        }

        tracer.dispatch_begin(&DispatchBeginEvent {
            now,
            live_listeners: self.registry.len(),
            due_groups: due.len(),
        });

        // One consistent view for the whole cycle.
        let snapshot = scene.snapshot();
        let mut delivered = 0_usize;
        let mut dropped = 0_usize;

        for (task, keys) in due {
            let layers = collect_task_layers(&snapshot, task, self.conflict_policy);
            tracer.task_matched(&TaskMatchedEvent {
                task,
                matched_layers: layers.len(),
                due_listeners: keys.len(),
            });
            if layers.is_empty() {
                // No active layers for this task this cycle.
                continue;
            }
            let Some(fps) = stats.compute_fps(&layers) else {
                // Engine has no value this cycle; retry when next due.
                continue;
            };
            tracer.fps_computed(&FpsComputedEvent { task, fps });

            for key in keys {
                match self.registry.notify(key, fps) {
                    Ok(()) => {
                        self.registry.mark_reported(key, now);
                        delivered += 1;
                        tracer.delivered(&DeliveredEvent { key, task, fps });
                    }
                    Err(_) => {
                        // Dead remote: drop this subscription, keep going.
                        self.registry.remove_listener(key);
                        dropped += 1;
                        tracer.listener_dropped(&ListenerDroppedEvent { key, task });
                    }
                }
            }
        }

        tracer.dispatch_end(&DispatchEndEvent {
            now,
            delivered,
            dropped,
        });
    }
}
