// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscription ownership and per-listener rate limiting.
//!
//! The [`ListenerRegistry`] is the exclusive owner of every subscription: a
//! binding of (listener capability, task id, last-report timestamp), keyed
//! by a transport-independent [`ListenerKey`]. A listener holds at most one
//! subscription; re-adding under the same key replaces the old binding and
//! resets its rate-limit state.
//!
//! Rate limiting is evaluated per subscription, not globally. A subscription
//! is *due* when it has never reported, or when the time since its last
//! report has reached the configured minimum interval. Two listeners on the
//! same task may sit at different phases of their own intervals.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::scene::TaskId;
use crate::time::{Interval, Timestamp};

/// Minimum time between two reports to the same listener.
///
/// Calibrated for UI-facing consumers: fast enough to feel live, slow
/// enough that subscribers are not flooded on every composition cycle.
/// Override via [`ReporterConfig`](crate::reporter::ReporterConfig).
pub const DEFAULT_MIN_REPORT_INTERVAL: Interval = Interval::from_millis(500);

/// A stable handle identifying a listener, usable as a map key.
///
/// Independent of the delivery transport; the host picks the value (e.g. a
/// connection id or a hashed remote identity).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerKey(pub u64);

impl fmt::Debug for ListenerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerKey({})", self.0)
    }
}

/// Why a delivery to a remote listener failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeliveryError {
    /// The remote end is gone; the subscription should be dropped.
    Unreachable,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "remote listener unreachable"),
        }
    }
}

impl core::error::Error for DeliveryError {}

/// A remote FPS subscriber.
///
/// Delivery is fire-and-forget with a synchronous failure signal: an `Err`
/// tells the dispatcher the remote is dead and the subscription must be
/// removed. Implementations must not block.
pub trait FpsListener {
    /// Delivers one computed FPS value.
    fn on_fps_reported(&mut self, fps: f32) -> Result<(), DeliveryError>;
}

/// One listener's binding to a task, with its rate-limit state.
struct Subscription {
    task: TaskId,
    last_report: Option<Timestamp>,
    listener: Box<dyn FpsListener>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("task", &self.task)
            .field("last_report", &self.last_report)
            .finish_non_exhaustive()
    }
}

/// Owns all subscriptions and answers "who is due" per dispatch cycle.
#[derive(Debug)]
pub struct ListenerRegistry {
    subscriptions: HashMap<ListenerKey, Subscription>,
    min_report_interval: Interval,
}

impl ListenerRegistry {
    /// Creates an empty registry with the given minimum report interval.
    #[must_use]
    pub fn new(min_report_interval: Interval) -> Self {
        Self {
            subscriptions: HashMap::new(),
            min_report_interval,
        }
    }

    /// Registers a listener for a task, replacing any existing subscription
    /// under the same key.
    ///
    /// A replaced subscription loses its rate-limit state: the new binding
    /// is due on the next dispatch. Registration alone never triggers a
    /// report.
    pub fn add_listener(&mut self, key: ListenerKey, listener: Box<dyn FpsListener>, task: TaskId) {
        self.subscriptions.insert(
            key,
            Subscription {
                task,
                last_report: None,
                listener,
            },
        );
    }

    /// Removes a subscription. Idempotent; returns whether one existed.
    pub fn remove_listener(&mut self, key: ListenerKey) -> bool {
        self.subscriptions.remove(&key).is_some()
    }

    /// Whether no subscriptions exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// The minimum interval between reports to one listener.
    #[must_use]
    pub fn min_report_interval(&self) -> Interval {
        self.min_report_interval
    }

    /// Groups the subscriptions that are due at `now` by task.
    ///
    /// Tasks whose subscriptions are all inside their rate-limit window do
    /// not appear at all, so the dispatcher never recomputes FPS for a task
    /// just because some *other* task's listeners are due.
    #[must_use]
    pub fn collect_due(&self, now: Timestamp) -> Vec<(TaskId, Vec<ListenerKey>)> {
        let mut groups: HashMap<TaskId, Vec<ListenerKey>> = HashMap::new();
        for (key, sub) in &self.subscriptions {
            if self.is_due(sub, now) {
                groups.entry(sub.task).or_default().push(*key);
            }
        }
        groups.into_iter().collect()
    }

    /// Records a successful delivery, resetting the subscription's window.
    ///
    /// No-op if the subscription was removed in the meantime.
    pub fn mark_reported(&mut self, key: ListenerKey, now: Timestamp) {
        if let Some(sub) = self.subscriptions.get_mut(&key) {
            sub.last_report = Some(now);
        }
    }

    /// Delivers a value to the listener behind `key`.
    ///
    /// Returns `Ok(())` for unknown keys: a subscription removed mid-cycle
    /// is not a delivery failure.
    pub fn notify(&mut self, key: ListenerKey, fps: f32) -> Result<(), DeliveryError> {
        match self.subscriptions.get_mut(&key) {
            Some(sub) => sub.listener.on_fps_reported(fps),
            None => Ok(()),
        }
    }

    fn is_due(&self, sub: &Subscription, now: Timestamp) -> bool {
        match sub.last_report {
            // First report ever is immediate.
            None => true,
            Some(last) => now.saturating_since(last) >= self.min_report_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SinkListener;

    impl FpsListener for SinkListener {
        fn on_fps_reported(&mut self, _fps: f32) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    fn registry() -> ListenerRegistry {
        ListenerRegistry::new(Interval::from_millis(500))
    }

    fn due_keys_for(groups: &[(TaskId, Vec<ListenerKey>)], task: TaskId) -> Vec<ListenerKey> {
        let mut keys: Vec<ListenerKey> = groups
            .iter()
            .filter(|(t, _)| *t == task)
            .flat_map(|(_, keys)| keys.iter().copied())
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn empty_registry_has_no_due_groups() {
        let reg = registry();
        assert!(reg.is_empty());
        assert!(reg.collect_due(Timestamp(1)).is_empty());
    }

    #[test]
    fn fresh_subscription_is_due_immediately() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(12));
        // Due even at time zero; elapsed time is irrelevant before the
        // first report.
        let groups = reg.collect_due(Timestamp::ZERO);
        assert_eq!(due_keys_for(&groups, TaskId(12)), &[ListenerKey(1)]);
    }

    #[test]
    fn reported_subscription_waits_out_the_interval() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(12));
        let t0 = Timestamp(600_000_000);
        reg.mark_reported(ListenerKey(1), t0);

        // 200ms and 400ms later: inside the window.
        assert!(reg.collect_due(t0 + Interval::from_millis(200)).is_empty());
        assert!(reg.collect_due(t0 + Interval::from_millis(400)).is_empty());
        // Exactly at the threshold: due again.
        let groups = reg.collect_due(t0 + Interval::from_millis(500));
        assert_eq!(due_keys_for(&groups, TaskId(12)), &[ListenerKey(1)]);
    }

    #[test]
    fn phases_are_per_subscription() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(12));
        reg.add_listener(ListenerKey(2), Box::new(SinkListener), TaskId(12));
        reg.mark_reported(ListenerKey(1), Timestamp(0));

        // Key 2 never reported: due. Key 1: inside its window.
        let groups = reg.collect_due(Timestamp::ZERO + Interval::from_millis(100));
        assert_eq!(due_keys_for(&groups, TaskId(12)), &[ListenerKey(2)]);
    }

    #[test]
    fn groups_are_per_task() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(1));
        reg.add_listener(ListenerKey(2), Box::new(SinkListener), TaskId(2));
        reg.mark_reported(ListenerKey(2), Timestamp(0));

        let groups = reg.collect_due(Timestamp(1));
        assert_eq!(due_keys_for(&groups, TaskId(1)), &[ListenerKey(1)]);
        assert!(due_keys_for(&groups, TaskId(2)).is_empty());
        // The quiet task forms no group at all.
        assert_eq!(groups.len(), 1, "only the due task should be grouped");
    }

    #[test]
    fn re_adding_replaces_and_resets_rate_limit() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(1));
        reg.mark_reported(ListenerKey(1), Timestamp(0));
        assert!(reg.collect_due(Timestamp(1)).is_empty());

        // Same key, new task: fresh binding, due immediately.
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(2));
        assert_eq!(reg.len(), 1);
        let groups = reg.collect_due(Timestamp(1));
        assert_eq!(due_keys_for(&groups, TaskId(2)), &[ListenerKey(1)]);
    }

    #[test]
    fn removal_is_idempotent() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(1));
        assert!(reg.remove_listener(ListenerKey(1)));
        assert!(!reg.remove_listener(ListenerKey(1)));
        assert!(!reg.remove_listener(ListenerKey(99)), "never-added key");
        assert!(reg.is_empty());
    }

    #[test]
    fn removal_does_not_disturb_other_subscriptions() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(1));
        reg.add_listener(ListenerKey(2), Box::new(SinkListener), TaskId(1));
        reg.remove_listener(ListenerKey(1));

        let groups = reg.collect_due(Timestamp(1));
        assert_eq!(due_keys_for(&groups, TaskId(1)), &[ListenerKey(2)]);
    }

    #[test]
    fn mark_reported_after_removal_is_a_no_op() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(1));
        reg.remove_listener(ListenerKey(1));
        reg.mark_reported(ListenerKey(1), Timestamp(5));
        assert!(reg.is_empty());
    }

    #[test]
    fn notify_unknown_key_is_not_a_failure() {
        let mut reg = registry();
        assert_eq!(reg.notify(ListenerKey(7), 60.0), Ok(()));
    }

    #[test]
    fn clock_regression_keeps_subscription_rate_limited() {
        let mut reg = registry();
        reg.add_listener(ListenerKey(1), Box::new(SinkListener), TaskId(1));
        reg.mark_reported(ListenerKey(1), Timestamp(1_000_000_000));
        // Elapsed saturates to zero when now < last_report.
        assert!(reg.collect_due(Timestamp(500_000_000)).is_empty());
    }
}
