// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Task-tag matching over a scene snapshot.
//!
//! A task's reporting set is the layer tagged with that task id plus every
//! descendant of it: only the subtree root carries the tag, descendants
//! inherit membership contextually. [`collect_task_layers`] walks the
//! snapshot roots depth-first and collects each matching subtree. The result
//! is consumed as an unordered set, so traversal order is not part of the
//! contract.
//!
//! A matched subtree is consumed whole — traversal does not re-inspect its
//! interior — so a nested tag (same id or not, depending on policy) can
//! never collect the same layer twice.

use alloc::vec::Vec;

use crate::scene::{LayerId, SceneSnapshot, TaskId};

/// What to do when a descendant of a matched subtree carries a *different*
/// explicit task id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConflictPolicy {
    /// Collect the entire subtree regardless of re-tagged descendants.
    ///
    /// A descendant's foreign tag is ignored; it still reports under the
    /// ancestor's task. This matches compositors that treat the first tag
    /// on the path from the root as authoritative.
    #[default]
    IncludeEntireSubtree,
    /// Prune descendants that carry a different explicit task id.
    ///
    /// The re-tagged layer and its subtree are excluded from the ancestor's
    /// set (they report under their own task instead). A descendant
    /// re-tagged with the *same* id is never pruned.
    StopAtForeignTask,
}

/// Collects the identities of every layer belonging to `task`.
///
/// Returns an empty vector if no layer in the snapshot carries the tag.
/// Purely a read; the snapshot is never mutated.
#[must_use]
pub fn collect_task_layers(
    snapshot: &SceneSnapshot,
    task: TaskId,
    policy: ConflictPolicy,
) -> Vec<LayerId> {
    let mut out = Vec::new();
    let mut stack: Vec<u32> = snapshot.roots().iter().rev().copied().collect();
    while let Some(slot) = stack.pop() {
        if snapshot.task_id(slot) == Some(task) {
            collect_subtree(snapshot, slot, task, policy, &mut out);
        } else {
            for child in snapshot.children(slot) {
                stack.push(child);
            }
        }
    }
    out
}

/// Collects `slot` and its descendants, honoring the conflict policy.
fn collect_subtree(
    snapshot: &SceneSnapshot,
    slot: u32,
    task: TaskId,
    policy: ConflictPolicy,
    out: &mut Vec<LayerId>,
) {
    let mut stack: Vec<u32> = Vec::new();
    stack.push(slot);
    while let Some(slot) = stack.pop() {
        if policy == ConflictPolicy::StopAtForeignTask
            && let Some(tag) = snapshot.task_id(slot)
            && tag != task
        {
            continue;
        }
        out.push(snapshot.layer_id(slot));
        for child in snapshot.children(slot) {
            stack.push(child);
        }
    }
}
