// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point-in-time view of the compositor's layer tree.
//!
//! The scene graph itself lives in the host compositor and may be mutated
//! concurrently by other threads. This core therefore never walks the live
//! graph; it consumes a [`SceneSnapshot`] — an immutable, arena-style copy
//! of the identities, task tags, and topology of the current layers, built
//! once per dispatch cycle and read-only during traversal.
//!
//! Layers are stored in struct-of-arrays layout with index links
//! (`first_child` / `next_sibling`, [`INVALID`] sentinel) for cache-friendly
//! traversal. The host builds a snapshot through [`SnapshotBuilder`] and
//! hands it over via its [`SceneSource`] implementation.

use alloc::vec::Vec;
use core::fmt;

/// Sentinel value indicating "no layer" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A layer's stable sequence number, unique for the lifetime of the scene.
///
/// Assigned by the host compositor when the layer is created; this core only
/// ever compares and forwards it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u32);

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

/// An application task tag attached to a layer's metadata.
///
/// Subtrees are grouped for reporting by this tag: only the subtree root
/// needs to carry it, descendants inherit membership contextually.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub i32);

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

/// Supplies a point-in-time scene view to the reporter.
///
/// Implemented by the host compositor. [`snapshot`](Self::snapshot) is only
/// invoked when at least one subscription is actually due, so an idle
/// reporter never touches the scene graph.
pub trait SceneSource {
    /// Produces an immutable snapshot of the current layer tree.
    fn snapshot(&self) -> SceneSnapshot;
}

/// An immutable snapshot of layer identities, task tags, and topology.
///
/// Construct via [`SceneSnapshot::builder`]. Nodes are addressed by slot
/// index in insertion order; topology is encoded as `first_child` /
/// `next_sibling` chains with [`INVALID`] terminators, and the root list
/// preserves the order the host pushed them in (z-order, typically).
#[derive(Clone, Debug, Default)]
pub struct SceneSnapshot {
    pub(crate) id: Vec<LayerId>,
    pub(crate) task: Vec<Option<TaskId>>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) roots: Vec<u32>,
}

impl SceneSnapshot {
    /// Starts building a snapshot.
    #[must_use]
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder {
            snapshot: Self::default(),
        }
    }

    /// Returns an empty snapshot (a scene with no layers).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of layers in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id.len()
    }

    /// Whether the snapshot contains no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// The root slots, in the order the host pushed them.
    #[must_use]
    pub fn roots(&self) -> &[u32] {
        &self.roots
    }

    /// The layer identity stored at `slot`.
    #[must_use]
    pub fn layer_id(&self, slot: u32) -> LayerId {
        self.id[slot as usize]
    }

    /// The explicit task tag stored at `slot`, if any.
    #[must_use]
    pub fn task_id(&self, slot: u32) -> Option<TaskId> {
        self.task[slot as usize]
    }

    /// Iterates the direct children of `slot` in insertion order.
    #[must_use]
    pub fn children(&self, slot: u32) -> Children<'_> {
        Children {
            snapshot: self,
            current: self.first_child[slot as usize],
        }
    }
}

/// An iterator over the direct child slots of a layer.
///
/// Created by [`SceneSnapshot::children`].
#[derive(Debug)]
pub struct Children<'a> {
    snapshot: &'a SceneSnapshot,
    current: u32,
}

impl Iterator for Children<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.current == INVALID {
            return None;
        }
        let slot = self.current;
        self.current = self.snapshot.next_sibling[slot as usize];
        Some(slot)
    }
}

/// Host-facing builder for [`SceneSnapshot`].
///
/// Children are appended in order; the sibling chain preserves push order.
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: SceneSnapshot,
}

impl SnapshotBuilder {
    /// Appends a root layer and returns its slot.
    pub fn push_root(&mut self, id: LayerId, task: Option<TaskId>) -> u32 {
        let slot = self.push_node(id, task);
        self.snapshot.roots.push(slot);
        slot
    }

    /// Appends a child of `parent` and returns its slot.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a slot previously returned by this builder.
    pub fn push_child(&mut self, parent: u32, id: LayerId, task: Option<TaskId>) -> u32 {
        assert!(
            (parent as usize) < self.snapshot.id.len(),
            "parent slot out of range"
        );
        let slot = self.push_node(id, task);
        // Append to the end of the sibling chain to preserve push order.
        let head = self.snapshot.first_child[parent as usize];
        if head == INVALID {
            self.snapshot.first_child[parent as usize] = slot;
        } else {
            let mut tail = head;
            while self.snapshot.next_sibling[tail as usize] != INVALID {
                tail = self.snapshot.next_sibling[tail as usize];
            }
            self.snapshot.next_sibling[tail as usize] = slot;
        }
        slot
    }

    /// Finishes the snapshot.
    #[must_use]
    pub fn build(self) -> SceneSnapshot {
        self.snapshot
    }

    fn push_node(&mut self, id: LayerId, task: Option<TaskId>) -> u32 {
        let slot = u32::try_from(self.snapshot.id.len()).expect("snapshot exceeds u32 slots");
        self.snapshot.id.push(id);
        self.snapshot.task.push(task);
        self.snapshot.first_child.push(INVALID);
        self.snapshot.next_sibling.push(INVALID);
        slot
    }
}
