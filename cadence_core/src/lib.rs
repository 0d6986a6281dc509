// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-task frame-rate reporting for compositor embedding.
//!
//! `cadence_core` identifies the subtree of compositor layers belonging to
//! an application task, computes that subtree's effective frame rate
//! through a host-supplied statistics engine, and fans the value out to
//! remote subscribers — no more often than a per-listener minimum interval
//! allows. It is `no_std` compatible (with `alloc`) and holds no ambient
//! global state: the compositor owns one [`FpsReporter`] and drives it
//! synchronously from its composition loop.
//!
//! # Architecture
//!
//! One dispatch cycle flows through the modules like this:
//!
//! ```text
//!   composition loop
//!       │
//!       ▼
//!   FpsReporter::dispatch_layer_fps()
//!       │        who is due?
//!       ├──► ListenerRegistry::collect_due()      (registry)
//!       │        which layers?
//!       ├──► SceneSource::snapshot() ──► collect_task_layers()   (scene, matcher)
//!       │        what rate?
//!       ├──► FrameStats::compute_fps()            (reporter)
//!       │        fan out
//!       └──► FpsListener::on_fps_reported() ──► mark_reported()
//! ```
//!
//! **[`scene`]** — The point-in-time view contract: [`SceneSnapshot`] is an
//! immutable, arena-style copy of layer identities, task tags, and topology
//! that the host builds once per cycle, so traversal never races the live
//! graph.
//!
//! **[`matcher`]** — Depth-first task matching: the layer tagged with the
//! task id plus its whole subtree, with a configurable policy for
//! re-tagged descendants.
//!
//! **[`registry`]** — Exclusive subscription ownership and per-listener
//! rate limiting. First report is immediate; later reports wait out the
//! configured minimum interval.
//!
//! **[`reporter`]** — The dispatcher. One statistics-engine call per due
//! task group; delivery failures drop only the dead subscription.
//!
//! **[`clock`]** — Injectable [`Clock`] trait with a production monotonic
//! implementation (`std` feature) and an advanceable [`ManualClock`] for
//! deterministic tests.
//!
//! **[`time`]** — Nanosecond [`Timestamp`]/[`Interval`] newtypes.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) and zero-overhead
//! [`Tracer`](trace::Tracer) for dispatch-cycle diagnostics.
//!
//! # Crate features
//!
//! - `std` (disabled by default): enables [`clock::MonotonicClock`].
//! - `trace` (disabled by default): enables `Tracer` method bodies (one
//!   branch per call site).

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod clock;
pub mod matcher;
pub mod registry;
pub mod reporter;
pub mod scene;
pub mod time;
pub mod trace;

pub use clock::{Clock, ManualClock};
pub use matcher::{ConflictPolicy, collect_task_layers};
pub use registry::{
    DEFAULT_MIN_REPORT_INTERVAL, DeliveryError, FpsListener, ListenerKey, ListenerRegistry,
};
pub use reporter::{FpsReporter, FrameStats, ReporterConfig};
pub use scene::{LayerId, SceneSnapshot, SceneSource, SnapshotBuilder, TaskId};
pub use time::{Interval, Timestamp};
