// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] turns a recorded event log (see
//! [`RecorderSink`](crate::recorder::RecorderSink)) into
//! [Chrome Trace Event Format][spec] JSON, suitable for loading into
//! `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
//!
//! Dispatch begin/end pairs become duration events; everything in between
//! becomes instant events. Timestamps are converted from nanoseconds to
//! microseconds as the format requires.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::new();
    // Instant events between a begin/end pair share the cycle's timestamp;
    // the format orders same-ts events by array position.
    let mut cycle_ts = 0_u64;

    for event in events {
        match event {
            RecordedEvent::DispatchBegin(e) => {
                cycle_ts = nanos_to_us(e.now.nanos());
                out.push(json!({
                    "ph": "B",
                    "name": "DispatchLayerFps",
                    "cat": "Reporter",
                    "ts": cycle_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "live_listeners": e.live_listeners,
                        "due_groups": e.due_groups,
                    }
                }));
            }
            RecordedEvent::TaskMatched(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("TaskMatched({:?})", e.task),
                    "cat": "Matcher",
                    "ts": cycle_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "matched_layers": e.matched_layers,
                        "due_listeners": e.due_listeners,
                    }
                }));
            }
            RecordedEvent::FpsComputed(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("FpsComputed({:?})", e.task),
                    "cat": "Stats",
                    "ts": cycle_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "fps": e.fps,
                    }
                }));
            }
            RecordedEvent::Delivered(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Delivered",
                    "cat": "Fanout",
                    "ts": cycle_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "listener": e.key.0,
                        "fps": e.fps,
                    }
                }));
            }
            RecordedEvent::ListenerDropped(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "ListenerDropped",
                    "cat": "Fanout",
                    "ts": cycle_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "listener": e.key.0,
                    }
                }));
            }
            RecordedEvent::DispatchEnd(e) => {
                out.push(json!({
                    "ph": "E",
                    "name": "DispatchLayerFps",
                    "cat": "Reporter",
                    "ts": nanos_to_us(e.now.nanos()),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "delivered": e.delivered,
                        "dropped": e.dropped,
                    }
                }));
            }
        }
    }

    serde_json::to_writer(&mut *writer, &Value::Array(out)).map_err(io::Error::other)?;
    writer.flush()
}

const fn nanos_to_us(nanos: u64) -> u64 {
    nanos / 1_000
}
