//! Observability: access-event counters and sink abstractions.
//!
//! This module never drives interception semantics; enhancement and the
//! interceptor runtime emit events through the sink boundary and nothing
//! flows back.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{CounterReport, EntityCounters, OpCounters};
pub use sink::{AccessEvent, AccessSink, access_report, access_reset_all, with_access_sink};
