//! Access-event sink boundary.
//!
//! Enhancement and interception logic MUST NOT depend on obs::metrics
//! directly. All instrumentation flows through AccessEvent and AccessSink;
//! this module is the only bridge between runtime logic and counter state.

use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn AccessSink>>> = const { RefCell::new(None) };
}

///
/// AccessEvent
///

#[derive(Clone, Copy, Debug)]
pub enum AccessEvent<'a> {
    Enhance {
        type_path: &'a str,
        attributes: u64,
    },
    EnhanceCached {
        type_path: &'a str,
    },
    LazyFetch {
        type_path: &'a str,
        attribute: &'a str,
    },
    FirstDirty {
        type_path: &'a str,
        attribute: &'a str,
    },
    ClearDirty {
        type_path: &'a str,
        cleared: u64,
    },
}

///
/// AccessSink
///

pub trait AccessSink {
    fn record(&self, event: AccessEvent<'_>);
}

/// GlobalAccessSink
/// Default process-local sink that writes into counter state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalAccessSink;

impl AccessSink for GlobalAccessSink {
    fn record(&self, event: AccessEvent<'_>) {
        match event {
            AccessEvent::Enhance { type_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.enhancements = m.ops.enhancements.saturating_add(1);
                    let entry = m.entities.entry(type_path.to_string()).or_default();
                    entry.enhancements = entry.enhancements.saturating_add(1);
                });
            }

            AccessEvent::EnhanceCached { type_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.enhance_cache_hits = m.ops.enhance_cache_hits.saturating_add(1);
                    let entry = m.entities.entry(type_path.to_string()).or_default();
                    entry.enhance_cache_hits = entry.enhance_cache_hits.saturating_add(1);
                });
            }

            AccessEvent::LazyFetch { type_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.lazy_fetches = m.ops.lazy_fetches.saturating_add(1);
                    let entry = m.entities.entry(type_path.to_string()).or_default();
                    entry.lazy_fetches = entry.lazy_fetches.saturating_add(1);
                });
            }

            AccessEvent::FirstDirty { type_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.first_dirty_marks = m.ops.first_dirty_marks.saturating_add(1);
                    let entry = m.entities.entry(type_path.to_string()).or_default();
                    entry.first_dirty_marks = entry.first_dirty_marks.saturating_add(1);
                });
            }

            AccessEvent::ClearDirty { type_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.clear_dirty_calls = m.ops.clear_dirty_calls.saturating_add(1);
                    let entry = m.entities.entry(type_path.to_string()).or_default();
                    entry.clear_dirty_calls = entry.clear_dirty_calls.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_ACCESS_SINK: GlobalAccessSink = GlobalAccessSink;

pub(crate) fn record(event: AccessEvent<'_>) {
    let sink_override = SINK_OVERRIDE.with_borrow(Clone::clone);
    if let Some(sink) = sink_override {
        sink.record(event);
    } else {
        GLOBAL_ACCESS_SINK.record(event);
    }
}

/// Run a closure with a temporary access-sink override.
///
/// The previous override is restored on all exits, including unwind.
pub fn with_access_sink<T>(sink: Rc<dyn AccessSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn AccessSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with_borrow_mut(|slot| *slot = self.0.take());
        }
    }

    let prev = SINK_OVERRIDE.with_borrow_mut(|slot| slot.replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Snapshot the current counter state for endpoint/test plumbing.
#[must_use]
pub fn access_report() -> metrics::CounterReport {
    metrics::report()
}

/// Reset all counter state.
pub fn access_reset_all() {
    metrics::reset_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSink {
        calls: Rc<Cell<usize>>,
    }

    impl AccessSink for CountingSink {
        fn record(&self, _: AccessEvent<'_>) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    #[test]
    fn with_access_sink_routes_and_restores_nested_overrides() {
        SINK_OVERRIDE.with_borrow_mut(|slot| *slot = None);
        access_reset_all();

        let outer_calls = Rc::new(Cell::new(0));
        let inner_calls = Rc::new(Cell::new(0));
        let outer = Rc::new(CountingSink {
            calls: outer_calls.clone(),
        });
        let inner = Rc::new(CountingSink {
            calls: inner_calls.clone(),
        });

        // No override installed yet.
        record(AccessEvent::EnhanceCached { type_path: "obs::tests::Entity" });
        assert_eq!(outer_calls.get(), 0);
        assert_eq!(inner_calls.get(), 0);

        with_access_sink(outer, || {
            record(AccessEvent::EnhanceCached { type_path: "obs::tests::Entity" });
            assert_eq!(outer_calls.get(), 1);

            with_access_sink(inner, || {
                record(AccessEvent::EnhanceCached { type_path: "obs::tests::Entity" });
            });
            assert_eq!(inner_calls.get(), 1);

            // Inner override was restored to outer override.
            record(AccessEvent::EnhanceCached { type_path: "obs::tests::Entity" });
        });

        assert_eq!(outer_calls.get(), 2);
        assert_eq!(inner_calls.get(), 1);

        // Outer override was restored to previous (none).
        SINK_OVERRIDE.with_borrow(|slot| assert!(slot.is_none()));
    }

    #[test]
    fn with_access_sink_restores_override_on_panic() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        SINK_OVERRIDE.with_borrow_mut(|slot| *slot = None);

        let calls = Rc::new(Cell::new(0));
        let sink = Rc::new(CountingSink {
            calls: calls.clone(),
        });

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_access_sink(sink, || {
                record(AccessEvent::EnhanceCached { type_path: "obs::tests::Entity" });
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();
        assert!(panicked);
        assert_eq!(calls.get(), 1);

        // Guard restored the slot after unwind.
        SINK_OVERRIDE.with_borrow(|slot| assert!(slot.is_none()));
    }

    #[test]
    fn global_sink_accumulates_per_entity_counters() {
        SINK_OVERRIDE.with_borrow_mut(|slot| *slot = None);
        access_reset_all();

        record(AccessEvent::Enhance {
            type_path: "obs::tests::Entity",
            attributes: 3,
        });
        record(AccessEvent::LazyFetch {
            type_path: "obs::tests::Entity",
            attribute: "body",
        });
        record(AccessEvent::LazyFetch {
            type_path: "obs::tests::Entity",
            attribute: "body",
        });

        let report = access_report();
        assert_eq!(report.ops.enhancements, 1);
        assert_eq!(report.ops.lazy_fetches, 2);

        let entity = report
            .entities
            .get("obs::tests::Entity")
            .expect("entity counters should be present");
        assert_eq!(entity.enhancements, 1);
        assert_eq!(entity.lazy_fetches, 2);
    }
}
