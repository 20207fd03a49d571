use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static STATE: RefCell<CounterState> = RefCell::new(CounterState::default());
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut CounterState) -> R) -> R {
    STATE.with_borrow_mut(f)
}

///
/// CounterState
///

#[derive(Clone, Debug, Default)]
pub(crate) struct CounterState {
    pub ops: OpCounters,
    pub entities: BTreeMap<String, EntityCounters>,
}

///
/// OpCounters
///
/// Engine-wide event totals.
///

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct OpCounters {
    pub enhancements: u64,
    pub enhance_cache_hits: u64,
    pub lazy_fetches: u64,
    pub first_dirty_marks: u64,
    pub clear_dirty_calls: u64,
}

///
/// EntityCounters
///
/// Per-type-path event totals.
///

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct EntityCounters {
    pub enhancements: u64,
    pub enhance_cache_hits: u64,
    pub lazy_fetches: u64,
    pub first_dirty_marks: u64,
    pub clear_dirty_calls: u64,
}

///
/// CounterReport
///
/// Point-in-time snapshot for endpoint/test plumbing.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct CounterReport {
    pub ops: OpCounters,
    pub entities: BTreeMap<String, EntityCounters>,
}

/// Snapshot the current counter state.
#[must_use]
pub(crate) fn report() -> CounterReport {
    STATE.with_borrow(|state| CounterReport {
        ops: state.ops,
        entities: state.entities.clone(),
    })
}

/// Reset all counter state.
pub(crate) fn reset_all() {
    STATE.with_borrow_mut(|state| *state = CounterState::default());
}
