//! Interceptor runtime: the per-instance object that mediates every
//! intercepted attribute access, driving lazy-load-on-first-access and
//! dirty-state tracking.
//!
//! Instances are persistence-context-bound and single-threaded by contract;
//! interior mutability is `RefCell`, never a lock, and concurrent access to
//! one instance must be serialized by the caller.


use crate::{
    enhance::EnhancedType,
    error::{InterceptError, InternalError},
    obs::sink::{self, AccessEvent},
    traits::{EntityHandle, EntityState, PersistenceContext},
    value::Value,
};
use derive_more::Display;
use std::{cell::RefCell, rc::Rc, sync::Arc};

///
/// LoadState
///
/// Per-attribute materialization state. Only lazy attributes ever start
/// `Absent`; everything else begins and remains `Loaded`.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum LoadState {
    Absent,
    Loading,
    Loaded,
}

///
/// InterceptorState
///
/// Runtime bookkeeping for one materialized instance: one slot per
/// attribute, indexed in descriptor order. The owning instance holds the
/// interceptor's lifetime, never the other way around.
///

#[derive(Debug)]
pub struct InterceptorState {
    slots: Vec<AttributeSlot>,
}

#[derive(Clone, Copy, Debug)]
struct AttributeSlot {
    load: LoadState,
    dirty: bool,
}

impl InterceptorState {
    fn for_type(ty: &EnhancedType, freshly_constructed: bool) -> Self {
        let slots = (0..ty.descriptor().attributes().len())
            .map(|index| {
                let shim = ty.shim(index);
                let load = if shim.lazy && !freshly_constructed {
                    LoadState::Absent
                } else {
                    LoadState::Loaded
                };

                AttributeSlot { load, dirty: false }
            })
            .collect();

        Self { slots }
    }

    fn slot(&self, index: usize) -> &AttributeSlot {
        &self.slots[index]
    }

    fn slot_mut(&mut self, index: usize) -> &mut AttributeSlot {
        &mut self.slots[index]
    }
}

///
/// EnhancedEntity
///
/// A materialized instance of an enhanced type: application state plus the
/// interceptor mediating every access to it. This is the surface the
/// enhancement rewrite funnels all attribute reads and writes through.
///

pub struct EnhancedEntity<S: EntityState> {
    ty: Arc<EnhancedType>,
    state: RefCell<S>,
    interceptor: RefCell<InterceptorState>,
    context: Rc<dyn PersistenceContext>,
}

impl<S: EntityState> EnhancedEntity<S> {
    pub(crate) fn materialize(
        ty: Arc<EnhancedType>,
        state: S,
        context: Rc<dyn PersistenceContext>,
        freshly_constructed: bool,
    ) -> Self {
        let interceptor = InterceptorState::for_type(&ty, freshly_constructed);

        Self {
            ty,
            state: RefCell::new(state),
            interceptor: RefCell::new(interceptor),
            context,
        }
    }

    #[must_use]
    pub const fn enhanced_type(&self) -> &Arc<EnhancedType> {
        &self.ty
    }

    /// Intercepted read.
    ///
    /// For a lazy attribute still absent, the fetch callback runs
    /// synchronously before the read falls through to the access point. A
    /// re-entrant read of the same attribute during that fetch fails
    /// instead of recursing.
    pub fn get(&self, attribute: &str) -> Result<Value, InternalError> {
        let index = self.index_of(attribute)?;
        let shim = *self.ty.shim(index);

        if shim.intercepted {
            self.ensure_loaded(index, attribute)?;
        }

        shim.read_through(attribute, &*self.state.borrow())
    }

    /// Intercepted write.
    ///
    /// The value is stored through the attribute's access point; on success
    /// the slot is promoted to `Loaded` (a write supersedes any pending
    /// fetch) and marked dirty, notifying the context on the first dirty
    /// transition within the current unit of work.
    pub fn set(&self, attribute: &str, value: Value) -> Result<(), InternalError> {
        let index = self.index_of(attribute)?;
        let shim = *self.ty.shim(index);

        if !shim.writable {
            return Err(InterceptError::read_only(self.ty.type_path(), attribute).into());
        }
        if shim.intercepted && self.interceptor.borrow().slot(index).load == LoadState::Loading {
            return Err(InterceptError::reentrant_load(self.ty.type_path(), attribute).into());
        }

        shim.write_through(attribute, &mut *self.state.borrow_mut(), value)?;

        if shim.intercepted {
            let first_dirty = {
                let mut interceptor = self.interceptor.borrow_mut();
                let slot = interceptor.slot_mut(index);
                slot.load = LoadState::Loaded;
                let first = !slot.dirty;
                slot.dirty = true;

                first
            };

            if first_dirty {
                sink::record(AccessEvent::FirstDirty {
                    type_path: self.ty.type_path(),
                    attribute,
                });
                self.context.on_first_dirty(self, attribute);
            }
        }

        Ok(())
    }

    /// Names of attributes mutated since the last synchronization, in
    /// declaration order.
    #[must_use]
    pub fn dirty_attributes(&self) -> Vec<String> {
        let interceptor = self.interceptor.borrow();

        self.ty
            .descriptor()
            .attributes()
            .iter()
            .enumerate()
            .filter(|(index, _)| interceptor.slot(*index).dirty)
            .map(|(_, attribute)| attribute.name.clone())
            .collect()
    }

    #[must_use]
    pub fn is_dirty(&self, attribute: &str) -> bool {
        self.ty
            .descriptor()
            .index_of(attribute)
            .is_some_and(|index| self.interceptor.borrow().slot(index).dirty)
    }

    #[must_use]
    pub fn load_state(&self, attribute: &str) -> Option<LoadState> {
        self.ty
            .descriptor()
            .index_of(attribute)
            .map(|index| self.interceptor.borrow().slot(index).load)
    }

    /// Empty the dirty set after a successful synchronization to storage.
    pub fn clear_dirty(&self) {
        let cleared = {
            let mut interceptor = self.interceptor.borrow_mut();
            let mut cleared = 0u64;
            for slot in &mut interceptor.slots {
                if slot.dirty {
                    slot.dirty = false;
                    cleared += 1;
                }
            }

            cleared
        };

        sink::record(AccessEvent::ClearDirty {
            type_path: self.ty.type_path(),
            cleared,
        });
    }

    /// Detach from the persistence context, dissolving the interceptor and
    /// returning the raw application state.
    #[must_use]
    pub fn detach(self) -> S {
        self.state.into_inner()
    }

    /// Inspect the raw application state without interception.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    fn index_of(&self, attribute: &str) -> Result<usize, InternalError> {
        self.ty
            .descriptor()
            .index_of(attribute)
            .ok_or_else(|| InterceptError::unknown_attribute(self.ty.type_path(), attribute).into())
    }

    // Drive the ABSENT -> LOADING -> LOADED transition for one slot. The
    // interceptor borrow is dropped before the fetch callback runs so the
    // callback can read other attributes through the handle.
    fn ensure_loaded(&self, index: usize, attribute: &str) -> Result<(), InternalError> {
        {
            let mut interceptor = self.interceptor.borrow_mut();
            match interceptor.slot(index).load {
                LoadState::Loaded => return Ok(()),
                LoadState::Loading => {
                    return Err(
                        InterceptError::reentrant_load(self.ty.type_path(), attribute).into(),
                    );
                }
                LoadState::Absent => interceptor.slot_mut(index).load = LoadState::Loading,
            }
        }

        let fetched = self.context.fetch_lazy_value(self, attribute);

        let value = match fetched {
            Ok(value) => value,
            Err(err) => {
                // Fetch failed: restore ABSENT so this slot (and no other)
                // reflects the failure, and leave retrying to the caller.
                self.interceptor.borrow_mut().slot_mut(index).load = LoadState::Absent;
                return Err(err);
            }
        };

        let shim = *self.ty.shim(index);
        if let Err(err) = shim.write_through(attribute, &mut *self.state.borrow_mut(), value) {
            self.interceptor.borrow_mut().slot_mut(index).load = LoadState::Absent;
            return Err(err);
        }

        self.interceptor.borrow_mut().slot_mut(index).load = LoadState::Loaded;
        sink::record(AccessEvent::LazyFetch {
            type_path: self.ty.type_path(),
            attribute,
        });

        Ok(())
    }
}

impl<S: EntityState> EntityHandle for EnhancedEntity<S> {
    fn type_path(&self) -> &str {
        self.ty.type_path()
    }

    fn identifier(&self) -> Result<Value, InternalError> {
        let name = self.ty.descriptor().identifier().name.clone();

        self.get(&name)
    }

    fn read(&self, attribute: &str) -> Result<Value, InternalError> {
        self.get(attribute)
    }
}
