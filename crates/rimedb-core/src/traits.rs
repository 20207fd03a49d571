use crate::{error::InternalError, value::Value};

// ============================================================================
// INSTANCE STORAGE BOUNDARY
// ============================================================================
//
// These traits define where attribute values live and how the runtime
// reaches them, not what the values mean.
//

///
/// EntityState
///
/// Application-side storage boundary for one entity instance: direct field
/// slots plus the original accessor bodies. Implementations never see the
/// interceptor; the enhanced type routes every access through it first.
///

pub trait EntityState {
    /// Read a field's storage slot directly.
    fn read_field(&self, attribute: &str) -> Result<Value, InternalError>;

    /// Write a field's storage slot directly.
    fn write_field(&mut self, attribute: &str, value: Value) -> Result<(), InternalError>;

    /// Run the original getter body for a property attribute.
    fn get_property(&self, attribute: &str) -> Result<Value, InternalError>;

    /// Run the original setter body for a property attribute.
    fn set_property(&mut self, attribute: &str, value: Value) -> Result<(), InternalError>;
}

///
/// EntityHandle
///
/// Read-facing view of a materialized instance, handed to persistence
/// context callbacks. Reads route through interception, which is what makes
/// a re-entrant lazy load detectable instead of silently recursive.
///

pub trait EntityHandle {
    fn type_path(&self) -> &str;

    /// The identifier attribute's current value.
    fn identifier(&self) -> Result<Value, InternalError>;

    /// Intercepted read of any attribute.
    fn read(&self, attribute: &str) -> Result<Value, InternalError>;
}

// ============================================================================
// PERSISTENCE CONTEXT CONTRACT
// ============================================================================

///
/// PersistenceContext
///
/// Outbound collaborator contract. `fetch_lazy_value` is invoked
/// synchronously from an intercepted read and must present a blocking
/// façade; retry, cancellation and timeout policy all live on the
/// collaborator side, never in this engine.
///

pub trait PersistenceContext {
    /// Produce the deferred value for a lazy attribute on first access.
    fn fetch_lazy_value(
        &self,
        entity: &dyn EntityHandle,
        attribute: &str,
    ) -> Result<Value, InternalError>;

    /// Invoked the first time an attribute enters the dirty set within a
    /// unit of work; used to schedule the instance for synchronization.
    fn on_first_dirty(&self, entity: &dyn EntityHandle, attribute: &str) {
        let _ = (entity, attribute);
    }
}
