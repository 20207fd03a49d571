//! Core runtime for RimeDB: enhancement of entity types and the
//! per-instance interception runtime that drives lazy loads and dirty
//! tracking, plus the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod enhance;
pub mod error;
pub mod intercept;
pub mod obs;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No sinks, registries, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        enhance::{EnhancedType, enhance},
        intercept::{EnhancedEntity, LoadState},
        traits::{EntityHandle, EntityState, PersistenceContext},
        value::Value,
    };
    pub use rimedb_schema::{
        node::{ClassDeclaration, EntityTypeDescriptor},
        resolve::resolve_access,
        types::{AccessKind, FetchKind},
    };
}
