//! RimeDB — Attribute Access Resolution & Interception for Entities
//!
//! This is the public meta-crate. Downstream users depend on **rimedb** only.
//!
//! It re-exports the stable public API from:
//!   - `rimedb-schema`  (declaration metadata, descriptors, access resolution)
//!   - `rimedb-core`    (enhancement, interceptor runtime, observability)

pub use rimedb_core as core;
pub use rimedb_schema as schema;

//
// Prelude
//

pub mod prelude {
    pub use rimedb_core::prelude::*;
}
