//! Schema layer for RimeDB: raw declaration metadata, merged attribute
//! descriptors, and the access-strategy resolver that computes how the
//! persistence runtime reaches each attribute.

pub mod build;
pub mod error;
pub mod node;
pub mod resolve;
pub mod types;

/// Maximum length for attribute identifiers.
pub const MAX_ATTRIBUTE_NAME_LEN: usize = 64;

/// Maximum length for entity type paths.
pub const MAX_TYPE_PATH_LEN: usize = 256;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        error::ResolveError,
        node::{
            AccessorDeclaration, AttributeDescriptor, ClassDeclaration, EntityTypeDescriptor,
            FieldDeclaration, ResolvedAttribute,
        },
        resolve::resolve_access,
        types::{AccessKind, FetchKind},
    };
    pub use serde::{Deserialize, Serialize};
}
