//! Process-wide enhanced-type cache.
//!
//! Enhancement is a one-time transformation performed before any instance
//! exists. The cache is keyed by stable type identity and populated exactly
//! once per type: racing initialization paths converge on whichever insert
//! wins, and the loser's freshly built type is discarded.

use crate::{
    enhance::EnhancedType,
    error::InternalError,
    obs::sink::{self, AccessEvent},
};
use rimedb_schema::{node::ClassDeclaration, resolve::resolve_access};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

static REGISTRY: LazyLock<RwLock<HashMap<String, Arc<EnhancedType>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

pub(crate) fn enhance(class: &ClassDeclaration) -> Result<Arc<EnhancedType>, InternalError> {
    if let Some(cached) = lookup(&class.type_path) {
        sink::record(AccessEvent::EnhanceCached {
            type_path: &class.type_path,
        });

        return Ok(cached);
    }

    // Resolution and the rewrite run outside the lock; only the publish
    // step is serialized.
    let descriptor = resolve_access(class)?;
    let enhanced = EnhancedType::build(descriptor)?;

    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    match registry.entry(class.type_path.clone()) {
        std::collections::hash_map::Entry::Occupied(entry) => {
            // Lost the race: the first insert wins and this build is dropped.
            let winner = entry.get().clone();
            drop(registry);

            sink::record(AccessEvent::EnhanceCached {
                type_path: &class.type_path,
            });

            Ok(winner)
        }
        std::collections::hash_map::Entry::Vacant(entry) => {
            let enhanced = Arc::new(enhanced);
            entry.insert(enhanced.clone());
            drop(registry);

            sink::record(AccessEvent::Enhance {
                type_path: &class.type_path,
                attributes: enhanced.descriptor().attributes().len() as u64,
            });

            Ok(enhanced)
        }
    }
}

/// Look up an already-enhanced type by its stable type path.
#[must_use]
pub(crate) fn lookup(type_path: &str) -> Option<Arc<EnhancedType>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(type_path)
        .cloned()
}

/// Type paths enhanced so far, in stable order.
#[must_use]
pub fn enhanced_types() -> Vec<String> {
    let mut paths: Vec<String> = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect();
    paths.sort_unstable();

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimedb_schema::node::FieldDeclaration;

    fn class(type_path: &str) -> ClassDeclaration {
        ClassDeclaration::new(type_path).field(FieldDeclaration::new("id").identifier())
    }

    #[test]
    fn enhancement_is_idempotent_per_type_path() {
        let class = class("registry::tests::Idem");

        let first = enhance(&class).unwrap();
        let second = enhance(&class).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_enhancement_is_not_cached() {
        let broken = ClassDeclaration::new("registry::tests::Broken")
            .field(FieldDeclaration::new("label"));

        assert!(enhance(&broken).is_err());
        assert!(lookup("registry::tests::Broken").is_none());

        // A corrected declaration under the same path can still enhance.
        let fixed = class("registry::tests::Broken");
        assert!(enhance(&fixed).is_ok());
    }

    #[test]
    fn racing_enhancements_converge_on_one_type() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    let class = class("registry::tests::Raced");
                    let enhanced = enhance(&class).unwrap();
                    Arc::as_ptr(&enhanced) as usize
                })
            })
            .collect();

        let pointers: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn enhanced_types_reports_sorted_paths() {
        enhance(&class("registry::tests::ReportB")).unwrap();
        enhance(&class("registry::tests::ReportA")).unwrap();

        let paths = enhanced_types();
        let b = paths.iter().position(|p| p == "registry::tests::ReportB");
        let a = paths.iter().position(|p| p == "registry::tests::ReportA");
        assert!(a.unwrap() < b.unwrap());
    }
}
