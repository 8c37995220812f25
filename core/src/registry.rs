//! Process-wide type registry.
//!
//! Maps registered type names to their descriptors. Written once per name
//! at definition time (startup-phase by convention) and read on every
//! discriminator lookup and reference resolution afterwards, so the store
//! is a reader-writer lock over a `HashMap`.
//!
//! Re-defining a name is last-define-wins: a `warn`-level diagnostic is
//! emitted and the entry replaced. Instances built against the previous
//! descriptor keep their own handle and continue to work.

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::report::{self, Level};
use crate::types::TypeRef;

static REGISTRY: LazyLock<RwLock<HashMap<String, TypeRef>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Looks up a registered type by name.
pub fn get(name: &str) -> Option<TypeRef> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Whether a type name is registered.
pub fn is_defined(name: &str) -> bool {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(name)
}

pub(crate) fn register(name: &str, ty: TypeRef) {
    let previous = REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_string(), ty);
    if previous.is_some() {
        report::report(
            Level::Warn,
            "core3.define",
            &format!("Type {name} is already defined, overriding the previous definition"),
        );
    }
    tracing::debug!(type_name = name, "registered type");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldSpec, string};
    use crate::define;

    #[test]
    fn test_lookup_round_trip() {
        let ty = define::define("RegistryRoundTrip", || {
            FieldSpec::new().field("name", string())
        })
        .unwrap();

        let found = get("RegistryRoundTrip").unwrap();
        assert!(std::sync::Arc::ptr_eq(&ty, &found));
        assert!(is_defined("RegistryRoundTrip"));
        assert!(get("RegistryNeverDefined").is_none());
    }
}
