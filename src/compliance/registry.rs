//! Catalog of named compliance modes.
//!
//! Built in two phases: a [`ModeRegistryBuilder`] accepts registrations at
//! startup, then [`ModeRegistryBuilder::build`] freezes it into a
//! [`ModeRegistry`] that only supports lookups.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::compliance::mode::{builtin_modes, ComplianceMode};
use crate::compliance::violation::ViolationKind;

/// Errors raised while building or querying the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A mode with this name is already registered.
    #[error("compliance mode already registered: {0}")]
    DuplicateModeName(String),

    /// No mode with this name exists.
    #[error("unknown compliance mode: {0}")]
    UnknownMode(String),
}

/// Startup-time registration surface.
#[derive(Debug, Default)]
pub struct ModeRegistryBuilder {
    modes: Vec<Arc<ComplianceMode>>,
}

impl ModeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the built-in modes.
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        for mode in builtin_modes() {
            builder.modes.push(Arc::new(mode));
        }
        builder
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        tolerated: impl IntoIterator<Item = ViolationKind>,
    ) -> Result<Arc<ComplianceMode>, RegistryError> {
        let mode = ComplianceMode::new(name, tolerated);
        if self.modes.iter().any(|m| m.name() == mode.name()) {
            return Err(RegistryError::DuplicateModeName(mode.name().to_string()));
        }

        tracing::debug!(mode = %mode, "Registered compliance mode");
        let mode = Arc::new(mode);
        self.modes.push(mode.clone());
        Ok(mode)
    }

    pub fn build(self) -> ModeRegistry {
        let order = self.modes.iter().map(|m| m.name().to_string()).collect();
        let modes = self
            .modes
            .into_iter()
            .map(|m| (m.name().to_string(), m))
            .collect();
        ModeRegistry { modes, order }
    }
}

/// Frozen, read-only catalog of compliance modes.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    modes: HashMap<String, Arc<ComplianceMode>>,
    order: Vec<String>,
}

impl ModeRegistry {
    pub fn lookup(&self, name: &str) -> Result<Arc<ComplianceMode>, RegistryError> {
        self.modes
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownMode(name.to_string()))
    }

    /// Mode names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ComplianceMode>> {
        self.order.iter().filter_map(|name| self.modes.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::mode::{LEGACY, RFC6265, RFC6265_WITH_VIOLATIONS};

    #[test]
    fn test_register_and_lookup() {
        let mut builder = ModeRegistryBuilder::new();
        builder
            .register("HOST_LENIENT", [ViolationKind::DuplicateHostHeaders])
            .unwrap();
        let registry = builder.build();

        let mode = registry.lookup("HOST_LENIENT").unwrap();
        assert!(mode.tolerates(ViolationKind::DuplicateHostHeaders));
        assert!(!mode.tolerates(ViolationKind::BadQuotes));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut builder = ModeRegistryBuilder::with_builtins();
        let err = builder.register(RFC6265, []).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateModeName(RFC6265.to_string()));
    }

    #[test]
    fn test_unknown_mode() {
        let registry = ModeRegistryBuilder::with_builtins().build();
        let err = registry.lookup("RFC9999").unwrap_err();
        assert_eq!(err, RegistryError::UnknownMode("RFC9999".to_string()));
        assert_eq!(err.to_string(), "unknown compliance mode: RFC9999");
    }

    #[test]
    fn test_builtins_keep_registration_order() {
        let mut builder = ModeRegistryBuilder::with_builtins();
        builder.register("CUSTOM", [ViolationKind::BadQuotes]).unwrap();
        let registry = builder.build();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec![RFC6265, RFC6265_WITH_VIOLATIONS, LEGACY, "CUSTOM"]);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.iter().count(), 4);
    }

    #[test]
    fn test_lookups_share_the_same_mode() {
        let registry = ModeRegistryBuilder::with_builtins().build();
        let a = registry.lookup(RFC6265).unwrap();
        let b = registry.lookup(RFC6265).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let registry = Arc::new(ModeRegistryBuilder::with_builtins().build());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.lookup(LEGACY).unwrap().is_strict())
            })
            .collect();
        for handle in handles {
            assert!(!handle.join().unwrap());
        }
    }
}
