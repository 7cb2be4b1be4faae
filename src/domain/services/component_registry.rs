//! Component type registry
//!
//! Maps type names to factories producing fresh [`ComponentType`] values.
//! Built once at startup and shared by reference; registration after that
//! point is allowed but expected to be rare.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::value_objects::{
    ComponentType, ControllerComponent, GenericComponent, RouterComponent, CONTROLLER_LABEL,
    GENERIC_LABEL, ROUTER_LABEL,
};

/// Produces a fresh component type value on every lookup
pub type ComponentFactory = Box<dyn Fn() -> ComponentType + Send + Sync>;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("component type '{name}' is already registered")]
    DuplicateRegistration { name: String },

    #[error("unknown component type '{name}'. Valid types: {}", .known.join(", "))]
    UnknownComponentType { name: String, known: Vec<String> },
}

#[derive(Default)]
pub struct ComponentRegistry {
    factories: RwLock<BTreeMap<String, ComponentFactory>>,
}

impl ComponentRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the generic, controller and router types.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        let builtins: [(&str, ComponentFactory); 3] = [
            (
                GENERIC_LABEL,
                Box::new(|| ComponentType::Generic(GenericComponent::default())),
            ),
            (
                CONTROLLER_LABEL,
                Box::new(|| ComponentType::Controller(ControllerComponent::default())),
            ),
            (
                ROUTER_LABEL,
                Box::new(|| ComponentType::Router(RouterComponent::default())),
            ),
        ];
        {
            let mut factories = registry
                .factories
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for (name, factory) in builtins {
                factories.insert(name.to_string(), factory);
            }
        }
        registry
    }

    /// Registers a factory under `name`. Fails if the name is taken.
    pub fn register<F>(&self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> ComponentType + Send + Sync + 'static,
    {
        let name = name.into();
        // Entries are only ever inserted whole, so a poisoned map is still consistent.
        let mut factories = self
            .factories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if factories.contains_key(&name) {
            return Err(RegistryError::DuplicateRegistration { name });
        }
        tracing::debug!(component_type = %name, "registered component type");
        factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// A freshly constructed component type for `name`.
    pub fn lookup(&self, name: &str) -> Result<ComponentType, RegistryError> {
        let factories = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match factories.get(name) {
            Some(factory) => Ok(factory()),
            None => Err(RegistryError::UnknownComponentType {
                name: name.to_string(),
                known: factories.keys().cloned().collect(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_names(&self) -> Vec<String> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("names", &self.list_names())
            .finish()
    }
}
