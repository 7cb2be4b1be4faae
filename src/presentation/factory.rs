//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::Reconciler;
use crate::config::{Config, StoreBackend};
use crate::domain::ports::ResourceStore;
use crate::domain::services::ComponentRegistry;
use crate::infrastructure::{FileStore, MemoryStore, YamlModelLoader};

/// Store selected at runtime from configuration
pub type DynStore = Box<dyn ResourceStore>;

/// Type alias for the reconciler the CLI runs
pub type ConcreteReconciler = Reconciler<DynStore>;

/// Registry with the built-in component types.
pub fn create_registry() -> Arc<ComponentRegistry> {
    Arc::new(ComponentRegistry::with_builtins())
}

pub fn create_loader(registry: Arc<ComponentRegistry>) -> YamlModelLoader {
    YamlModelLoader::new(registry)
}

/// File store rooted at the configured root, with configured instances pinned
/// to their own working directories.
pub fn create_file_store(config: &Config) -> FileStore {
    config
        .instances
        .iter()
        .fold(FileStore::new(&config.store.root), |store, (id, instance)| {
            store.with_instance(id.as_str(), &instance.working_directory)
        })
}

pub fn create_store(config: &Config) -> DynStore {
    match config.store.backend {
        StoreBackend::File => Box::new(create_file_store(config)),
        StoreBackend::Memory => Box::new(MemoryStore::new()),
    }
}

/// Create a reconciler with the configured store wired up
pub fn create_reconciler(config: &Config) -> ConcreteReconciler {
    Reconciler::new(create_store(config))
}
