//! Read-only commands over the configured store.

use anyhow::{Context, Result};
use strata::presentation::factory;
use strata::{ResourceStore, StatusStore};

use super::Runtime;

pub fn cmd_instances(rt: &Runtime) -> Result<()> {
    let store = factory::create_store(&rt.config);
    let ids = store.list_instances().context("failed to list instances")?;
    print!("{}", rt.renderer.instances(&ids));
    Ok(())
}

pub fn cmd_status(rt: &Runtime, instance: &str) -> Result<()> {
    let store = factory::create_store(&rt.config);
    let label = store
        .get_status(instance)
        .with_context(|| format!("failed to read status of instance [{instance}]"))?;
    print!("{}", rt.renderer.status(&label));
    Ok(())
}

pub fn cmd_resources(rt: &Runtime, instance: &str) -> Result<()> {
    let store = factory::create_store(&rt.config);
    let resources = store
        .get_resources(instance)
        .with_context(|| format!("failed to read resources of instance [{instance}]"))?;
    print!("{}", rt.renderer.resources(instance, &resources));
    Ok(())
}

pub fn cmd_types(rt: &Runtime) -> Result<()> {
    print!("{}", rt.renderer.types(&rt.registry.list_names()));
    Ok(())
}
