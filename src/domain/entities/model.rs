//! Infrastructure model entity
//!
//! A [`Model`] is a tree of regions, hosts and components describing either
//! the desired configuration or the state rebuilt from persisted resources.
//! Trees are built per reconciliation and thrown away after diffing.
//!
//! Ownership flows strictly downwards. A host remembers the id of its region
//! so callers can look the region up through the owning [`Model`], but the
//! host never holds the region itself.

use std::collections::BTreeMap;

use crate::domain::value_objects::ComponentType;

/// Region id used when a persisted host carries no region
pub const DEFAULT_REGION: &str = "default";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub id: String,
    pub regions: BTreeMap<String, Region>,
}

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            regions: BTreeMap::new(),
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.insert_region(region);
        self
    }

    pub fn insert_region(&mut self, region: Region) {
        self.regions.insert(region.id.clone(), region);
    }

    /// Region with the given id, created empty if missing.
    pub fn region_entry(&mut self, region_id: &str) -> &mut Region {
        self.regions
            .entry(region_id.to_string())
            .or_insert_with(|| Region::new(region_id))
    }

    /// Every host across all regions.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.regions.values().flat_map(|r| r.hosts.values())
    }

    /// Looks a host up by its model-wide id.
    pub fn host(&self, host_id: &str) -> Option<&Host> {
        self.regions.values().find_map(|r| r.hosts.get(host_id))
    }

    pub fn host_mut(&mut self, host_id: &str) -> Option<&mut Host> {
        self.regions
            .values_mut()
            .find_map(|r| r.hosts.get_mut(host_id))
    }

    /// The region a host belongs to, resolved by id.
    pub fn region_of(&self, host: &Host) -> Option<&Region> {
        self.regions.get(&host.region_id)
    }

    pub fn host_count(&self) -> usize {
        self.regions.values().map(|r| r.hosts.len()).sum()
    }

    pub fn component_count(&self) -> usize {
        self.hosts().map(|h| h.components.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.host_count() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    pub id: String,
    pub site: Option<String>,
    pub hosts: BTreeMap<String, Host>,
}

impl Region {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            site: None,
            hosts: BTreeMap::new(),
        }
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_host(mut self, host: Host) -> Self {
        self.insert_host(host);
        self
    }

    /// Adds a host, pointing its region back-reference at this region.
    pub fn insert_host(&mut self, mut host: Host) {
        host.region_id = self.id.clone();
        self.hosts.insert(host.id.clone(), host);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Host {
    /// Unique across the whole model
    pub id: String,
    pub instance_type: String,
    pub components: BTreeMap<String, Component>,
    /// Id of the owning region; informational only
    pub region_id: String,
}

impl Host {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = instance_type.into();
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.insert_component(component);
        self
    }

    pub fn insert_component(&mut self, component: Component) {
        self.components.insert(component.id.clone(), component);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Unique within the owning host
    pub id: String,
    pub component_type: ComponentType,
}

impl Component {
    pub fn new(id: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            id: id.into(),
            component_type,
        }
    }
}
