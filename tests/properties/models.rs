//! Model generators shared by the property tests.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use strata::domain::value_objects::ComponentType;
use strata::{Component, Host, Model};

const REGIONS: &[&str] = &["r0", "r1"];
const INSTANCE_TYPES: &[&str] = &["small", "large"];
const COMPONENT_TYPES: &[&str] = &["generic", "ziti-router", "ziti-controller"];

/// host index -> (region index, instance type, component index -> type)
type HostSpec = (usize, &'static str, BTreeMap<u8, &'static str>);

fn host_spec() -> impl Strategy<Value = HostSpec> {
    (
        0..REGIONS.len(),
        prop::sample::select(INSTANCE_TYPES),
        prop::collection::btree_map(0..4u8, prop::sample::select(COMPONENT_TYPES), 0..4),
    )
}

/// Random model for instance `t1` with up to six hosts.
pub fn arb_model() -> impl Strategy<Value = Model> {
    prop::collection::btree_map(0..6u8, host_spec(), 0..6).prop_map(build)
}

fn build(hosts: BTreeMap<u8, HostSpec>) -> Model {
    let mut model = Model::new("t1");
    for (host, (region, instance_type, components)) in hosts {
        let host = components.into_iter().fold(
            Host::new(format!("h{host}")).with_instance_type(instance_type),
            |host, (component, label)| {
                host.with_component(Component::new(
                    format!("c{component}"),
                    ComponentType::labelled(label),
                ))
            },
        );
        model.region_entry(REGIONS[region]).insert_host(host);
    }
    model
}

pub fn host_ids(model: &Model) -> BTreeSet<String> {
    model.hosts().map(|h| h.id.clone()).collect()
}

/// Every resource id the model produces: `<host>` and `<host>/<component>`.
pub fn resource_ids(model: &Model) -> BTreeSet<String> {
    model
        .hosts()
        .flat_map(|h| {
            std::iter::once(h.id.clone())
                .chain(h.components.keys().map(move |c| format!("{}/{c}", h.id)))
        })
        .collect()
}

#[test]
fn build_places_hosts_in_their_region() {
    let mut hosts = BTreeMap::new();
    hosts.insert(3, (1, "small", BTreeMap::from([(0, "generic")])));
    let model = build(hosts);

    let host = model.host("h3").unwrap();
    assert_eq!(host.region_id, "r1");
    assert_eq!(resource_ids(&model), BTreeSet::from(["h3".into(), "h3/c0".into()]));
}
