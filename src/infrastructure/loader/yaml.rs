//! YAML Model Loader
//!
//! Reads a model document of the form:
//!
//! ```yaml
//! model: { id: t1 }
//! regions:
//!   r1:
//!     site: us-east-1a
//!     hosts:
//!       h1:
//!         instanceType: t3.micro
//!         components:
//!           - { type: ziti-router, id: c1, version: "1.0", mode: edge }
//! ```
//!
//! Validation collects every problem before reporting; loading refuses a
//! document with any error.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::{Component, Host, Model, Region};
use crate::domain::ports::{LoadError, ModelLoader, ValidationReport};
use crate::domain::services::{ComponentRegistry, RegistryError};
use crate::domain::value_objects::{RouterMode, ROUTER_LABEL};

#[derive(Debug, Default, Deserialize)]
struct Document {
    #[serde(default)]
    model: Option<ModelSection>,
    #[serde(default)]
    regions: Option<BTreeMap<String, Option<RegionSection>>>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelSection {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RegionSection {
    #[serde(default)]
    site: Option<String>,
    #[serde(default)]
    hosts: Option<BTreeMap<String, Option<HostSection>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostSection {
    #[serde(default)]
    instance_type: Option<String>,
    #[serde(default)]
    components: Option<Vec<ComponentSection>>,
}

#[derive(Debug, Default, Deserialize)]
struct ComponentSection {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

impl ComponentSection {
    fn kind(&self) -> &str {
        self.kind.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Declared id, or `<type>-<index>` when none is given.
    fn resolved_id(&self, index: usize) -> String {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{}-{}", self.kind(), index),
        }
    }
}

/// Loads models from YAML, resolving component types through a registry.
#[derive(Debug, Clone)]
pub struct YamlModelLoader {
    registry: Arc<ComponentRegistry>,
}

impl YamlModelLoader {
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn validate_str(&self, content: &str) -> Result<ValidationReport, LoadError> {
        let (document, unknown) = parse(content)?;
        let mut report = self.check(&document);
        for path in unknown {
            report.warning(path, "unknown key ignored");
        }
        Ok(report)
    }

    pub fn load_str(&self, content: &str) -> Result<Model, LoadError> {
        let (document, _) = parse(content)?;
        let report = self.check(&document);
        if !report.is_valid() {
            return Err(LoadError::Invalid(report));
        }
        self.build(&document)
    }

    fn check(&self, document: &Document) -> ValidationReport {
        let mut report = ValidationReport::default();

        match document.model.as_ref().and_then(|m| m.id.as_deref()) {
            None | Some("") => report.error("model.id", "model id is required"),
            Some(id) if !is_valid_id(id) => report.error("model.id", invalid_id_message(id)),
            Some(_) => {}
        }

        let regions = match &document.regions {
            Some(regions) if !regions.is_empty() => regions,
            _ => {
                report.warning("regions", "model defines no regions");
                return report;
            }
        };

        let mut host_owner: HashMap<&str, &str> = HashMap::new();
        for (region_id, region) in regions {
            let region_path = format!("regions.{region_id}");
            if !is_valid_id(region_id) {
                report.error(&region_path, invalid_id_message(region_id));
            }

            let hosts = region.as_ref().and_then(|r| r.hosts.as_ref());
            let Some(hosts) = hosts.filter(|h| !h.is_empty()) else {
                report.warning(&region_path, "region has no hosts");
                continue;
            };

            for (host_id, host) in hosts {
                let host_path = format!("{region_path}.hosts.{host_id}");
                if !is_valid_id(host_id) {
                    report.error(&host_path, invalid_id_message(host_id));
                }
                if let Some(owner) = host_owner.insert(host_id, region_id) {
                    report.error(
                        &host_path,
                        format!("host id '{host_id}' is already defined in region '{owner}'"),
                    );
                }

                let components = host.as_ref().and_then(|h| h.components.as_deref());
                self.check_components(components.unwrap_or_default(), &host_path, &mut report);
            }
        }

        report
    }

    fn check_components(
        &self,
        components: &[ComponentSection],
        host_path: &str,
        report: &mut ValidationReport,
    ) {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (index, component) in components.iter().enumerate() {
            let path = format!("{host_path}.components[{index}]");
            let kind = component.kind();

            if kind.is_empty() {
                report.error(format!("{path}.type"), "component type is required");
            } else if !self.registry.contains(kind) {
                report.error(
                    format!("{path}.type"),
                    RegistryError::UnknownComponentType {
                        name: kind.to_string(),
                        known: self.registry.list_names(),
                    }
                    .to_string(),
                );
            }

            if let Some(id) = component.id.as_deref() {
                if !is_valid_id(id) {
                    report.error(format!("{path}.id"), invalid_id_message(id));
                }
            }

            if let Some(mode) = component.mode.as_deref() {
                if kind != ROUTER_LABEL {
                    report.warning(
                        format!("{path}.mode"),
                        format!("mode is ignored for component type '{kind}'"),
                    );
                } else if RouterMode::parse(mode).is_none() {
                    report.error(
                        format!("{path}.mode"),
                        format!("invalid router mode '{mode}' (expected edge or fabric)"),
                    );
                }
            }

            let id = component.resolved_id(index);
            if let Some(first) = seen.insert(id.clone(), index) {
                report.error(
                    format!("{path}.id"),
                    format!("duplicate component id '{id}' (first used at components[{first}])"),
                );
            }
        }
    }

    fn build(&self, document: &Document) -> Result<Model, LoadError> {
        let model_id = document
            .model
            .as_ref()
            .and_then(|m| m.id.clone())
            .unwrap_or_default();
        let mut model = Model::new(model_id);

        for (region_id, section) in document.regions.iter().flatten() {
            let mut region = Region::new(region_id.as_str());
            let Some(section) = section else {
                model.insert_region(region);
                continue;
            };
            region.site = section.site.clone();

            for (host_id, host_section) in section.hosts.iter().flatten() {
                let mut host = Host::new(host_id.as_str());
                if let Some(host_section) = host_section {
                    if let Some(instance_type) = &host_section.instance_type {
                        host.instance_type = instance_type.clone();
                    }
                    let components = host_section.components.as_deref().unwrap_or_default();
                    for (index, component) in components.iter().enumerate() {
                        let path = format!("regions.{region_id}.hosts.{host_id}.components[{index}]");
                        host.insert_component(self.build_component(component, index, path)?);
                    }
                }
                region.insert_host(host);
            }
            model.insert_region(region);
        }

        debug!(
            model = %model.id,
            hosts = model.host_count(),
            components = model.component_count(),
            "loaded model"
        );
        Ok(model)
    }

    fn build_component(
        &self,
        section: &ComponentSection,
        index: usize,
        path: String,
    ) -> Result<Component, LoadError> {
        let kind = section.kind();
        let mut component_type = self.registry.lookup(kind).map_err(|_| {
            LoadError::UnknownComponentType {
                name: kind.to_string(),
                path: format!("{path}.type"),
            }
        })?;
        if let Some(version) = &section.version {
            component_type = component_type.with_version(version.as_str());
        }
        if let Some(mode) = section.mode.as_deref().and_then(RouterMode::parse) {
            component_type.set_mode(mode);
        }
        Ok(Component::new(section.resolved_id(index), component_type))
    }
}

impl ModelLoader for YamlModelLoader {
    fn validate(&self, path: &Path) -> Result<ValidationReport, LoadError> {
        self.validate_str(&read(path)?)
    }

    fn load(&self, path: &Path) -> Result<Model, LoadError> {
        self.load_str(&read(path)?)
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a document, collecting the paths of keys the schema does not know.
fn parse(content: &str) -> Result<(Document, Vec<String>), LoadError> {
    if content.trim().is_empty() {
        return Ok((Document::default(), Vec::new()));
    }
    let mut unknown = Vec::new();
    let deserializer = serde_yaml_ng::Deserializer::from_str(content);
    let document: Document = serde_ignored::deserialize(deserializer, |path| {
        unknown.push(path.to_string());
    })
    .map_err(|e| LoadError::Parse {
        message: e.to_string(),
    })?;
    Ok((document, unknown))
}

/// Starts with an ASCII letter; continues with ASCII alphanumerics, `-` or `_`.
pub fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}

fn invalid_id_message(id: &str) -> String {
    format!(
        "invalid id '{id}': must start with a letter and contain only letters, digits, '-' or '_'"
    )
}
