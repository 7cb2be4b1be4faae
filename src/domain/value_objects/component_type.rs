//! Component type value object
//!
//! A component's behavior is a closed set of variants. Every variant supports
//! the base capabilities in [`ComponentBehavior`]; starting a component is a
//! narrower capability exposed through [`ComponentType::as_startable`].

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::domain::ports::{ProcessControl, ProcessError};

/// Label of the built-in generic component type
pub const GENERIC_LABEL: &str = "generic";
/// Label of the controller component type
pub const CONTROLLER_LABEL: &str = "ziti-controller";
/// Label of the router component type
pub const ROUTER_LABEL: &str = "ziti-router";

/// Everything a behavior needs to act on one deployed component.
#[derive(Clone, Copy)]
pub struct ComponentContext<'a> {
    pub host_id: &'a str,
    pub component_id: &'a str,
    /// Working directory of the instance on the host
    pub working_dir: &'a Path,
    pub process: &'a dyn ProcessControl,
}

/// Capabilities shared by every component type.
pub trait ComponentBehavior {
    /// Type label, used as the component's "shape" when diffing
    fn label(&self) -> &str;

    fn version(&self) -> &str;

    /// Serializable snapshot of the type's settings
    fn dump(&self) -> Value;

    fn is_running(&self, ctx: &ComponentContext<'_>) -> Result<bool, ProcessError>;

    fn stop(&self, ctx: &ComponentContext<'_>) -> Result<(), ProcessError>;
}

/// Optional capability for component types that can be launched.
pub trait Startable: ComponentBehavior {
    fn start(&self, ctx: &ComponentContext<'_>) -> Result<(), ProcessError>;
}

/// Polymorphic component behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentType {
    Controller(ControllerComponent),
    Router(RouterComponent),
    Generic(GenericComponent),
}

impl ComponentType {
    /// Generic component carrying an arbitrary label.
    ///
    /// Used when rebuilding components from persisted resources, where only the
    /// label survives.
    pub fn labelled(label: impl Into<String>) -> Self {
        ComponentType::Generic(GenericComponent {
            kind: label.into(),
            version: String::new(),
        })
    }

    /// Returns the start capability if this variant has one.
    pub fn as_startable(&self) -> Option<&dyn Startable> {
        match self {
            ComponentType::Controller(c) => Some(c),
            ComponentType::Router(r) => Some(r),
            ComponentType::Generic(_) => None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        match &mut self {
            ComponentType::Controller(c) => c.version = version,
            ComponentType::Router(r) => r.version = version,
            ComponentType::Generic(g) => g.version = version,
        }
        self
    }

    /// Sets the router mode. Returns `false` for variants without a mode.
    pub fn set_mode(&mut self, mode: RouterMode) -> bool {
        match self {
            ComponentType::Router(r) => {
                r.mode = mode;
                true
            }
            _ => false,
        }
    }

    fn behavior(&self) -> &dyn ComponentBehavior {
        match self {
            ComponentType::Controller(c) => c,
            ComponentType::Router(r) => r,
            ComponentType::Generic(g) => g,
        }
    }
}

impl ComponentBehavior for ComponentType {
    fn label(&self) -> &str {
        self.behavior().label()
    }

    fn version(&self) -> &str {
        self.behavior().version()
    }

    fn dump(&self) -> Value {
        self.behavior().dump()
    }

    fn is_running(&self, ctx: &ComponentContext<'_>) -> Result<bool, ProcessError> {
        self.behavior().is_running(ctx)
    }

    fn stop(&self, ctx: &ComponentContext<'_>) -> Result<(), ProcessError> {
        self.behavior().stop(ctx)
    }
}

/// Controller process managed on a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControllerComponent {
    pub version: String,
}

impl ComponentBehavior for ControllerComponent {
    fn label(&self) -> &str {
        CONTROLLER_LABEL
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn dump(&self) -> Value {
        serde_json::json!({ "version": self.version })
    }

    fn is_running(&self, ctx: &ComponentContext<'_>) -> Result<bool, ProcessError> {
        process_running(ctx, CONTROLLER_LABEL)
    }

    fn stop(&self, ctx: &ComponentContext<'_>) -> Result<(), ProcessError> {
        ctx.process
            .kill_processes(ctx.host_id, "-TERM", CONTROLLER_LABEL)
    }
}

impl Startable for ControllerComponent {
    fn start(&self, ctx: &ComponentContext<'_>) -> Result<(), ProcessError> {
        // A stale process may still hold the ports; failing to stop it is not fatal.
        let _ = self.stop(ctx);

        let wd = ctx.working_dir.display();
        let command = format!(
            "nohup {wd}/bin/ziti-controller run {wd}/cfg/controller.yml > {wd}/logs/controller.log 2>&1 &"
        );
        ctx.process.exec(ctx.host_id, &command).map(|_| ())
    }
}

/// Router operating mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
    #[default]
    Edge,
    Fabric,
}

impl RouterMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "edge" => Some(RouterMode::Edge),
            "fabric" => Some(RouterMode::Fabric),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouterMode::Edge => "edge",
            RouterMode::Fabric => "fabric",
        }
    }
}

/// Router process managed on a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouterComponent {
    pub version: String,
    pub mode: RouterMode,
}

impl ComponentBehavior for RouterComponent {
    fn label(&self) -> &str {
        ROUTER_LABEL
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn dump(&self) -> Value {
        serde_json::json!({ "version": self.version, "mode": self.mode.as_str() })
    }

    fn is_running(&self, ctx: &ComponentContext<'_>) -> Result<bool, ProcessError> {
        process_running(ctx, ROUTER_LABEL)
    }

    fn stop(&self, ctx: &ComponentContext<'_>) -> Result<(), ProcessError> {
        ctx.process.kill_processes(ctx.host_id, "-TERM", ROUTER_LABEL)
    }
}

impl Startable for RouterComponent {
    fn start(&self, ctx: &ComponentContext<'_>) -> Result<(), ProcessError> {
        let _ = self.stop(ctx);

        let wd = ctx.working_dir.display();
        let id = ctx.component_id;
        let command = format!(
            "nohup {wd}/bin/ziti-router run {wd}/cfg/router-{id}.yml > {wd}/logs/router-{id}.log 2>&1 &"
        );
        ctx.process.exec(ctx.host_id, &command).map(|_| ())
    }
}

/// Component with no process management of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericComponent {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

impl Default for GenericComponent {
    fn default() -> Self {
        Self {
            kind: GENERIC_LABEL.to_string(),
            version: String::new(),
        }
    }
}

impl ComponentBehavior for GenericComponent {
    fn label(&self) -> &str {
        &self.kind
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn dump(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn is_running(&self, _ctx: &ComponentContext<'_>) -> Result<bool, ProcessError> {
        Ok(false)
    }

    fn stop(&self, _ctx: &ComponentContext<'_>) -> Result<(), ProcessError> {
        Ok(())
    }
}

fn process_running(ctx: &ComponentContext<'_>, pattern: &str) -> Result<bool, ProcessError> {
    let output = ctx
        .process
        .exec(ctx.host_id, &format!("pgrep -f {pattern} || true"))?;
    Ok(!output.trim().is_empty())
}
