//! Command handlers for the `strata` binary.

pub mod apply;
pub mod inspect;
pub mod plan;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use strata::config::{self, Config, ConfigWarning};
use strata::domain::services::ComponentRegistry;
use strata::domain::ports::ModelLoader;
use strata::presentation::factory;
use strata::presentation::output::{create_renderer, supports_unicode, OutputFormat, Renderer};
use strata::Model;

/// Everything a command needs, built once from the CLI flags and config.
pub struct Runtime {
    pub config: Config,
    pub registry: Arc<ComponentRegistry>,
    pub renderer: Box<dyn Renderer>,
}

impl Runtime {
    pub fn new(config: Config, json: bool, verbose: u8) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        Self {
            config,
            registry: factory::create_registry(),
            renderer: create_renderer(format, supports_unicode(), verbose),
        }
    }

    pub fn loader(&self) -> strata::YamlModelLoader {
        factory::create_loader(Arc::clone(&self.registry))
    }

    pub fn load_model(&self, file: &Path) -> Result<Model> {
        self.loader()
            .load(file)
            .with_context(|| format!("failed to load model from {}", file.display()))
    }
}

pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Vec<ConfigWarning>)> {
    let (config, _path, warnings) =
        config::load_resolved(explicit).context("failed to load configuration")?;
    Ok((config, warnings))
}
