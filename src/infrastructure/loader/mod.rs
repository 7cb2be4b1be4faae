//! Model Loaders
//!
//! Implementations of the `ModelLoader` port.

mod yaml;

pub use yaml::{is_valid_id, YamlModelLoader};
