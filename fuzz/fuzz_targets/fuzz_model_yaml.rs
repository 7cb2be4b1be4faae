#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use strata::{ComponentRegistry, YamlModelLoader};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let loader = YamlModelLoader::new(Arc::new(ComponentRegistry::with_builtins()));
        // Validation and loading must agree: a model loads iff it validates.
        let valid = loader.validate_str(content).map(|r| r.is_valid());
        let loaded = loader.load_str(content);
        if let Ok(valid) = valid {
            assert_eq!(valid, loaded.is_ok());
        }
    }
});
