#![no_main]

use libfuzzer_sys::fuzz_target;
use strata::application::rebuild_model;
use strata::domain::ports::ResourceMap;

fuzz_target!(|data: &[u8]| {
    // Whatever a resources document holds, rebuilding a model from it must not panic.
    if let Ok(resources) = serde_json::from_slice::<ResourceMap>(data) {
        let model = rebuild_model("fuzz", &resources);
        let _ = strata::compute_diff(&model, &model);
    }
});
