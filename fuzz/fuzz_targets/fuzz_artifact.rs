#![no_main]

use broiler_growth_forecaster::regression::{parse_artifact, Regressor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that parses and validates must predict without panicking.
    if let Ok(artifact) = parse_artifact(data, "fuzz") {
        let features = vec![1000.0; artifact.n_features()];
        let outputs = artifact.predict(&features);
        assert_eq!(outputs.len(), artifact.n_outputs());
    }
});
