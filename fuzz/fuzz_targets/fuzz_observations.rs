#![no_main]

use broiler_growth_forecaster::analysis::build_features;
use broiler_growth_forecaster::io::{read_observations_csv_from_bytes, read_observations_json_from_bytes};
use broiler_growth_forecaster::models::Scenario;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for observations in [
        read_observations_csv_from_bytes(data),
        read_observations_json_from_bytes(data),
    ]
    .into_iter()
    .flatten()
    {
        for scenario in [Scenario::SingleDayVector, Scenario::A, Scenario::B] {
            let _ = build_features(scenario, &observations);
        }
    }
});
