//! Forecast walkthrough: load the sample model store and forecast one batch
//! with every registered model.
//!
//! Run from the project root:
//!   cargo run --example forecast_walkthrough

use std::path::Path;

use broiler_growth_forecaster::analysis::{Forecaster, Selection};
use broiler_growth_forecaster::io::{CsvFormat, ObservationReader};
use broiler_growth_forecaster::models::{Algorithm, Scenario};
use broiler_growth_forecaster::registry::ModelRegistry;
use broiler_growth_forecaster::visualization::{
    print_growth_chart, print_model_table, print_prediction_table, print_target_summary,
};

const TARGET_GRAMS: f64 = 2800.0;

fn main() {
    let registry = ModelRegistry::load("data/models").expect("Failed to load model store");
    print_model_table(&registry);

    let batch = CsvFormat
        .read(Path::new("data/samples/batch_full.csv"))
        .expect("Failed to read CSV file")
        .with_batch_age(45);

    let forecaster = Forecaster::new(&registry);
    let selections = [
        Selection::Variant {
            scenario: Scenario::A,
            algorithm: Algorithm::Ridge,
        },
        Selection::Variant {
            scenario: Scenario::A,
            algorithm: Algorithm::Xgb,
        },
        Selection::Variant {
            scenario: Scenario::B,
            algorithm: Algorithm::Ridge,
        },
        Selection::Variant {
            scenario: Scenario::B,
            algorithm: Algorithm::Xgb,
        },
        Selection::DayLabels,
    ];

    for selection in selections {
        println!("\n=== {selection} ===");
        // Scenario A only takes days 7 to 28; drop the day-35 weighing for it.
        let mut observations = batch.clone();
        if selection.scenario() == Scenario::A {
            observations.weights.retain(|day, _| *day <= 28);
        }
        match forecaster.forecast(selection, &observations, Some(TARGET_GRAMS)) {
            Ok(forecast) => {
                print_prediction_table(&forecast);
                print_growth_chart(&forecast);
                if let Some(target) = &forecast.target {
                    print_target_summary(target);
                }
            }
            Err(e) => eprintln!("Forecast failed: {e}"),
        }
    }
}
