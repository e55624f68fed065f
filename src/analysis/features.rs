use tracing::debug;

use crate::error::ForecastError;
use crate::models::{ObservationSet, ObservationSlot, Scenario};

/// Assemble the feature vector a scenario's models consume.
///
/// Weights appear in ascending day order, followed by the batch age for
/// scenario B. The observation set must hold exactly the scenario's weighing
/// days; nothing is defaulted.
///
/// # Examples
///
/// ```
/// use broiler_growth_forecaster::analysis::build_features;
/// use broiler_growth_forecaster::models::{ObservationSet, Scenario};
///
/// let obs = ObservationSet::new()
///     .with_weight(7, 200.0).unwrap()
///     .with_weight(14, 500.0).unwrap()
///     .with_weight(21, 1000.0).unwrap()
///     .with_weight(28, 1500.0).unwrap();
/// let x = build_features(Scenario::A, &obs).unwrap();
/// assert_eq!(x, vec![200.0, 500.0, 1000.0, 1500.0]);
/// ```
pub fn build_features(
    scenario: Scenario,
    observations: &ObservationSet,
) -> Result<Vec<f64>, ForecastError> {
    let required = scenario.required_days();

    if let Some(&extra) = observations
        .weights
        .keys()
        .find(|day| !required.contains(day))
    {
        return Err(ForecastError::InvalidInput(format!(
            "day {extra} is not an input of scenario {scenario} (expects days {required:?})"
        )));
    }

    let mut features = Vec::with_capacity(scenario.input_dim());
    for &day in required {
        let grams = observations
            .weight(day)
            .ok_or(ForecastError::MissingObservation(ObservationSlot::Weight(day)))?;
        if !grams.is_finite() || grams < 0.0 {
            return Err(ForecastError::InvalidInput(format!(
                "weight on day {day} must be a non-negative number of grams, got {grams}"
            )));
        }
        features.push(grams);
    }

    match (scenario.needs_batch_age(), observations.batch_age) {
        (true, Some(age)) => features.push(f64::from(age)),
        (true, None) => return Err(ForecastError::MissingObservation(ObservationSlot::BatchAge)),
        (false, Some(age)) => {
            debug!(%scenario, age, "ignoring batch age, scenario does not use it");
        }
        (false, None) => {}
    }

    debug!(%scenario, ?features, "built feature vector");
    Ok(features)
}
