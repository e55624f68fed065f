use std::path::Path;

use crate::analysis::Forecast;
use crate::error::ForecastError;
use crate::models::ObservationSet;

/// Re-insert every weight so that non-weighing days are rejected.
fn checked(raw: ObservationSet) -> Result<ObservationSet, ForecastError> {
    let mut observations = ObservationSet::new();
    for (day, grams) in raw.points() {
        observations.insert(day, grams)?;
    }
    observations.batch_age = raw.batch_age;
    Ok(observations)
}

/// Read an observation set from a JSON file.
///
/// Expected shape: `{"weights": {"7": 200.0, ...}, "batch_age": 45}`.
pub fn read_observations_json(path: impl AsRef<Path>) -> Result<ObservationSet, ForecastError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    checked(serde_json::from_str(&content)?)
}

/// Read an observation set from JSON bytes.
pub fn read_observations_json_from_bytes(data: &[u8]) -> Result<ObservationSet, ForecastError> {
    checked(serde_json::from_slice(data)?)
}

pub fn forecast_to_json(forecast: &Forecast, pretty: bool) -> Result<String, ForecastError> {
    Ok(if pretty {
        serde_json::to_string_pretty(forecast)?
    } else {
        serde_json::to_string(forecast)?
    })
}

/// Write a forecast (observations, predictions, target day) as JSON.
pub fn write_forecast_json(
    forecast: &Forecast,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ForecastError> {
    std::fs::write(path.as_ref(), forecast_to_json(forecast, pretty)?)?;
    Ok(())
}
