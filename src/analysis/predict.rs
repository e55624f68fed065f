use tracing::debug;

use crate::error::ForecastError;
use crate::models::{PredictedWeight, PredictionResult};
use crate::registry::{ModelRegistry, ModelVariant};

/// Run one forward pass and pair the outputs with the model's forecast days.
///
/// A feature vector of the wrong length, or a model returning a different
/// number of values than it declares output days, is a
/// [`ForecastError::DimensionMismatch`].
pub fn predict(model: &ModelVariant, features: &[f64]) -> Result<PredictionResult, ForecastError> {
    if features.len() != model.input_dim() {
        return Err(ForecastError::DimensionMismatch {
            model: model.key().to_string(),
            what: "features",
            expected: model.input_dim(),
            actual: features.len(),
        });
    }

    let outputs = model.model().predict(features);
    let days = model.output_days();
    if outputs.len() != days.len() {
        return Err(ForecastError::DimensionMismatch {
            model: model.key().to_string(),
            what: "outputs",
            expected: days.len(),
            actual: outputs.len(),
        });
    }

    let points = days
        .iter()
        .zip(outputs)
        .map(|(&day, weight)| PredictedWeight { day, weight })
        .collect();
    let result = PredictionResult { points };
    debug!(model = %model.key(), ?result, "prediction");
    Ok(result)
}

/// Run every per-day model on the same five-weight vector and merge the results by day.
pub fn predict_day_labels(
    registry: &ModelRegistry,
    features: &[f64],
) -> Result<PredictionResult, ForecastError> {
    let models = registry.day_label_models();
    if models.is_empty() {
        return Err(ForecastError::ModelNotFound(
            "no per-day models registered".to_string(),
        ));
    }

    let mut points = Vec::with_capacity(models.len());
    for model in models {
        points.extend(predict(model, features)?.points);
    }
    points.sort_by_key(|p| p.day);
    Ok(PredictionResult { points })
}
