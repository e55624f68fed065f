use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::{build_features, predict, predict_day_labels, resolve_target_day, GrowthCurve};
use crate::error::ForecastError;
use crate::models::{
    Algorithm, ModelKey, ObservationSet, PredictionResult, Scenario, TargetEstimate,
};
use crate::registry::ModelRegistry;

/// How far past the last fitted day a chart may extend to reach the target day.
const MAX_CHART_EXTENSION_DAYS: f64 = 28.0;

/// Which model(s) a forecast runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// One multi-output model of scenario A or B.
    Variant {
        scenario: Scenario,
        algorithm: Algorithm,
    },
    /// Every per-day model, each fed the five weekly weights.
    DayLabels,
}

impl Selection {
    pub fn scenario(&self) -> Scenario {
        match self {
            Selection::Variant { scenario, .. } => *scenario,
            Selection::DayLabels => Scenario::SingleDayVector,
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::Variant {
                scenario,
                algorithm,
            } => write!(f, "{algorithm} {scenario}"),
            Selection::DayLabels => write!(f, "per-day models"),
        }
    }
}

/// Result of one forecast request.
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub scenario: Scenario,
    pub observations: ObservationSet,
    pub prediction: PredictionResult,
    pub target: Option<TargetEstimate>,
    /// Curve through the observed and predicted weights
    #[serde(skip)]
    pub curve: GrowthCurve,
}

impl Forecast {
    /// Integer days to chart: the fitted span, stretched toward the target day when it lies beyond.
    pub fn chart_days(&self) -> RangeInclusive<u32> {
        let (first, last) = self.curve.domain();
        let mut end = last;
        if let Some(target) = &self.target {
            if target.estimated_day.is_finite() && target.estimated_day > last {
                end = target
                    .estimated_day
                    .ceil()
                    .min(last + MAX_CHART_EXTENSION_DAYS);
            }
        }
        (first.floor().max(0.0) as u32)..=(end.ceil() as u32)
    }
}

/// Observed and predicted weights as curve points, ordered by day.
///
/// Where a predicted day coincides with an observed one, the observation wins.
pub fn combined_points(
    observations: &ObservationSet,
    prediction: &PredictionResult,
) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = observations
        .points()
        .into_iter()
        .map(|(day, w)| (f64::from(day), w))
        .collect();
    for p in &prediction.points {
        if observations.weight(p.day).is_some() {
            debug!(day = p.day, "prediction overlaps an observation, keeping the observation");
            continue;
        }
        points.push((f64::from(p.day), p.weight));
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

/// Runs the feature → prediction → curve → target-day pipeline against a registry.
pub struct Forecaster<'a> {
    registry: &'a ModelRegistry,
}

impl<'a> Forecaster<'a> {
    pub fn new(registry: &'a ModelRegistry) -> Self {
        Self { registry }
    }

    /// Predict weights for the selection's forecast days.
    pub fn predict(
        &self,
        selection: Selection,
        observations: &ObservationSet,
    ) -> Result<PredictionResult, ForecastError> {
        let features = build_features(selection.scenario(), observations)?;
        match selection {
            Selection::Variant {
                scenario,
                algorithm,
            } => {
                let model = self.registry.get(&ModelKey::variant(scenario, algorithm))?;
                predict(model, &features)
            }
            Selection::DayLabels => predict_day_labels(self.registry, &features),
        }
    }

    /// Full pipeline, with an optional target weight to resolve to a day.
    ///
    /// A target the curve cannot invert leaves `target` empty rather than
    /// failing the forecast; an invalid target weight is still an error.
    pub fn forecast(
        &self,
        selection: Selection,
        observations: &ObservationSet,
        target_weight: Option<f64>,
    ) -> Result<Forecast, ForecastError> {
        let prediction = self.predict(selection, observations)?;
        let points = combined_points(observations, &prediction);
        let curve = GrowthCurve::fit(&points)?;
        let target = match target_weight.map(|grams| resolve_target_day(&points, grams)) {
            None => None,
            Some(Ok(estimate)) => Some(estimate),
            Some(Err(ForecastError::InvalidCurveInput(reason))) => {
                warn!(
                    %reason,
                    "target day cannot be resolved on this curve, keeping the prediction"
                );
                None
            }
            Some(Err(e)) => return Err(e),
        };

        Ok(Forecast {
            scenario: selection.scenario(),
            observations: observations.clone(),
            prediction,
            target,
            curve,
        })
    }
}
