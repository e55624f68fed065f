use serde::{Deserialize, Serialize};

/// A single forecast weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictedWeight {
    pub day: u32,
    /// Predicted mean body weight in grams
    pub weight: f64,
}

/// Model output paired with its forecast days, strictly increasing in day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub points: Vec<PredictedWeight>,
}

impl PredictionResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn days(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.day).collect()
    }

    pub fn weight_on(&self, day: u32) -> Option<f64> {
        self.points.iter().find(|p| p.day == day).map(|p| p.weight)
    }

    /// (day, weight) pairs as reals, ready for curve fitting.
    pub fn as_curve_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (f64::from(p.day), p.weight))
            .collect()
    }
}

/// Estimated day on which the growth curve reaches a target weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetEstimate {
    pub target_weight: f64,
    pub estimated_day: f64,
    /// False when the weights, ordered by day, were not strictly increasing;
    /// the estimate then has no guaranteed meaning.
    pub monotonic: bool,
}
