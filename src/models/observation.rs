use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scenario::OBSERVATION_DAYS;
use crate::error::ForecastError;

/// One input slot a scenario may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationSlot {
    /// Mean body weight on the given day of life.
    Weight(u32),
    BatchAge,
}

impl std::fmt::Display for ObservationSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationSlot::Weight(day) => write!(f, "weight on day {day}"),
            ObservationSlot::BatchAge => write!(f, "batch age"),
        }
    }
}

/// Weights measured for one batch, keyed by day of life.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSet {
    /// Mean body weight in grams per weighing day
    pub weights: BTreeMap<u32, f64>,
    /// Batch age in days (scenario B only)
    #[serde(default)]
    pub batch_age: Option<u32>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the weight for a weighing day.
    ///
    /// Only the weekly weighing days 7, 14, 21, 28 and 35 are accepted.
    pub fn insert(&mut self, day: u32, grams: f64) -> Result<(), ForecastError> {
        if !OBSERVATION_DAYS.contains(&day) {
            return Err(ForecastError::InvalidInput(format!(
                "day {day} is not a weighing day (expected one of {OBSERVATION_DAYS:?})"
            )));
        }
        self.weights.insert(day, grams);
        Ok(())
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_weight(mut self, day: u32, grams: f64) -> Result<Self, ForecastError> {
        self.insert(day, grams)?;
        Ok(self)
    }

    pub fn with_batch_age(mut self, days: u32) -> Self {
        self.batch_age = Some(days);
        self
    }

    pub fn weight(&self, day: u32) -> Option<f64> {
        self.weights.get(&day).copied()
    }

    /// Observed (day, weight) pairs in ascending day order.
    pub fn points(&self) -> Vec<(u32, f64)> {
        self.weights.iter().map(|(&d, &w)| (d, w)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
