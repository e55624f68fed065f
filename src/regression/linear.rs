//! Multi-output linear model (Ridge regression coefficients).

use serde::{Deserialize, Serialize};

use super::Regressor;

/// Linear model with one coefficient row and intercept per output.
///
/// ```text
/// y[o] = intercepts[o] + Σ_f coefficients[o][f] * x[f]
/// ```
///
/// # Example
///
/// ```
/// use broiler_growth_forecaster::regression::{LinearRegressor, Regressor};
///
/// let model = LinearRegressor {
///     n_features: 2,
///     coefficients: vec![vec![1.0, 0.5], vec![2.0, 0.0]],
///     intercepts: vec![10.0, 0.0],
/// };
/// assert_eq!(model.predict(&[4.0, 2.0]), vec![15.0, 8.0]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub n_features: usize,
    /// Row-major weights: `coefficients[output][feature]`
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearRegressor {
    /// Check that the weight layout is consistent and every parameter is finite.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("linear model needs at least one feature".to_string());
        }
        if self.coefficients.is_empty() {
            return Err("linear model needs at least one output".to_string());
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                self.coefficients.len()
            ));
        }
        for (o, row) in self.coefficients.iter().enumerate() {
            if row.len() != self.n_features {
                return Err(format!(
                    "coefficient row {o} has {} weights, expected {}",
                    row.len(),
                    self.n_features
                ));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(format!("coefficient row {o} contains a non-finite weight"));
            }
        }
        if self.intercepts.iter().any(|b| !b.is_finite()) {
            return Err("non-finite intercept".to_string());
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_outputs(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, bias)| {
                bias + row
                    .iter()
                    .zip(features)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
            })
            .collect()
    }

    fn validate(&self) -> Result<(), String> {
        LinearRegressor::validate(self)
    }
}
