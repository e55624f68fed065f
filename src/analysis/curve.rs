use std::ops::RangeInclusive;

use crate::error::ForecastError;
use crate::models::PredictionResult;

/// Piecewise-linear interpolant over strictly increasing knots.
///
/// Outside the knot range the nearest edge segment is extended, so the value
/// keeps following the local trend instead of flattening out.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PiecewiseLinear {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl PiecewiseLinear {
    /// Sort `(x, y)` pairs by `x` and build the interpolant.
    ///
    /// `axis` names the x coordinate in error messages.
    pub(crate) fn fit(points: &[(f64, f64)], axis: &str) -> Result<Self, ForecastError> {
        if points.len() < 2 {
            return Err(ForecastError::InvalidCurveInput(format!(
                "need at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some((x, y)) = points
            .iter()
            .find(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ForecastError::InvalidCurveInput(format!(
                "non-finite point ({x}, {y})"
            )));
        }

        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(w) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ForecastError::InvalidCurveInput(format!(
                "duplicate {axis} {}",
                w[0].0
            )));
        }

        let (xs, ys) = sorted.into_iter().unzip();
        Ok(Self { xs, ys })
    }

    pub(crate) fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let seg = match self.xs.binary_search_by(|probe| probe.total_cmp(&x)) {
            Ok(i) => return self.ys[i],
            Err(0) => 0,
            Err(i) if i >= n => n - 2,
            Err(i) => i - 1,
        };
        let (x0, x1) = (self.xs[seg], self.xs[seg + 1]);
        let (y0, y1) = (self.ys[seg], self.ys[seg + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    pub(crate) fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub(crate) fn ys(&self) -> &[f64] {
        &self.ys
    }
}

/// Continuous day → weight relation through a set of (day, grams) points.
///
/// # Examples
///
/// ```
/// use broiler_growth_forecaster::analysis::GrowthCurve;
///
/// let curve = GrowthCurve::fit(&[(35.0, 1800.0), (42.0, 2400.0), (49.0, 3000.0)]).unwrap();
/// assert_eq!(curve.evaluate(42.0), 2400.0);
/// assert!((curve.evaluate(56.0) - 3600.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthCurve {
    inner: PiecewiseLinear,
}

impl GrowthCurve {
    /// Fit through at least two points with distinct days, in any order.
    pub fn fit(points: &[(f64, f64)]) -> Result<Self, ForecastError> {
        Ok(Self {
            inner: PiecewiseLinear::fit(points, "day")?,
        })
    }

    pub fn from_prediction(prediction: &PredictionResult) -> Result<Self, ForecastError> {
        Self::fit(&prediction.as_curve_points())
    }

    /// Weight on `day`: interpolated between knots, extrapolated along the edge segment outside.
    pub fn evaluate(&self, day: f64) -> f64 {
        self.inner.eval(day)
    }

    /// Lazily evaluate every integer day in `days`.
    ///
    /// The iterator is cloneable, so a sampled series can be replayed.
    pub fn sample(
        &self,
        days: RangeInclusive<u32>,
    ) -> impl Iterator<Item = (u32, f64)> + Clone + '_ {
        days.map(move |day| (day, self.evaluate(f64::from(day))))
    }

    /// First and last fitted day.
    pub fn domain(&self) -> (f64, f64) {
        let xs = self.inner.xs();
        (xs[0], xs[xs.len() - 1])
    }

    /// Fitted (day, weight) knots in day order.
    pub fn knots(&self) -> Vec<(f64, f64)> {
        self.inner
            .xs()
            .iter()
            .copied()
            .zip(self.inner.ys().iter().copied())
            .collect()
    }
}
