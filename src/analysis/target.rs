use tracing::warn;

use super::curve::GrowthCurve;
use crate::error::ForecastError;
use crate::models::TargetEstimate;

/// Estimate the day on which the growth curve through `points` reaches `target_weight`.
///
/// The (day, weight) points are inverted into a weight → day relation and
/// evaluated with the same interpolation/extrapolation rule as
/// [`GrowthCurve::evaluate`]. Targets above the heaviest point extend along
/// the last segment's slope.
///
/// The inverse is only meaningful when weight rises strictly with day. A
/// non-monotonic series is still resolved, but the estimate is flagged with
/// `monotonic: false` and a warning is logged. Equal weights are kept, ordered
/// by day: a target equal to a repeated weight resolves to its earliest day,
/// and only extrapolating along a flat edge segment is an error.
///
/// # Examples
///
/// ```
/// use broiler_growth_forecaster::analysis::resolve_target_day;
///
/// let est = resolve_target_day(&[(42.0, 2400.0), (49.0, 3000.0)], 3600.0).unwrap();
/// assert!((est.estimated_day - 56.0).abs() < 1e-9);
/// ```
pub fn resolve_target_day(
    points: &[(f64, f64)],
    target_weight: f64,
) -> Result<TargetEstimate, ForecastError> {
    if !target_weight.is_finite() || target_weight < 0.0 {
        return Err(ForecastError::InvalidInput(format!(
            "target weight must be a non-negative number of grams, got {target_weight}"
        )));
    }

    let knots = GrowthCurve::fit(points)?.knots();
    let monotonic = knots.windows(2).all(|w| w[1].1 > w[0].1);
    if !monotonic {
        warn!(
            target_weight,
            "weights do not increase strictly with day; target-day estimate may be meaningless"
        );
    }

    Ok(TargetEstimate {
        target_weight,
        estimated_day: inverse_day(&knots, target_weight)?,
        monotonic,
    })
}

/// Day at which `target` is reached on the weight → day inverse of `knots`.
///
/// `knots` are in day order; the stable sort keeps equal weights in day order.
fn inverse_day(knots: &[(f64, f64)], target: f64) -> Result<f64, ForecastError> {
    let mut swapped: Vec<(f64, f64)> = knots.iter().map(|&(day, weight)| (weight, day)).collect();
    swapped.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = swapped.len();
    let i = swapped.partition_point(|&(weight, _)| weight < target);
    if i < n && swapped[i].0 == target {
        return Ok(swapped[i].1);
    }
    let seg = i.clamp(1, n - 1) - 1;
    let ((w0, d0), (w1, d1)) = (swapped[seg], swapped[seg + 1]);
    if w0 == w1 {
        return Err(ForecastError::InvalidCurveInput(format!(
            "duplicate weight {w0}: cannot extrapolate to {target} g along a flat segment"
        )));
    }
    Ok(d0 + (d1 - d0) * (target - w0) / (w1 - w0))
}
