mod curve;
mod features;
mod forecaster;
mod predict;
mod target;

pub use curve::GrowthCurve;
pub use features::build_features;
pub use forecaster::{combined_points, Forecast, Forecaster, Selection};
pub use predict::{predict, predict_day_labels};
pub use target::resolve_target_day;
