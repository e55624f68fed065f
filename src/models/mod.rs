mod observation;
mod prediction;
mod scenario;

pub use observation::{ObservationSet, ObservationSlot};
pub use prediction::{PredictedWeight, PredictionResult, TargetEstimate};
pub use scenario::{parse_label_day, Algorithm, ModelKey, Scenario, OBSERVATION_DAYS};
