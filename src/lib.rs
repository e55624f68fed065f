pub mod analysis;
pub mod error;
pub mod io;
pub mod models;
pub mod regression;
pub mod registry;
pub mod visualization;

pub use analysis::{Forecast, Forecaster, GrowthCurve, Selection};
pub use error::ForecastError;
pub use io::ObservationReader;
pub use models::{Algorithm, ModelKey, ObservationSet, PredictionResult, Scenario, TargetEstimate};
pub use registry::{ModelRegistry, ModelVariant};
