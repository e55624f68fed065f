mod csv_io;
mod json_io;

use std::path::Path;

use crate::error::ForecastError;
use crate::models::ObservationSet;

pub use csv_io::{
    read_observations_csv, read_observations_csv_from_bytes, write_curve_csv,
    write_prediction_csv,
};
pub use json_io::{
    forecast_to_json, read_observations_json, read_observations_json_from_bytes,
    write_forecast_json,
};

/// Trait for reading a batch's weighings from a file.
pub trait ObservationReader {
    fn read(&self, path: &Path) -> Result<ObservationSet, ForecastError>;
}

/// CSV format reader (`day,weight_g` rows).
pub struct CsvFormat;

impl ObservationReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<ObservationSet, ForecastError> {
        read_observations_csv(path)
    }
}

/// JSON format reader.
pub struct JsonFormat;

impl ObservationReader for JsonFormat {
    fn read(&self, path: &Path) -> Result<ObservationSet, ForecastError> {
        read_observations_json(path)
    }
}

/// Pick a reader by file extension.
pub fn reader_for(path: &Path) -> Result<Box<dyn ObservationReader>, ForecastError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat)),
        _ => Err(ForecastError::InvalidInput(format!(
            "Unsupported observation file format: .{ext}. Use .csv or .json"
        ))),
    }
}
