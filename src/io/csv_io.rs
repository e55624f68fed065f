use std::io::{Read, Write};
use std::path::Path;

use crate::error::ForecastError;
use crate::models::{ObservationSet, PredictionResult};

/// CSV row for a (day, weight) pair.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct WeightRow {
    day: u32,
    weight_g: f64,
}

fn parse_observation_records<R: Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<ObservationSet, ForecastError> {
    let mut observations = ObservationSet::new();
    for result in rdr.deserialize() {
        let row: WeightRow = result?;
        if observations.weight(row.day).is_some() {
            return Err(ForecastError::InvalidInput(format!(
                "day {} appears more than once",
                row.day
            )));
        }
        observations.insert(row.day, row.weight_g)?;
    }
    Ok(observations)
}

/// Read weighings from a `day,weight_g` CSV file.
pub fn read_observations_csv(path: impl AsRef<Path>) -> Result<ObservationSet, ForecastError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    parse_observation_records(&mut rdr)
}

/// Read weighings from `day,weight_g` CSV bytes.
pub fn read_observations_csv_from_bytes(data: &[u8]) -> Result<ObservationSet, ForecastError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    parse_observation_records(&mut rdr)
}

fn write_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    rows: impl IntoIterator<Item = (u32, f64)>,
) -> Result<(), ForecastError> {
    for (day, weight_g) in rows {
        wtr.serialize(WeightRow { day, weight_g })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a sampled growth curve as `day,weight_g` rows.
pub fn write_curve_csv(
    samples: impl IntoIterator<Item = (u32, f64)>,
    path: impl AsRef<Path>,
) -> Result<(), ForecastError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    write_rows(&mut wtr, samples)
}

/// Write predicted weights as `day,weight_g` rows.
pub fn write_prediction_csv(
    prediction: &PredictionResult,
    path: impl AsRef<Path>,
) -> Result<(), ForecastError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    write_rows(&mut wtr, prediction.points.iter().map(|p| (p.day, p.weight)))
}
