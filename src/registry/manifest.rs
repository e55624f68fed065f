use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::models::{parse_label_day, Algorithm, ModelKey, Scenario};

/// File name of the manifest inside a model store directory.
pub const MANIFEST_FILE: &str = "models.toml";

/// Contents of `models.toml`: the fixed set of artifacts a store provides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "model")]
    pub models: Vec<ManifestEntry>,
}

/// One `[[model]]` table.
///
/// Either `scenario` + `algorithm` (a multi-output variant) or `label`
/// (a per-day model) identifies the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Scenario>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Artifact path, relative to the store directory
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_days: Option<Vec<u32>>,
}

impl Manifest {
    /// Read `models.toml` from a store directory.
    pub fn read(store: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let path = store.as_ref().join(MANIFEST_FILE);
        let name = path.display().to_string();
        let content =
            std::fs::read_to_string(&path).map_err(|e| ForecastError::load(&name, e.to_string()))?;
        Self::parse(&content, &name)
    }

    pub fn parse(content: &str, name: &str) -> Result<Self, ForecastError> {
        toml::from_str(content).map_err(|e| ForecastError::load(name, e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ForecastError> {
        toml::to_string_pretty(self)
            .map_err(|e| ForecastError::load(MANIFEST_FILE, e.to_string()))
    }
}

impl ManifestEntry {
    pub fn variant(scenario: Scenario, algorithm: Algorithm, file: impl Into<PathBuf>) -> Self {
        Self {
            scenario: Some(scenario),
            algorithm: Some(algorithm),
            label: None,
            file: file.into(),
            output_days: None,
        }
    }

    pub fn day_label(label: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            scenario: None,
            algorithm: Some(Algorithm::Etr),
            label: Some(label.into()),
            file: file.into(),
            output_days: None,
        }
    }

    /// Resolve the registry key this entry declares.
    pub fn key(&self) -> Result<ModelKey, String> {
        match (&self.label, self.scenario, self.algorithm) {
            (Some(_), Some(s), _) if s != Scenario::SingleDayVector => Err(format!(
                "labelled model cannot belong to scenario {s}"
            )),
            (Some(label), _, _) => Ok(ModelKey::day_label(label.clone())),
            (None, Some(Scenario::SingleDayVector), _) => {
                Err("single-day-vector models need a day label".to_string())
            }
            (None, Some(scenario), Some(algorithm)) => Ok(ModelKey::variant(scenario, algorithm)),
            (None, Some(_), None) => Err("missing algorithm".to_string()),
            (None, None, _) => Err("entry needs either a label or a scenario".to_string()),
        }
    }

    /// Forecast days for this entry, checked against its scenario or label.
    pub fn resolve_output_days(&self, key: &ModelKey) -> Result<Vec<u32>, String> {
        let expected = match key {
            ModelKey::Variant { scenario, .. } => scenario.output_days().to_vec(),
            ModelKey::DayLabel(label) => vec![parse_label_day(label)
                .ok_or_else(|| format!("label '{label}' does not end in a day number"))?],
        };
        match &self.output_days {
            Some(days) if *days != expected => Err(format!(
                "declared output days {days:?} do not match {expected:?} for {key}"
            )),
            _ => Ok(expected),
        }
    }
}
