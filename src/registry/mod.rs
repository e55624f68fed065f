mod manifest;

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ForecastError;
use crate::models::{ModelKey, Scenario};
use crate::regression::{read_artifact, Regressor};

pub use manifest::{Manifest, ManifestEntry, MANIFEST_FILE};

/// A loaded model together with the key it answers to and the days it forecasts.
#[derive(Debug)]
pub struct ModelVariant {
    key: ModelKey,
    output_days: Vec<u32>,
    model: Box<dyn Regressor>,
}

impl ModelVariant {
    /// Pair a model with its key and forecast days.
    ///
    /// Nothing is checked here; the registry runs [`Regressor::validate`] and
    /// the shape checks when the variant is inserted.
    pub fn new(key: ModelKey, output_days: Vec<u32>, model: impl Regressor + 'static) -> Self {
        Self {
            key,
            output_days,
            model: Box::new(model),
        }
    }

    pub fn key(&self) -> &ModelKey {
        &self.key
    }

    pub fn scenario(&self) -> Scenario {
        self.key.scenario()
    }

    /// Forecast days, one per model output, strictly increasing.
    pub fn output_days(&self) -> &[u32] {
        &self.output_days
    }

    pub fn input_dim(&self) -> usize {
        self.model.n_features()
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    /// Check the model against the scenario's feature layout and its own output days.
    fn check_shape(&self) -> Result<(), String> {
        self.model.validate()?;
        let scenario = self.scenario();
        if self.model.n_features() != scenario.input_dim() {
            return Err(format!(
                "model takes {} features, scenario {scenario} provides {}",
                self.model.n_features(),
                scenario.input_dim()
            ));
        }
        if self.output_days.is_empty() {
            return Err("no output days".to_string());
        }
        if self.output_days.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!(
                "output days {:?} are not strictly increasing",
                self.output_days
            ));
        }
        if self.model.n_outputs() != self.output_days.len() {
            return Err(format!(
                "model has {} outputs for {} output days",
                self.model.n_outputs(),
                self.output_days.len()
            ));
        }
        Ok(())
    }
}

/// Immutable set of prediction models, built once at startup.
///
/// Lookups borrow; nothing mutates after construction, so a registry can be
/// shared across threads behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<ModelKey, ModelVariant>,
}

impl ModelRegistry {
    /// Load every artifact listed in the store's `models.toml`.
    ///
    /// Any unreadable, undecodable, or shape-incompatible artifact aborts the
    /// load with [`ForecastError::Load`].
    pub fn load(store: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let store = store.as_ref();
        let manifest = Manifest::read(store)?;
        if manifest.models.is_empty() {
            return Err(ForecastError::load(
                store.join(MANIFEST_FILE).display().to_string(),
                "manifest lists no models",
            ));
        }

        let mut variants = Vec::with_capacity(manifest.models.len());
        for entry in &manifest.models {
            let path = store.join(&entry.file);
            let name = path.display().to_string();
            let key = entry
                .key()
                .map_err(|reason| ForecastError::load(&name, reason))?;
            let output_days = entry
                .resolve_output_days(&key)
                .map_err(|reason| ForecastError::load(&name, reason))?;
            let artifact = read_artifact(&path)?;
            info!(model = %key, file = %name, ?output_days, "loaded model");
            variants.push((name, ModelVariant::new(key, output_days, artifact)));
        }

        let mut registry = Self::default();
        for (name, variant) in variants {
            registry.insert(variant, &name)?;
        }
        Ok(registry)
    }

    /// Build a registry from models already in memory.
    pub fn from_variants(
        variants: impl IntoIterator<Item = ModelVariant>,
    ) -> Result<Self, ForecastError> {
        let mut registry = Self::default();
        for variant in variants {
            let name = variant.key.to_string();
            registry.insert(variant, &name)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, variant: ModelVariant, artifact: &str) -> Result<(), ForecastError> {
        variant
            .check_shape()
            .map_err(|reason| ForecastError::load(artifact, reason))?;
        if self.models.contains_key(&variant.key) {
            return Err(ForecastError::load(
                artifact,
                format!("duplicate model key {}", variant.key),
            ));
        }
        if let ModelKey::DayLabel(label) = &variant.key {
            let day = variant.output_days[0];
            if let Some(other) = self
                .day_label_models()
                .into_iter()
                .find(|v| v.output_days[0] == day)
            {
                return Err(ForecastError::load(
                    artifact,
                    format!(
                        "'{label}' forecasts day {day}, already covered by '{}'",
                        other.key
                    ),
                ));
            }
        }
        debug!(model = %variant.key, "registered model");
        self.models.insert(variant.key.clone(), variant);
        Ok(())
    }

    pub fn get(&self, key: &ModelKey) -> Result<&ModelVariant, ForecastError> {
        self.models
            .get(key)
            .ok_or_else(|| ForecastError::ModelNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &ModelKey) -> bool {
        self.models.contains_key(key)
    }

    /// Per-day models, ordered by the day their label names.
    pub fn day_label_models(&self) -> Vec<&ModelVariant> {
        let mut models: Vec<&ModelVariant> = self
            .models
            .values()
            .filter(|v| matches!(v.key, ModelKey::DayLabel(_)))
            .collect();
        models.sort_by_key(|v| v.output_days[0]);
        models
    }

    /// All models, variants first (by scenario, then algorithm), then per-day models by day.
    pub fn variants(&self) -> Vec<&ModelVariant> {
        let mut models: Vec<&ModelVariant> = self.models.values().collect();
        models.sort_by_key(|v| match &v.key {
            ModelKey::Variant {
                scenario,
                algorithm,
            } => (0, scenario.to_string(), algorithm.to_string(), 0),
            ModelKey::DayLabel(_) => (1, String::new(), String::new(), v.output_days[0]),
        });
        models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
