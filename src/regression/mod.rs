mod ensemble;
mod linear;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

pub use ensemble::{Aggregation, Tree, TreeEnsemble, TreeNode};
pub use linear::LinearRegressor;

/// A trained model: fixed-length feature vector in, fixed-length output out.
///
/// Implementations are immutable after construction and shared across
/// threads by the registry.
pub trait Regressor: std::fmt::Debug + Send + Sync {
    fn n_features(&self) -> usize;
    fn n_outputs(&self) -> usize;
    /// Single forward pass. `features.len()` must equal [`n_features`](Self::n_features).
    fn predict(&self, features: &[f64]) -> Vec<f64>;
    /// Structural check run before a model is registered; `predict` may
    /// panic on a model that fails it.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// On-disk model artifact, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }
}

impl Regressor for ModelArtifact {
    fn n_features(&self) -> usize {
        match self {
            ModelArtifact::Linear(m) => m.n_features(),
            ModelArtifact::TreeEnsemble(m) => m.n_features(),
        }
    }

    fn n_outputs(&self) -> usize {
        match self {
            ModelArtifact::Linear(m) => m.n_outputs(),
            ModelArtifact::TreeEnsemble(m) => m.n_outputs(),
        }
    }

    fn predict(&self, features: &[f64]) -> Vec<f64> {
        match self {
            ModelArtifact::Linear(m) => m.predict(features),
            ModelArtifact::TreeEnsemble(m) => m.predict(features),
        }
    }

    fn validate(&self) -> Result<(), String> {
        ModelArtifact::validate(self)
    }
}

/// Decode and validate an artifact from JSON bytes.
///
/// `name` only labels the returned [`ForecastError::Load`].
pub fn parse_artifact(data: &[u8], name: &str) -> Result<ModelArtifact, ForecastError> {
    let artifact: ModelArtifact =
        serde_json::from_slice(data).map_err(|e| ForecastError::load(name, e.to_string()))?;
    artifact
        .validate()
        .map_err(|reason| ForecastError::load(name, reason))?;
    Ok(artifact)
}

/// Read, decode, and validate a model artifact file.
pub fn read_artifact(path: impl AsRef<Path>) -> Result<ModelArtifact, ForecastError> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let data = std::fs::read(path).map_err(|e| ForecastError::load(&name, e.to_string()))?;
    parse_artifact(&data, &name)
}

/// Write an artifact as JSON.
pub fn write_artifact(
    artifact: &ModelArtifact,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ForecastError> {
    let content = if pretty {
        serde_json::to_string_pretty(artifact)?
    } else {
        serde_json::to_string(artifact)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ridge() -> ModelArtifact {
        ModelArtifact::Linear(LinearRegressor {
            n_features: 4,
            coefficients: vec![vec![0.0, 0.0, 0.0, 1.0]],
            intercepts: vec![400.0],
        })
    }

    #[test]
    fn test_parse_linear_artifact() {
        let json = br#"{
            "kind": "linear",
            "n_features": 2,
            "coefficients": [[1.0, 1.0]],
            "intercepts": [0.0]
        }"#;
        let artifact = parse_artifact(json, "inline").unwrap();
        assert_eq!(artifact.n_features(), 2);
        assert_eq!(artifact.predict(&[1.0, 2.0]), vec![3.0]);
    }

    #[test]
    fn test_parse_tree_artifact() {
        let json = br#"{
            "kind": "tree_ensemble",
            "n_features": 1,
            "n_outputs": 1,
            "aggregation": "mean",
            "trees": [{"nodes": [
                {"split": {"feature": 0, "threshold": 2.0, "left": 1, "right": 2}},
                {"leaf": {"values": [10.0]}},
                {"leaf": {"values": [20.0]}}
            ]}]
        }"#;
        let artifact = parse_artifact(json, "inline").unwrap();
        assert_eq!(artifact.predict(&[3.0]), vec![20.0]);
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let err = parse_artifact(br#"{"kind": "svm"}"#, "svm.json").unwrap_err();
        assert!(matches!(err, ForecastError::Load { .. }));
        assert!(err.to_string().contains("svm.json"));
    }

    #[test]
    fn test_parse_rejects_invalid_structure() {
        let json = br#"{"kind": "linear", "n_features": 2, "coefficients": [[1.0]], "intercepts": [0.0]}"#;
        let err = parse_artifact(json, "bad.json").unwrap_err();
        assert!(matches!(err, ForecastError::Load { .. }));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ridge.json");
        write_artifact(&ridge(), &path, true).unwrap();
        let loaded = read_artifact(&path).unwrap();
        assert_eq!(loaded.predict(&[200.0, 500.0, 1000.0, 1500.0]), vec![1900.0]);
    }

    #[test]
    fn test_read_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_artifact(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ForecastError::Load { .. }));
    }
}
