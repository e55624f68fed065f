use serde::{Deserialize, Serialize};

/// Days of life on which birds are weighed.
pub const OBSERVATION_DAYS: [u32; 5] = [7, 14, 21, 28, 35];

/// A prediction workflow: which observations it consumes and which days it forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// Five weekly weights in, one model per forecast day.
    #[serde(rename = "single")]
    SingleDayVector,
    /// Weights up to day 28 in, days 35/42/49 out.
    #[serde(rename = "A")]
    A,
    /// Weights up to day 35 plus batch age in, days 42/49 out.
    #[serde(rename = "B")]
    B,
}

impl Scenario {
    /// Observation days this scenario requires, in feature order.
    pub fn required_days(&self) -> &'static [u32] {
        match self {
            Scenario::SingleDayVector | Scenario::B => &OBSERVATION_DAYS,
            Scenario::A => &OBSERVATION_DAYS[..4],
        }
    }

    /// Forecast days of the scenario's multi-output models.
    ///
    /// Empty for [`Scenario::SingleDayVector`], whose forecast days come from
    /// the day labels of the registered models.
    pub fn output_days(&self) -> &'static [u32] {
        match self {
            Scenario::SingleDayVector => &[],
            Scenario::A => &[35, 42, 49],
            Scenario::B => &[42, 49],
        }
    }

    pub fn needs_batch_age(&self) -> bool {
        matches!(self, Scenario::B)
    }

    /// Length of the feature vector the scenario's models consume.
    pub fn input_dim(&self) -> usize {
        self.required_days().len() + usize::from(self.needs_batch_age())
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::SingleDayVector => write!(f, "single"),
            Scenario::A => write!(f, "A"),
            Scenario::B => write!(f, "B"),
        }
    }
}

impl std::str::FromStr for Scenario {
    type Err = crate::error::ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" => Ok(Scenario::A),
            "b" => Ok(Scenario::B),
            "single" | "single-day-vector" | "s" => Ok(Scenario::SingleDayVector),
            _ => Err(crate::error::ForecastError::InvalidInput(format!(
                "Unknown scenario: '{s}'"
            ))),
        }
    }
}

/// Regression algorithm family a model was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Ridge,
    Xgb,
    /// Extremely randomized trees, used by the per-day models.
    Etr,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Ridge => write!(f, "Ridge"),
            Algorithm::Xgb => write!(f, "XGB"),
            Algorithm::Etr => write!(f, "ETR"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = crate::error::ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ridge" => Ok(Algorithm::Ridge),
            "xgb" | "xgboost" => Ok(Algorithm::Xgb),
            "etr" | "extratrees" | "extra-trees" => Ok(Algorithm::Etr),
            _ => Err(crate::error::ForecastError::InvalidInput(format!(
                "Unknown algorithm: '{s}'"
            ))),
        }
    }
}

/// Registry lookup key for a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelKey {
    /// A multi-output model for scenario A or B.
    Variant {
        scenario: Scenario,
        algorithm: Algorithm,
    },
    /// A single-output model named after its forecast day, e.g. "Dia 42".
    DayLabel(String),
}

impl ModelKey {
    pub fn variant(scenario: Scenario, algorithm: Algorithm) -> Self {
        ModelKey::Variant {
            scenario,
            algorithm,
        }
    }

    pub fn day_label(label: impl Into<String>) -> Self {
        ModelKey::DayLabel(label.into())
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            ModelKey::Variant { scenario, .. } => *scenario,
            ModelKey::DayLabel(_) => Scenario::SingleDayVector,
        }
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKey::Variant {
                scenario,
                algorithm,
            } => write!(f, "{algorithm} {scenario}"),
            ModelKey::DayLabel(label) => write!(f, "{label}"),
        }
    }
}

/// Extract the forecast day from a label such as "Dia 42" or "Dia 49+".
pub fn parse_label_day(label: &str) -> Option<u32> {
    label
        .split_whitespace()
        .last()?
        .trim_end_matches('+')
        .parse()
        .ok()
}
