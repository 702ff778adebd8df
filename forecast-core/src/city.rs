use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

/// Prefix shared by every per-city model artifact.
pub const ARTIFACT_PREFIX: &str = "Classifier";

/// Extension of model artifacts on disk.
pub const ARTIFACT_EXTENSION: &str = "model";

/// Cities with a trained model. The city picks the artifact, the feature
/// schema and the output schema of a prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[default]
    Bengaluru,
    Austin,
}

impl City {
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Bengaluru => "Bengaluru",
            City::Austin => "Austin",
        }
    }

    /// Cities in selector order; the first one is the form default.
    pub const fn all() -> &'static [City] {
        &[City::Bengaluru, City::Austin]
    }

    /// Artifact id, the city name with whitespace stripped behind a fixed prefix.
    pub fn artifact_id(&self) -> String {
        let compact: String = self.as_str().chars().filter(|c| !c.is_whitespace()).collect();
        format!("{ARTIFACT_PREFIX}{compact}")
    }

    pub fn artifact_file_name(&self) -> String {
        format!("{}.{ARTIFACT_EXTENSION}", self.artifact_id())
    }

    /// Number of values a prediction for this city must carry.
    pub fn output_width(&self) -> usize {
        match self {
            City::Austin => 6,
            City::Bengaluru => 5,
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for City {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String =
            value.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();

        match normalized.as_str() {
            "bengaluru" => Ok(City::Bengaluru),
            "austin" => Ok(City::Austin),
            _ => Err(anyhow::anyhow!(
                "Unknown city '{value}'. Supported cities: Bengaluru, Austin."
            )),
        }
    }
}

impl FromStr for City {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::try_from(s)
    }
}
