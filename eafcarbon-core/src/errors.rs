use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::parameters::ParameterField;

/// Why a numeric input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputProblem {
    /// The value must be strictly positive (cycle time).
    NotPositive,
    /// The value must not be negative.
    Negative,
    /// The value must lie within `[0, 1]`.
    OutsideUnitInterval,
    /// The value was `NaN` or infinite.
    NotFinite,
}

impl fmt::Display for InputProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotPositive => "must be greater than zero",
            Self::Negative => "must not be negative",
            Self::OutsideUnitInterval => "must lie between 0 and 1",
            Self::NotFinite => "must be a finite number",
        };
        f.write_str(text)
    }
}

/// Where an invalid value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "name")]
pub enum InputSource {
    Parameter(ParameterField),
    Intensity(String),
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(field) => write!(f, "parameter '{field}'"),
            Self::Intensity(name) => write!(f, "intensity of '{name}'"),
        }
    }
}

/// A problem found while computing emissions.
///
/// These never abort a calculation. The engine substitutes a safe value,
/// records the error and carries on, so callers always get a complete result.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DomainError {
    #[error("Invalid {input}: {value} {problem}; using {substituted}")]
    InvalidParameter {
        input: InputSource,
        value: f64,
        problem: InputProblem,
        substituted: f64,
    },
    #[error("Unknown material '{name}' contributes no emissions")]
    UnknownMaterial { name: String },
}

impl DomainError {
    /// The material name involved, if any.
    pub fn material(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter {
                input: InputSource::Intensity(name),
                ..
            }
            | Self::UnknownMaterial { name } => Some(name),
            Self::InvalidParameter { .. } => None,
        }
    }
}

/// Error raised while assembling a reference data table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceDataError {
    #[error("Material name '{0}' is defined more than once")]
    DuplicateName(String),
    #[error("Material '{name}' has an invalid emission factor {factor}")]
    InvalidFactor { name: String, factor: f64 },
}

/// Error raised while producing an exported report document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Report needs {required} lines but a page holds {available}")]
    PageOverflow { required: usize, available: usize },
    #[error("Could not encode report: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Could not write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for fallible operations outside the recovering engine path.
#[derive(Error, Debug)]
pub enum EafError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Could not read scenario: {0}")]
    ScenarioParse(#[from] toml::de::Error),
    #[error("Could not write scenario: {0}")]
    ScenarioWrite(#[from] toml::ser::Error),
}

/// Convenience type for `Result<T, EafError>`.
pub type EafResult<T> = Result<T, EafError>;
