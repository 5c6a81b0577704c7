//! Scenario configuration.
//!
//! A scenario is the complete input of one calculation, expressed as TOML:
//!
//! ```toml
//! [parameters]
//! capacity = 100.0
//! cycle_minutes = 60.0
//!
//! [intensities]
//! natural_gas = 20.0
//! lime = 40.0
//! ```
//!
//! Missing parameters take their defaults and missing intensities count as 0.

use crate::engine::{calculate, Calculation};
use crate::errors::EafResult;
use crate::parameters::{IntensityInput, ProcessParameters};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub parameters: ProcessParameters,
    pub intensities: IntensityInput,
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> EafResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> EafResult<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn calculate(&self) -> Calculation {
        calculate(&self.parameters, &self.intensities)
    }
}
