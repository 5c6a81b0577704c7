//! Process parameters and consumption intensities.
//!
//! These are the two inputs of the calculation engine. Both are plain values:
//! a session edits them one field at a time and hands them to
//! [`crate::engine::calculate`] on every recompute.

use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Furnace and production parameters.
///
/// Defaults describe a 100 t furnace on a 60 minute tap-to-tap cycle running
/// 320 days a year, with a 70 % scrap charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessParameters {
    /// Steel produced per furnace cycle (heat).
    /// unit: t
    /// default: 100.0
    pub capacity: FloatValue,

    /// Tap-to-tap cycle time.
    /// unit: min
    /// default: 60.0
    pub cycle_minutes: FloatValue,

    /// Operating days per year.
    /// unit: day
    /// default: 320.0
    pub operating_days: FloatValue,

    /// Iron-bearing charge (scrap + hot metal) per ton of cast steel.
    /// unit: t/t
    /// default: 1.087
    pub steel_charge_ratio: FloatValue,

    /// Fraction of the charge that is scrap rather than hot metal.
    /// unit: dimensionless, within [0, 1]
    /// default: 0.7
    pub scrap_ratio: FloatValue,
}

impl Default for ProcessParameters {
    fn default() -> Self {
        Self {
            capacity: 100.0,
            cycle_minutes: 60.0,
            operating_days: 320.0,
            steel_charge_ratio: 1.087,
            scrap_ratio: 0.7,
        }
    }
}

impl ProcessParameters {
    pub fn get(&self, field: ParameterField) -> FloatValue {
        match field {
            ParameterField::Capacity => self.capacity,
            ParameterField::CycleMinutes => self.cycle_minutes,
            ParameterField::OperatingDays => self.operating_days,
            ParameterField::SteelChargeRatio => self.steel_charge_ratio,
            ParameterField::ScrapRatio => self.scrap_ratio,
        }
    }

    pub fn set(&mut self, field: ParameterField, value: FloatValue) {
        let slot = match field {
            ParameterField::Capacity => &mut self.capacity,
            ParameterField::CycleMinutes => &mut self.cycle_minutes,
            ParameterField::OperatingDays => &mut self.operating_days,
            ParameterField::SteelChargeRatio => &mut self.steel_charge_ratio,
            ParameterField::ScrapRatio => &mut self.scrap_ratio,
        };
        *slot = value;
    }
}

/// Names the editable fields of [`ProcessParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterField {
    Capacity,
    CycleMinutes,
    OperatingDays,
    SteelChargeRatio,
    ScrapRatio,
}

impl ParameterField {
    pub const ALL: [Self; 5] = [
        Self::Capacity,
        Self::CycleMinutes,
        Self::OperatingDays,
        Self::SteelChargeRatio,
        Self::ScrapRatio,
    ];

    /// Label shown next to the input field.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Capacity => "Furnace capacity (t)",
            Self::CycleMinutes => "Cycle time (min)",
            Self::OperatingDays => "Operating days per year",
            Self::SteelChargeRatio => "Steel charge consumption (t/t)",
            Self::ScrapRatio => "Scrap ratio",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Capacity => "capacity",
            Self::CycleMinutes => "cycle_minutes",
            Self::OperatingDays => "operating_days",
            Self::SteelChargeRatio => "steel_charge_ratio",
            Self::ScrapRatio => "scrap_ratio",
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-ton consumption intensities keyed by material name.
///
/// Values are in each material's display unit. Names are resolved against the
/// reference table at calculation time, so unknown names are kept here and
/// reported by the engine rather than rejected on entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntensityInput(BTreeMap<String, FloatValue>);

impl IntensityInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an intensity, replacing any previous value.
    pub fn set(&mut self, material: impl Into<String>, value: FloatValue) {
        self.0.insert(material.into(), value);
    }

    /// Builder-style variant of [`IntensityInput::set`].
    #[must_use]
    pub fn with(mut self, material: impl Into<String>, value: FloatValue) -> Self {
        self.set(material, value);
        self
    }

    pub fn get(&self, material: &str) -> Option<FloatValue> {
        self.0.get(material).copied()
    }

    pub fn remove(&mut self, material: &str) -> Option<FloatValue> {
        self.0.remove(material)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FloatValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FloatValue)> for IntensityInput {
    fn from_iter<I: IntoIterator<Item = (S, FloatValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = ProcessParameters::default();
        assert!((params.capacity - 100.0).abs() < 1e-10);
        assert!((params.cycle_minutes - 60.0).abs() < 1e-10);
        assert!((params.operating_days - 320.0).abs() < 1e-10);
        assert!((params.steel_charge_ratio - 1.087).abs() < 1e-10);
        assert!((params.scrap_ratio - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_get_set_round_trip_per_field() {
        let mut params = ProcessParameters::default();
        for (i, field) in ParameterField::ALL.into_iter().enumerate() {
            params.set(field, i as f64 + 0.5);
        }
        assert_eq!(params.get(ParameterField::Capacity), 0.5);
        assert_eq!(params.get(ParameterField::ScrapRatio), 4.5);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let params: ProcessParameters = toml::from_str("capacity = 150.0").unwrap();
        assert_eq!(params.capacity, 150.0);
        assert_eq!(params.cycle_minutes, 60.0);
    }

    #[test]
    fn test_intensity_input_replaces_values() {
        let mut input = IntensityInput::new().with("lime", 40.0);
        input.set("lime", 45.0);
        assert_eq!(input.get("lime"), Some(45.0));
        assert_eq!(input.len(), 1);
        assert_eq!(input.remove("lime"), Some(45.0));
        assert!(input.is_empty());
    }
}
