//! Editable calculator state for one interactive session.
//!
//! A [`Session`] owns the current [`ProcessParameters`] and [`IntensityInput`].
//! Front ends feed it raw field text; every edit is coerced, stored, and the
//! caller recomputes with [`Session::calculate`]. Nothing outlives the session.

use crate::engine::{calculate_with, Calculation};
use crate::input::coerce_numeric;
use crate::materials::{ReferenceTable, REFERENCE_TABLE};
use crate::parameters::{IntensityInput, ParameterField, ProcessParameters};
use crate::report::ReportView;
use crate::scenario::Scenario;
use crate::units::DisplayUnit;
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Description of a user-editable intensity field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityField {
    pub material: String,
    pub label: String,
    pub unit: DisplayUnit,
}

#[derive(Debug, Clone)]
pub struct Session<'a> {
    table: &'a ReferenceTable,
    parameters: ProcessParameters,
    intensities: IntensityInput,
}

impl Default for Session<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Session<'static> {
    /// A session with default parameters against the built-in table.
    pub fn new() -> Self {
        Self::with_table(&REFERENCE_TABLE)
    }

    pub fn from_scenario(scenario: Scenario) -> Self {
        let mut session = Self::new();
        session.parameters = scenario.parameters;
        session.intensities = scenario.intensities;
        session
    }
}

impl<'a> Session<'a> {
    pub fn with_table(table: &'a ReferenceTable) -> Self {
        Self {
            table,
            parameters: ProcessParameters::default(),
            intensities: IntensityInput::new(),
        }
    }

    pub fn parameters(&self) -> &ProcessParameters {
        &self.parameters
    }

    pub fn intensities(&self) -> &IntensityInput {
        &self.intensities
    }

    /// Stores the coerced value of a parameter field and returns it.
    pub fn edit_parameter(&mut self, field: ParameterField, text: &str) -> FloatValue {
        let value = coerce_numeric(text);
        self.parameters.set(field, value);
        value
    }

    /// Stores the coerced intensity of a material and returns it.
    ///
    /// Clearing a field (empty text) removes the entry, which counts as 0.
    pub fn edit_intensity(&mut self, material: &str, text: &str) -> FloatValue {
        if text.trim().is_empty() {
            self.intensities.remove(material);
            return 0.0;
        }
        let value = coerce_numeric(text);
        self.intensities.set(material, value);
        value
    }

    /// Fields the user can enter an intensity for, in display order.
    ///
    /// Hot metal and scrap are derived from the charge split and are not listed.
    pub fn intensity_fields(&self) -> Vec<IntensityField> {
        self.table
            .entered()
            .map(|m| IntensityField {
                material: m.key.clone(),
                label: m.label.clone(),
                unit: m.unit,
            })
            .collect()
    }

    /// Recomputes everything from the current inputs.
    pub fn calculate(&self) -> Calculation {
        calculate_with(self.table, &self.parameters, &self.intensities)
    }

    /// Recomputes and formats the result for display.
    pub fn report(&self) -> ReportView {
        ReportView::new(&self.calculate())
    }

    /// The current inputs as a scenario.
    pub fn scenario(&self) -> Scenario {
        Scenario {
            parameters: self.parameters.clone(),
            intensities: self.intensities.clone(),
        }
    }
}
