//! EAF emissions calculation engine.
//!
//! Turns [`ProcessParameters`] and an [`IntensityInput`] into yearly material
//! amounts, per-material CO₂ emissions, totals and emission intensity.
//!
//! # Algorithm
//!
//! Each step consumes the value produced by the one before it, so no figure
//! can be used before it exists:
//!
//! 1. Throughput: $n_{day} = 1440 / t_{cycle}$
//! 2. Output: $P_{day} = C \cdot n_{day}$, $P_{yr} = P_{day} \cdot D$
//! 3. Charge split: $r_{iron} = r (1 - s)$, $r_{scrap} = r s$
//! 4. Amounts: $A_m = I_m \cdot P_{yr} / d_m$ for entered materials,
//!    $A_{iron} = r_{iron} P_{yr}$, $A_{scrap} = r_{scrap} P_{yr}$
//! 5. Emissions: $E_m = A_m \cdot f_m$
//! 6. Totals: $E = \sum_m E_m$ over every emission entry, zeros included,
//!    offsets excluded
//! 7. Intensity: $E / P_{yr}$
//! 8. Ranking by $E_m$
//!
//! Offsets (recovered steam, billet) are kept apart from the emission entries:
//! they are excluded from the gross total and from the ranking, and only
//! enter `net_emissions` and the net intensity.
//!
//! All masses are raw metric tons. Scrap, like hot metal, is based on annual
//! output rather than annual charge demand.
//!
//! # Recovery
//!
//! Invalid inputs never abort a calculation. Each one is replaced by a safe
//! value and recorded as a [`DomainError`] in [`Calculation::errors`]:
//!
//! | Input | Condition | Substitute |
//! |-------|-----------|------------|
//! | cycle time | ≤ 0 or non-finite | 0 cycles per day |
//! | capacity, days, charge ratio, intensity | < 0 or non-finite | 0 |
//! | scrap ratio | outside [0, 1] | clamped into [0, 1] |
//! | material name | not in the table | contributes 0 |
//! | any of the above | finite, but overflows a product | 0 |

use crate::errors::{DomainError, InputProblem, InputSource};
use crate::materials::{Flow, MaterialRole, ReferenceTable, REFERENCE_TABLE};
use crate::parameters::{IntensityInput, ParameterField, ProcessParameters};
use crate::ranking::Ranking;
use crate::units::{DisplayUnit, MassScale, Tonnage, MINUTES_PER_DAY};
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Production figures derived from the process parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFigures {
    pub daily_furnace_cycles: FloatValue,
    /// unit: t/day
    pub daily_output: FloatValue,
    /// unit: t/yr
    pub annual_output: FloatValue,
    /// Annual iron-bearing charge, `annual_output × steel_charge_ratio`.
    /// unit: t/yr
    pub annual_steel_charge_demand: FloatValue,
    /// Hot metal per ton of steel.
    /// unit: t/t
    pub iron_ratio: FloatValue,
    /// Scrap per ton of steel.
    /// unit: t/t
    pub scrap_amount_ratio: FloatValue,
}

impl DerivedFigures {
    pub fn annual_output_tonnage(&self) -> Tonnage {
        Tonnage::from_tons(self.annual_output)
    }
}

/// Yearly consumption of one material, in its emission factor's base unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialAmount {
    pub material: String,
    pub unit: DisplayUnit,
    pub amount: FloatValue,
}

impl MaterialAmount {
    /// Symbol of the unit `amount` is expressed in, per year.
    pub fn base_symbol(&self) -> &'static str {
        self.unit.base_symbol()
    }
}

/// CO₂ attributed to one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionEntry {
    pub material: String,
    pub label: String,
    /// unit: t CO₂/yr
    pub quantity: FloatValue,
}

/// Emission intensity of the steel produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionIntensity {
    /// Gross emissions per ton of steel.
    /// unit: t CO₂/t
    pub per_ton: FloatValue,
    /// Emissions net of offsets per ton of steel.
    /// unit: t CO₂/t
    pub net_per_ton: FloatValue,
}

impl EmissionIntensity {
    /// Gross intensity in kg CO₂/t.
    pub fn per_ton_kg(&self) -> FloatValue {
        Tonnage::from_tons(self.per_ton).to(MassScale::Kilograms).value()
    }

    /// Net intensity in kg CO₂/t.
    pub fn net_per_ton_kg(&self) -> FloatValue {
        Tonnage::from_tons(self.net_per_ton)
            .to(MassScale::Kilograms)
            .value()
    }
}

/// Everything produced by one recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub figures: DerivedFigures,
    /// Amounts for every material in the table, in table order.
    pub amounts: Vec<MaterialAmount>,
    /// Emission entries in table order.
    pub emissions: Vec<EmissionEntry>,
    /// Offset entries in table order.
    pub offsets: Vec<EmissionEntry>,
    /// unit: t CO₂/yr
    pub total_emissions: FloatValue,
    /// unit: t CO₂/yr
    pub total_offsets: FloatValue,
    /// `total_emissions - total_offsets`.
    /// unit: t CO₂/yr
    pub net_emissions: FloatValue,
    pub intensity: EmissionIntensity,
    pub ranking: Ranking,
    /// Problems recovered from while calculating.
    pub errors: Vec<DomainError>,
}

impl Calculation {
    /// True when no input had to be substituted.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn amount(&self, material: &str) -> Option<FloatValue> {
        self.amounts
            .iter()
            .find(|a| a.material == material)
            .map(|a| a.amount)
    }

    /// Emission or offset quantity of a material.
    pub fn emission(&self, material: &str) -> Option<FloatValue> {
        self.emissions
            .iter()
            .chain(&self.offsets)
            .find(|e| e.material == material)
            .map(|e| e.quantity)
    }
}

/// Calculates emissions against the built-in reference table.
pub fn calculate(parameters: &ProcessParameters, intensities: &IntensityInput) -> Calculation {
    calculate_with(&REFERENCE_TABLE, parameters, intensities)
}

/// Like [`calculate`], but fails on the first recovered problem.
pub fn calculate_strict(
    parameters: &ProcessParameters,
    intensities: &IntensityInput,
) -> Result<Calculation, DomainError> {
    let mut calculation = calculate(parameters, intensities);
    if calculation.errors.is_empty() {
        Ok(calculation)
    } else {
        Err(calculation.errors.swap_remove(0))
    }
}

/// Calculates emissions against a specific reference table.
pub fn calculate_with(
    table: &ReferenceTable,
    parameters: &ProcessParameters,
    intensities: &IntensityInput,
) -> Calculation {
    let mut checks = Checks::default();

    let cycles = match daily_furnace_cycles(parameters.cycle_minutes) {
        Ok(cycles) => cycles,
        Err(e) => {
            checks.errors.push(e);
            0.0
        }
    };
    let capacity = checks.non_negative(ParameterField::Capacity, parameters.capacity);
    let days = checks.non_negative(ParameterField::OperatingDays, parameters.operating_days);
    let charge_ratio = checks.non_negative(
        ParameterField::SteelChargeRatio,
        parameters.steel_charge_ratio,
    );
    let scrap_ratio = checks.fraction(ParameterField::ScrapRatio, parameters.scrap_ratio);

    // Finite inputs can still overflow once multiplied together
    let capacity = checks.bounded(ParameterField::Capacity, capacity, capacity * cycles);
    let days = checks.bounded(
        ParameterField::OperatingDays,
        days,
        capacity * cycles * days,
    );
    let charge_ratio = checks.bounded(
        ParameterField::SteelChargeRatio,
        charge_ratio,
        capacity * cycles * days * charge_ratio,
    );

    let volumes = OutputVolumes::new(capacity, cycles, days);
    let split = ChargeSplit::new(charge_ratio, scrap_ratio);
    let figures = DerivedFigures {
        daily_furnace_cycles: cycles,
        daily_output: volumes.daily_output,
        annual_output: volumes.annual_output,
        annual_steel_charge_demand: volumes.annual_output * charge_ratio,
        iron_ratio: split.iron_ratio,
        scrap_amount_ratio: split.scrap_amount_ratio,
    };

    let amounts = material_amounts(table, &figures, intensities, &mut checks);
    let (emissions, offsets) = material_emissions(table, &amounts);

    let total_emissions: FloatValue = emissions.iter().map(|e| e.quantity).sum();
    let total_offsets: FloatValue = offsets.iter().map(|e| e.quantity).sum();
    let net_emissions = total_emissions - total_offsets;
    let annual_output = figures.annual_output_tonnage();
    let intensity = EmissionIntensity {
        per_ton: per_ton(total_emissions, annual_output),
        net_per_ton: per_ton(net_emissions, annual_output),
    };
    let ranking = Ranking::new(&emissions, annual_output);

    let calculation = Calculation {
        figures,
        amounts,
        emissions,
        offsets,
        total_emissions,
        total_offsets,
        net_emissions,
        intensity,
        ranking,
        errors: checks.errors,
    };
    log_diagnostics(&calculation);
    calculation
}

// ============================================================================
// Steps
// ============================================================================

/// Furnace cycles per day for a given tap-to-tap time.
///
/// Cycle times so short that the count overflows are rejected as non-finite.
pub fn daily_furnace_cycles(cycle_minutes: FloatValue) -> Result<FloatValue, DomainError> {
    let problem = if !cycle_minutes.is_finite() {
        InputProblem::NotFinite
    } else if cycle_minutes <= 0.0 {
        InputProblem::NotPositive
    } else {
        let cycles = MINUTES_PER_DAY / cycle_minutes;
        if cycles.is_finite() {
            return Ok(cycles);
        }
        InputProblem::NotFinite
    };
    Err(DomainError::InvalidParameter {
        input: InputSource::Parameter(ParameterField::CycleMinutes),
        value: cycle_minutes,
        problem,
        substituted: 0.0,
    })
}

/// Daily and annual steel output in tons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputVolumes {
    pub daily_output: FloatValue,
    pub annual_output: FloatValue,
}

impl OutputVolumes {
    pub fn new(capacity: FloatValue, daily_cycles: FloatValue, operating_days: FloatValue) -> Self {
        let daily_output = capacity * daily_cycles;
        Self {
            daily_output,
            annual_output: daily_output * operating_days,
        }
    }
}

/// Division of the iron-bearing charge between hot metal and scrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeSplit {
    /// Hot metal per ton of steel.
    pub iron_ratio: FloatValue,
    /// Scrap per ton of steel.
    pub scrap_amount_ratio: FloatValue,
}

impl ChargeSplit {
    /// `scrap_ratio` is expected within [0, 1].
    pub fn new(steel_charge_ratio: FloatValue, scrap_ratio: FloatValue) -> Self {
        let scrap_amount_ratio = steel_charge_ratio * scrap_ratio;
        Self {
            iron_ratio: steel_charge_ratio * (1.0 - scrap_ratio),
            scrap_amount_ratio,
        }
    }
}

/// Yearly amounts for every material in `table`.
///
/// Entered materials without an intensity get an amount of 0. Hot metal and
/// scrap always come from the charge split; intensities supplied for them are
/// ignored.
fn material_amounts(
    table: &ReferenceTable,
    figures: &DerivedFigures,
    intensities: &IntensityInput,
    checks: &mut Checks,
) -> Vec<MaterialAmount> {
    let mut chosen: BTreeMap<usize, (&str, FloatValue)> = BTreeMap::new();
    for (name, value) in intensities.iter() {
        let Some(material) = table.lookup(name) else {
            checks.errors.push(DomainError::UnknownMaterial {
                name: name.to_string(),
            });
            continue;
        };
        if material.role.is_derived() {
            warn!(
                material = %material.key,
                value,
                "Ignoring intensity for a material derived from the charge split"
            );
            continue;
        }
        let Some(position) = table.position(&material.key) else {
            continue;
        };
        // The canonical key wins over aliases naming the same material
        let keep_existing = chosen
            .get(&position)
            .is_some_and(|&(existing, _)| existing == material.key || name != material.key);
        if !keep_existing {
            chosen.insert(position, (name, value));
        }
    }
    // Only values that survive alias resolution are validated
    let entered: BTreeMap<usize, (&str, FloatValue)> = chosen
        .into_iter()
        .map(|(position, (name, value))| {
            (position, (name, checks.non_negative_intensity(name, value)))
        })
        .collect();

    table
        .iter()
        .enumerate()
        .map(|(position, material)| {
            let amount = match material.role {
                MaterialRole::HotMetal => figures.iron_ratio * figures.annual_output,
                MaterialRole::Scrap => figures.scrap_amount_ratio * figures.annual_output,
                MaterialRole::Entered => match entered.get(&position) {
                    Some(&(name, intensity)) => {
                        let amount = intensity * figures.annual_output / material.unit_divisor();
                        let intensity = checks.bounded_intensity(
                            name,
                            intensity,
                            amount * material.emission_factor,
                        );
                        intensity * figures.annual_output / material.unit_divisor()
                    }
                    None => 0.0,
                },
            };
            MaterialAmount {
                material: material.key.clone(),
                unit: material.unit,
                amount,
            }
        })
        .collect()
}

/// Splits amounts into emission and offset entries.
fn material_emissions(
    table: &ReferenceTable,
    amounts: &[MaterialAmount],
) -> (Vec<EmissionEntry>, Vec<EmissionEntry>) {
    let mut emissions = Vec::new();
    let mut offsets = Vec::new();
    for amount in amounts {
        let Some(material) = table.lookup(&amount.material) else {
            continue;
        };
        let entry = EmissionEntry {
            material: material.key.clone(),
            label: material.label.clone(),
            quantity: amount.amount * material.emission_factor,
        };
        match material.flow {
            Flow::Emission => emissions.push(entry),
            Flow::Offset => offsets.push(entry),
        }
    }
    (emissions, offsets)
}

/// Emissions per raw ton of output; 0 when nothing is produced.
fn per_ton(emissions: FloatValue, annual_output: Tonnage) -> FloatValue {
    let tons = annual_output.tons();
    if tons > 0.0 {
        emissions / tons
    } else {
        0.0
    }
}

fn log_diagnostics(calculation: &Calculation) {
    for error in &calculation.errors {
        warn!(error = %error, "Recovered from invalid calculation input");
    }
    debug!(
        daily_furnace_cycles = calculation.figures.daily_furnace_cycles,
        annual_output_t = calculation.figures.annual_output,
        total_emissions_t = calculation.total_emissions,
        net_emissions_t = calculation.net_emissions,
        intensity_t_per_t = calculation.intensity.per_ton,
        "Recomputed EAF emissions"
    );
}

// ============================================================================
// Input checks
// ============================================================================

/// Collects recovered input problems while substituting safe values.
#[derive(Debug, Default)]
struct Checks {
    errors: Vec<DomainError>,
}

impl Checks {
    fn non_negative(&mut self, field: ParameterField, value: FloatValue) -> FloatValue {
        self.non_negative_from(InputSource::Parameter(field), value)
    }

    fn non_negative_intensity(&mut self, material: &str, value: FloatValue) -> FloatValue {
        self.non_negative_from(InputSource::Intensity(material.to_string()), value)
    }

    fn non_negative_from(&mut self, input: InputSource, value: FloatValue) -> FloatValue {
        let problem = if !value.is_finite() {
            InputProblem::NotFinite
        } else if value < 0.0 {
            InputProblem::Negative
        } else {
            return value;
        };
        self.reject(input, value, problem, 0.0)
    }

    /// Keeps `value` only while the product it feeds stays finite.
    fn bounded(
        &mut self,
        field: ParameterField,
        value: FloatValue,
        product: FloatValue,
    ) -> FloatValue {
        self.bounded_from(InputSource::Parameter(field), value, product)
    }

    fn bounded_intensity(
        &mut self,
        material: &str,
        value: FloatValue,
        product: FloatValue,
    ) -> FloatValue {
        self.bounded_from(InputSource::Intensity(material.to_string()), value, product)
    }

    fn bounded_from(
        &mut self,
        input: InputSource,
        value: FloatValue,
        product: FloatValue,
    ) -> FloatValue {
        if product.is_finite() {
            return value;
        }
        self.reject(input, value, InputProblem::NotFinite, 0.0)
    }

    fn fraction(&mut self, field: ParameterField, value: FloatValue) -> FloatValue {
        let input = InputSource::Parameter(field);
        if !value.is_finite() {
            return self.reject(input, value, InputProblem::NotFinite, 0.0);
        }
        if (0.0..=1.0).contains(&value) {
            return value;
        }
        self.reject(
            input,
            value,
            InputProblem::OutsideUnitInterval,
            value.clamp(0.0, 1.0),
        )
    }

    fn reject(
        &mut self,
        input: InputSource,
        value: FloatValue,
        problem: InputProblem,
        substituted: FloatValue,
    ) -> FloatValue {
        self.errors.push(DomainError::InvalidParameter {
            input,
            value,
            problem,
            substituted,
        });
        substituted
    }
}
