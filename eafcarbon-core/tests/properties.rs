//! Property tests for the emissions calculation engine.
//!
//! These tests verify that the model's invariants hold across a range of inputs:
//! - Charge split conservation and throughput arithmetic
//! - Idempotence of recomputation
//! - Monotonicity of emissions in each intensity
//! - Recovery from invalid inputs without NaN or negative figures

use approx::assert_relative_eq;
use eafcarbon_core::engine::{calculate, daily_furnace_cycles, Calculation, ChargeSplit};
use eafcarbon_core::errors::{DomainError, InputProblem, InputSource};
use eafcarbon_core::input::coerce_numeric;
use eafcarbon_core::materials::{MaterialRole, REFERENCE_TABLE};
use eafcarbon_core::parameters::{IntensityInput, ParameterField, ProcessParameters};

fn grid(start: f64, stop: f64, steps: usize) -> impl Iterator<Item = f64> {
    (0..=steps).map(move |i| start + (stop - start) * i as f64 / steps as f64)
}

fn assert_all_finite(calc: &Calculation) {
    let figures = calc.figures;
    for value in [
        figures.daily_furnace_cycles,
        figures.daily_output,
        figures.annual_output,
        figures.annual_steel_charge_demand,
        calc.total_emissions,
        calc.net_emissions,
        calc.intensity.per_ton,
        calc.intensity.net_per_ton,
    ] {
        assert!(value.is_finite(), "non-finite figure in {figures:?}");
    }
    assert!(calc.amounts.iter().all(|a| a.amount.is_finite()));
}

fn rejected_fields(calc: &Calculation) -> Vec<ParameterField> {
    calc.errors
        .iter()
        .filter_map(|e| match e {
            DomainError::InvalidParameter {
                input: InputSource::Parameter(field),
                problem: InputProblem::NotFinite,
                ..
            } => Some(*field),
            _ => None,
        })
        .collect()
}

fn all_entered(value: f64) -> IntensityInput {
    REFERENCE_TABLE
        .entered()
        .map(|m| (m.key.clone(), value))
        .collect()
}

mod production_figures {
    use super::*;

    /// Cycles per day are exactly 1440 over the cycle time.
    #[test]
    fn test_daily_cycles_exact() {
        for cycle in [1.0, 15.0, 37.5, 60.0, 90.0, 1440.0, 2000.0] {
            assert_eq!(daily_furnace_cycles(cycle).unwrap(), 1440.0 / cycle);
        }
    }

    /// Hot metal and scrap shares always add back up to the charge ratio.
    #[test]
    fn test_charge_split_conserves_ratio() {
        for ratio in grid(0.9, 1.2, 12) {
            for scrap in grid(0.0, 1.0, 20) {
                let split = ChargeSplit::new(ratio, scrap);
                assert_relative_eq!(
                    split.iron_ratio + split.scrap_amount_ratio,
                    ratio,
                    epsilon = 1e-9
                );
            }
        }
    }

    /// Well-formed inputs give finite, non-negative figures everywhere.
    #[test]
    fn test_outputs_finite_and_non_negative() {
        for capacity in [0.0, 50.0, 150.0] {
            for scrap_ratio in [0.0, 0.35, 1.0] {
                let params = ProcessParameters {
                    capacity,
                    scrap_ratio,
                    ..Default::default()
                };
                let calc = calculate(&params, &all_entered(12.0));
                assert!(calc.is_clean());
                let figures = calc.figures;
                for value in [
                    figures.annual_output,
                    figures.annual_steel_charge_demand,
                    calc.total_emissions,
                    calc.intensity.per_ton,
                ] {
                    assert!(value.is_finite() && value >= 0.0);
                }
                assert!(calc.amounts.iter().all(|a| a.amount.is_finite() && a.amount >= 0.0));
                assert!(calc
                    .emissions
                    .iter()
                    .chain(&calc.offsets)
                    .all(|e| e.quantity.is_finite() && e.quantity >= 0.0));
            }
        }
    }
}

mod recomputation {
    use super::*;

    /// Identical inputs give bit-identical outputs.
    #[test]
    fn test_idempotent() {
        let params = ProcessParameters::default();
        let intensities = all_entered(7.5);
        let first = calculate(&params, &intensities);
        let second = calculate(&params, &intensities);
        assert_eq!(first, second);
        assert_eq!(
            first.total_emissions.to_bits(),
            second.total_emissions.to_bits()
        );
    }

    /// Raising one intensity never lowers its emission or the gross total.
    #[test]
    fn test_monotone_in_each_intensity() {
        let params = ProcessParameters::default();
        let base = all_entered(10.0);
        let baseline = calculate(&params, &base);

        for material in REFERENCE_TABLE.entered() {
            let raised = base.clone().with(material.key.clone(), 25.0);
            let calc = calculate(&params, &raised);
            assert!(
                calc.emission(&material.key).unwrap() >= baseline.emission(&material.key).unwrap(),
                "{} contribution decreased",
                material.key
            );
            assert!(
                calc.total_emissions >= baseline.total_emissions,
                "total decreased when raising {}",
                material.key
            );
        }
    }

    /// Gross total includes every entry, zero or not.
    #[test]
    fn test_total_is_sum_of_entries() {
        let calc = calculate(&ProcessParameters::default(), &all_entered(3.0));
        let sum: f64 = calc.emissions.iter().map(|e| e.quantity).sum();
        assert_eq!(calc.total_emissions, sum);
        assert_eq!(calc.ranking.len(), calc.emissions.len());
    }
}

mod zero_and_invalid_inputs {
    use super::*;

    /// No intensities and no charge means no emissions.
    #[test]
    fn test_zero_input_zero_total() {
        let params = ProcessParameters {
            steel_charge_ratio: 0.0,
            ..Default::default()
        };
        let calc = calculate(&params, &IntensityInput::new());
        assert_eq!(calc.total_emissions, 0.0);
        assert_eq!(calc.intensity.per_ton, 0.0);
        assert!(calc.ranking.top_default().is_empty());
    }

    /// Unknown names are flagged and add nothing, never NaN.
    #[test]
    fn test_unknown_material_contributes_zero() {
        let params = ProcessParameters::default();
        let known = all_entered(5.0);
        let with_unknown = known.clone().with("kryptonite", 1e6);

        let baseline = calculate(&params, &known);
        let calc = calculate(&params, &with_unknown);

        assert_eq!(calc.total_emissions, baseline.total_emissions);
        assert!(!calc.total_emissions.is_nan());
        assert_eq!(calc.errors.len(), 1);
        assert_eq!(calc.errors[0].material(), Some("kryptonite"));
        assert!(matches!(calc.errors[0], DomainError::UnknownMaterial { .. }));
    }

    /// A negative cycle time reports zero cycles, not a negative or infinite count.
    #[test]
    fn test_negative_cycle_time_recovered() {
        for cycle in [-10.0, 0.0, f64::NEG_INFINITY, f64::NAN] {
            let params = ProcessParameters {
                cycle_minutes: cycle,
                ..Default::default()
            };
            let calc = calculate(&params, &all_entered(5.0));
            assert_eq!(calc.figures.daily_furnace_cycles, 0.0);
            assert_eq!(calc.total_emissions, 0.0);
            assert!(matches!(
                calc.errors.as_slice(),
                [DomainError::InvalidParameter { .. }]
            ));
        }
    }

    /// A subnormal cycle time overflows the cycle count and is reported, never NaN.
    #[test]
    fn test_subnormal_cycle_time_recovered() {
        let cycle_minutes = coerce_numeric("1e-320");
        assert!(cycle_minutes > 0.0);
        for capacity in [0.0, 100.0] {
            let params = ProcessParameters {
                capacity,
                cycle_minutes,
                ..Default::default()
            };
            let calc = calculate(&params, &all_entered(5.0));
            assert_all_finite(&calc);
            assert_eq!(calc.figures.daily_furnace_cycles, 0.0);
            assert_eq!(calc.total_emissions, 0.0);
            assert!(!calc.is_clean());
            assert_eq!(rejected_fields(&calc), vec![ParameterField::CycleMinutes]);
        }
    }

    /// Finite parameters whose product overflows are reported against the one that overflowed.
    #[test]
    fn test_overflowing_output_recovered() {
        let cases = [
            (f64::MAX, 320.0, ParameterField::Capacity),
            (1e300, 1e10, ParameterField::OperatingDays),
        ];
        for (capacity, operating_days, field) in cases {
            let params = ProcessParameters {
                capacity,
                operating_days,
                ..Default::default()
            };
            let calc = calculate(&params, &all_entered(5.0));
            assert_all_finite(&calc);
            assert_eq!(calc.figures.annual_output, 0.0);
            assert_eq!(rejected_fields(&calc), vec![field]);
        }

        let params = ProcessParameters {
            steel_charge_ratio: f64::MAX,
            ..Default::default()
        };
        let calc = calculate(&params, &IntensityInput::new());
        assert_all_finite(&calc);
        assert_eq!(calc.figures.iron_ratio, 0.0);
        assert_eq!(
            rejected_fields(&calc),
            vec![ParameterField::SteelChargeRatio]
        );
    }

    /// Every invalid parameter is reported, and the result still renders.
    #[test]
    fn test_multiple_invalid_parameters_all_reported() {
        let params = ProcessParameters {
            capacity: -100.0,
            cycle_minutes: 60.0,
            operating_days: f64::INFINITY,
            steel_charge_ratio: -1.0,
            scrap_ratio: -0.2,
        };
        let calc = calculate(&params, &IntensityInput::new().with("lime", -1.0));
        assert_eq!(calc.errors.len(), 5);
        assert_eq!(calc.total_emissions, 0.0);
        assert!(calc.figures.iron_ratio >= 0.0);
    }

    /// Derived roles are never taken from the intensity input.
    #[test]
    fn test_derived_roles_ignore_input() {
        let params = ProcessParameters::default();
        let mut intensities = IntensityInput::new();
        for role in [MaterialRole::HotMetal, MaterialRole::Scrap] {
            let material = REFERENCE_TABLE.derived(role).unwrap();
            intensities.set(material.key.clone(), 1e9);
        }
        assert_eq!(
            calculate(&params, &intensities),
            calculate(&params, &IntensityInput::new())
        );
    }
}
