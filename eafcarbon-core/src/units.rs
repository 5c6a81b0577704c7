//! Display units and mass scales.
//!
//! The engine works in raw metric tons throughout. Two kinds of unit
//! information exist outside that base:
//!
//! - [`DisplayUnit`]: the unit a consumption intensity is entered in. Its
//!   divisor converts the entered per-ton figure into the base unit of the
//!   material's emission factor (e.g. kg/t ÷ 1000 → t/t).
//! - [`MassScale`]: the scale a mass figure is presented in. [`Tonnage`]
//!   carries its scale with the value, so converting between tons, kilograms
//!   and ten-thousand-ton units is always explicit.
//!
//! # Conversion Examples
//!
//! | From | To | Factor |
//! |------|-----|--------|
//! | t | 10⁴ t | 1e-4 |
//! | t | kg | 1000 |
//! | kWh/t entered | MWh/t | 1/1000 |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes per day.
pub const MINUTES_PER_DAY: f64 = 1440.0;
/// Kilograms per metric ton.
pub const KG_PER_TON: f64 = 1000.0;
/// Tons in one "ten-thousand-ton" (万吨) reporting unit.
pub const TONS_PER_TEN_THOUSAND_TONS: f64 = 10_000.0;

/// Unit in which a per-ton consumption intensity is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayUnit {
    /// Kilograms per ton of steel; factor base is tons.
    #[serde(rename = "kg/t")]
    KilogramPerTon,
    /// Tons per ton of steel.
    #[serde(rename = "t/t")]
    TonPerTon,
    /// Normal cubic metres per ton of steel.
    #[serde(rename = "Nm³/t")]
    NormalCubicMetrePerTon,
    /// Kilowatt hours per ton of steel; factor base is MWh.
    #[serde(rename = "kWh/t")]
    KilowattHourPerTon,
}

impl DisplayUnit {
    /// Divisor converting an entered intensity into the emission factor's base unit.
    pub const fn divisor(self) -> f64 {
        match self {
            Self::KilogramPerTon | Self::KilowattHourPerTon => 1000.0,
            Self::TonPerTon | Self::NormalCubicMetrePerTon => 1.0,
        }
    }

    /// Symbol shown next to an input field.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::KilogramPerTon => "kg/t",
            Self::TonPerTon => "t/t",
            Self::NormalCubicMetrePerTon => "Nm³/t",
            Self::KilowattHourPerTon => "kWh/t",
        }
    }

    /// Symbol of the base unit the yearly amount is expressed in.
    pub const fn base_symbol(self) -> &'static str {
        match self {
            Self::KilogramPerTon | Self::TonPerTon => "t",
            Self::NormalCubicMetrePerTon => "Nm³",
            Self::KilowattHourPerTon => "MWh",
        }
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Scale of a mass figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassScale {
    Kilograms,
    Tons,
    TenThousandTons,
}

impl MassScale {
    /// Number of tons in one unit of this scale.
    pub const fn tons_per_unit(self) -> f64 {
        match self {
            Self::Kilograms => 1.0 / KG_PER_TON,
            Self::Tons => 1.0,
            Self::TenThousandTons => TONS_PER_TEN_THOUSAND_TONS,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kilograms => "kg",
            Self::Tons => "t",
            Self::TenThousandTons => "10⁴ t",
        }
    }
}

/// A mass tagged with the scale it is expressed in.
///
/// Arithmetic between tonnages is deliberately absent: callers normalise
/// with [`Tonnage::tons`] before combining figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tonnage {
    value: f64,
    scale: MassScale,
}

impl Tonnage {
    pub const fn new(value: f64, scale: MassScale) -> Self {
        Self { value, scale }
    }

    /// A mass in raw tons.
    pub const fn from_tons(value: f64) -> Self {
        Self::new(value, MassScale::Tons)
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn scale(&self) -> MassScale {
        self.scale
    }

    /// The mass in raw tons, whatever scale it is held in.
    pub fn tons(&self) -> f64 {
        self.value * self.scale.tons_per_unit()
    }

    /// Re-express the mass in another scale.
    #[must_use]
    pub fn to(&self, scale: MassScale) -> Self {
        if scale == self.scale {
            return *self;
        }
        Self::new(self.tons() / scale.tons_per_unit(), scale)
    }
}

impl fmt::Display for Tonnage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => write!(f, "{:.*} {}", precision, self.value, self.scale.symbol()),
            None => write!(f, "{} {}", self.value, self.scale.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_divisors() {
        assert_eq!(DisplayUnit::KilogramPerTon.divisor(), 1000.0);
        assert_eq!(DisplayUnit::KilowattHourPerTon.divisor(), 1000.0);
        assert_eq!(DisplayUnit::TonPerTon.divisor(), 1.0);
        assert_eq!(DisplayUnit::NormalCubicMetrePerTon.divisor(), 1.0);
    }

    #[test]
    fn test_ten_thousand_ton_rescaling() {
        let annual = Tonnage::from_tons(768_000.0);
        let scaled = annual.to(MassScale::TenThousandTons);
        assert!(is_close!(scaled.value(), 76.8));
        // Normalising back yields the raw figure regardless of display scale
        assert!(is_close!(scaled.tons(), 768_000.0));
    }

    #[test]
    fn test_kilogram_rescaling() {
        let per_ton = Tonnage::from_tons(1.5).to(MassScale::Kilograms);
        assert!(is_close!(per_ton.value(), 1500.0));
        assert_eq!(per_ton.scale(), MassScale::Kilograms);
    }

    #[test]
    fn test_display_precision() {
        let scaled = Tonnage::new(76.8, MassScale::TenThousandTons);
        assert_eq!(format!("{scaled:.4}"), "76.8000 10⁴ t");
    }

    #[test]
    fn test_display_unit_serde_names() {
        let encoded = serde_json::to_string(&DisplayUnit::NormalCubicMetrePerTon).unwrap();
        assert_eq!(encoded, "\"Nm³/t\"");
        let decoded: DisplayUnit = serde_json::from_str("\"kWh/t\"").unwrap();
        assert_eq!(decoded, DisplayUnit::KilowattHourPerTon);
    }
}
