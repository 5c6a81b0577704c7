//! Ranked emission breakdowns for charts and tables.

use crate::engine::EmissionEntry;
use crate::units::{MassScale, Tonnage};
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Number of entries shown in a compact chart.
pub const DEFAULT_TOP_N: usize = 5;

/// One row of a ranked breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub material: String,
    pub label: String,
    /// unit: t CO₂/yr
    pub quantity: FloatValue,
    /// Contribution per ton of steel.
    /// unit: kg CO₂/t
    pub per_ton_kg: FloatValue,
    /// Fraction of the ranked total, 0 when the total is 0.
    pub share: FloatValue,
}

/// Emission entries sorted by quantity, largest first.
///
/// Ties keep reference table order, so rankings are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankedEntry>,
}

impl Ranking {
    pub fn new(entries: &[EmissionEntry], annual_output: Tonnage) -> Self {
        let annual_tons = annual_output.tons();
        let total: FloatValue = entries.iter().map(|e| e.quantity).sum();

        let mut ranked: Vec<RankedEntry> = entries
            .iter()
            .map(|entry| RankedEntry {
                material: entry.material.clone(),
                label: entry.label.clone(),
                quantity: entry.quantity,
                per_ton_kg: per_ton_kg(entry.quantity, annual_tons),
                share: if total > 0.0 {
                    entry.quantity / total
                } else {
                    0.0
                },
            })
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.quantity.total_cmp(&a.quantity));

        Self { entries: ranked }
    }

    /// Every entry, zeros included, for tabular display.
    pub fn all(&self) -> &[RankedEntry] {
        &self.entries
    }

    /// The `n` largest non-zero entries.
    pub fn top(&self, n: usize) -> &[RankedEntry] {
        let nonzero = self.entries.iter().take_while(|e| e.quantity > 0.0).count();
        &self.entries[..n.min(nonzero)]
    }

    /// The [`DEFAULT_TOP_N`] largest non-zero entries.
    pub fn top_default(&self) -> &[RankedEntry] {
        self.top(DEFAULT_TOP_N)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-ton contribution in kg CO₂/t; 0 when nothing is produced.
pub(crate) fn per_ton_kg(quantity_tons: FloatValue, annual_tons: FloatValue) -> FloatValue {
    if annual_tons > 0.0 {
        Tonnage::from_tons(quantity_tons / annual_tons)
            .to(MassScale::Kilograms)
            .value()
    } else {
        0.0
    }
}
