//! Display-ready view of a calculation.
//!
//! [`ReportView`] is what a front end renders and what exporters write: every
//! figure as a number plus a string formatted to the precision its unit
//! calls for.

use crate::engine::Calculation;
use crate::ranking::RankedEntry;
use crate::units::{MassScale, Tonnage};
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// File stem used for exported reports.
pub const REPORT_FILE_STEM: &str = "carbon-report";

/// A number together with its formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub label: String,
    pub value: FloatValue,
    pub text: String,
}

impl Figure {
    fn new(label: &str, value: FloatValue, precision: usize, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            value,
            text: format!("{value:.precision$} {unit}"),
        }
    }
}

/// One row of a breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub material: String,
    pub label: String,
    pub value: FloatValue,
    pub text: String,
}

/// Formatted view of a [`Calculation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub title: String,
    /// Headline figures in display order.
    pub summary: Vec<Figure>,
    /// Largest contributors, for a compact chart.
    pub top: Vec<BreakdownRow>,
    /// Every emission source by total, largest first.
    pub totals: Vec<BreakdownRow>,
    /// Every emission source per ton of steel, largest first.
    pub per_ton: Vec<BreakdownRow>,
    /// Offset entries by total, in table order.
    pub offsets: Vec<BreakdownRow>,
    /// Recovered input problems, as messages.
    pub warnings: Vec<String>,
}

impl ReportView {
    pub fn new(calculation: &Calculation) -> Self {
        Self::with_top_n(calculation, crate::ranking::DEFAULT_TOP_N)
    }

    pub fn with_top_n(calculation: &Calculation, top_n: usize) -> Self {
        let figures = &calculation.figures;
        let annual = Tonnage::from_tons(figures.annual_output).to(MassScale::TenThousandTons);
        let intensity = &calculation.intensity;

        let summary = vec![
            Figure::new("Hot metal per ton of steel", figures.iron_ratio, 3, "t"),
            Figure::new("Scrap per ton of steel", figures.scrap_amount_ratio, 3, "t"),
            Figure::new(
                "Daily furnace cycles",
                figures.daily_furnace_cycles,
                2,
                "heats",
            ),
            Figure::new("Daily output", figures.daily_output, 2, "t"),
            Figure::new("Annual output", annual.value(), 4, annual.scale().symbol()),
            Figure::new(
                "Annual steel charge demand",
                figures.annual_steel_charge_demand,
                2,
                "t",
            ),
            Figure::new(
                "Total emissions",
                calculation.total_emissions,
                2,
                "t CO₂",
            ),
            Figure::new("Total offsets", calculation.total_offsets, 2, "t CO₂"),
            Figure::new("Net emissions", calculation.net_emissions, 2, "t CO₂"),
            Figure::new(
                "Emissions per ton of steel",
                intensity.per_ton_kg(),
                2,
                "kg CO₂/t",
            ),
            Figure::new(
                "Net emissions per ton of steel",
                intensity.net_per_ton_kg(),
                2,
                "kg CO₂/t",
            ),
        ];

        let ranking = &calculation.ranking;
        let total_row = |e: &RankedEntry| row(e, e.quantity, "t CO₂");
        let mut per_ton: Vec<BreakdownRow> = ranking
            .all()
            .iter()
            .map(|e| row(e, e.per_ton_kg, "kg CO₂/t"))
            .collect();
        per_ton.sort_by(|a, b| b.value.total_cmp(&a.value));

        Self {
            title: "EAF carbon emissions report".to_string(),
            summary,
            top: ranking.top(top_n).iter().map(total_row).collect(),
            totals: ranking.all().iter().map(total_row).collect(),
            per_ton,
            offsets: calculation
                .offsets
                .iter()
                .map(|e| BreakdownRow {
                    material: e.material.clone(),
                    label: e.label.clone(),
                    value: e.quantity,
                    text: format!("{}: {:.3} t CO₂", e.label, e.quantity),
                })
                .collect(),
            warnings: calculation.errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// Looks up a summary figure by label.
    pub fn figure(&self, label: &str) -> Option<&Figure> {
        self.summary.iter().find(|f| f.label == label)
    }
}

fn row(entry: &RankedEntry, value: FloatValue, unit: &str) -> BreakdownRow {
    BreakdownRow {
        material: entry.material.clone(),
        label: entry.label.clone(),
        value,
        text: format!("{}: {value:.3} {unit}", entry.label),
    }
}
