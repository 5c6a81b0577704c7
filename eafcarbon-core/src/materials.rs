//! Reference data for the materials and energy carriers of an EAF route.
//!
//! Each [`Material`] maps a name to the unit its intensity is entered in and
//! the emission factor applied to its yearly amount. Factors are expressed in
//! tons of CO₂ per unit of the material's base unit, which is the entered
//! display unit multiplied out by annual output and divided by the unit's
//! divisor (see [`DisplayUnit::divisor`]).
//!
//! Names must be unique across keys, labels and aliases. The built-in table
//! is checked at compile time; tables assembled at runtime are checked by
//! [`ReferenceTable::new`].

use crate::errors::ReferenceDataError;
use crate::units::DisplayUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// How a material's yearly amount is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialRole {
    /// Entered by the user as a per-ton intensity.
    Entered,
    /// Liquid iron / hot metal, derived from the charge split.
    HotMetal,
    /// Scrap steel, derived from the charge split.
    Scrap,
}

impl MaterialRole {
    pub const fn is_derived(self) -> bool {
        !matches!(self, Self::Entered)
    }
}

/// Whether a material's CO₂ enters or leaves the accounting boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Emission,
    /// Carbon exported from the boundary (recovered steam, cast product).
    Offset,
}

/// Compile-time description of a built-in material.
#[derive(Debug, Clone, Copy)]
pub struct MaterialSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub aliases: &'static [&'static str],
    pub unit: DisplayUnit,
    pub emission_factor: f64,
    pub role: MaterialRole,
    pub flow: Flow,
}

impl MaterialSpec {
    const fn entered(
        key: &'static str,
        label: &'static str,
        aliases: &'static [&'static str],
        unit: DisplayUnit,
        emission_factor: f64,
    ) -> Self {
        Self {
            key,
            label,
            aliases,
            unit,
            emission_factor,
            role: MaterialRole::Entered,
            flow: Flow::Emission,
        }
    }

    const fn with_role(mut self, role: MaterialRole) -> Self {
        self.role = role;
        self
    }

    const fn offset(mut self) -> Self {
        self.flow = Flow::Offset;
        self
    }
}

// ============================================================================
// Built-in reference data
// ============================================================================

pub const NATURAL_GAS: &str = "natural_gas";
pub const HOT_METAL: &str = "hot_metal";
pub const LIME: &str = "lime";
pub const LIGHT_BURNED_DOLOMITE: &str = "light_burned_dolomite";
pub const SCRAP_STEEL: &str = "scrap_steel";
pub const ELECTRODE: &str = "electrode";
pub const RECARBURIZER: &str = "recarburizer";
pub const ALLOY: &str = "alloy";
pub const ELECTRICITY: &str = "electricity";
pub const STEAM_RECOVERY: &str = "steam_recovery";
pub const BILLET: &str = "billet";

/// Built-in materials in display order.
pub const DEFAULT_MATERIALS: &[MaterialSpec] = &[
    MaterialSpec::entered(
        NATURAL_GAS,
        "Natural gas",
        &["天然气"],
        DisplayUnit::NormalCubicMetrePerTon,
        0.000_216_501_52,
    ),
    MaterialSpec::entered(
        HOT_METAL,
        "Hot metal / pig iron",
        &["铁水、生铁", "liquid_iron"],
        DisplayUnit::TonPerTon,
        1.739_32,
    )
    .with_role(MaterialRole::HotMetal),
    MaterialSpec::entered(LIME, "Lime", &["石灰"], DisplayUnit::KilogramPerTon, 1.023_711),
    MaterialSpec::entered(
        LIGHT_BURNED_DOLOMITE,
        "Light-burned dolomite",
        &["轻烧白云石"],
        DisplayUnit::KilogramPerTon,
        1.023_711,
    ),
    MaterialSpec::entered(
        SCRAP_STEEL,
        "Scrap steel",
        &["废钢", "scrap"],
        DisplayUnit::TonPerTon,
        0.0154,
    )
    .with_role(MaterialRole::Scrap),
    MaterialSpec::entered(
        ELECTRODE,
        "Graphite electrode",
        &["电极"],
        DisplayUnit::KilogramPerTon,
        3.663,
    ),
    MaterialSpec::entered(
        RECARBURIZER,
        "Recarburizer / carbon powder",
        &["增碳剂、碳粉"],
        DisplayUnit::KilogramPerTon,
        3.6667,
    ),
    MaterialSpec::entered(ALLOY, "Alloy", &["合金"], DisplayUnit::KilogramPerTon, 0.275),
    MaterialSpec::entered(
        ELECTRICITY,
        "Electricity",
        &["电力"],
        DisplayUnit::KilowattHourPerTon,
        0.5568,
    ),
    MaterialSpec::entered(
        STEAM_RECOVERY,
        "Recovered steam",
        &["蒸汽回收"],
        DisplayUnit::KilogramPerTon,
        0.11,
    )
    .offset(),
    MaterialSpec::entered(BILLET, "Billet", &["钢坯"], DisplayUnit::TonPerTon, 0.0154).offset(),
];

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Number of names (key, label and aliases) a spec answers to.
const fn name_count(spec: &MaterialSpec) -> usize {
    spec.aliases.len() + 2
}

const fn name_at(spec: &MaterialSpec, index: usize) -> &'static str {
    match index {
        0 => spec.key,
        1 => spec.label,
        n => spec.aliases[n - 2],
    }
}

/// Whether any name is claimed by two different entries, or twice by one.
const fn has_duplicate_names(specs: &[MaterialSpec]) -> bool {
    let mut i = 0;
    while i < specs.len() {
        let mut a = 0;
        while a < name_count(&specs[i]) {
            let name = name_at(&specs[i], a);
            let mut j = i;
            while j < specs.len() {
                let mut b = if j == i { a + 1 } else { 0 };
                while b < name_count(&specs[j]) {
                    if str_eq(name, name_at(&specs[j], b)) {
                        return true;
                    }
                    b += 1;
                }
                j += 1;
            }
            a += 1;
        }
        i += 1;
    }
    false
}

const _: () = assert!(
    !has_duplicate_names(DEFAULT_MATERIALS),
    "built-in material names must be unique"
);

/// The built-in reference table.
pub static REFERENCE_TABLE: LazyLock<ReferenceTable> = LazyLock::new(ReferenceTable::builtin);

// ============================================================================
// Runtime table
// ============================================================================

/// A material known to a [`ReferenceTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique identifier, e.g. `natural_gas`.
    pub key: String,
    /// Human readable name.
    pub label: String,
    /// Other names accepted on lookup.
    #[serde(default)]
    pub aliases: Vec<String>,
    pub unit: DisplayUnit,
    /// t CO₂ per unit of the base unit (see [`DisplayUnit::base_symbol`]).
    pub emission_factor: f64,
    #[serde(default = "default_role")]
    pub role: MaterialRole,
    #[serde(default = "default_flow")]
    pub flow: Flow,
}

fn default_role() -> MaterialRole {
    MaterialRole::Entered
}

fn default_flow() -> Flow {
    Flow::Emission
}

impl Material {
    pub fn unit_divisor(&self) -> f64 {
        self.unit.divisor()
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        [self.key.as_str(), self.label.as_str()]
            .into_iter()
            .chain(self.aliases.iter().map(String::as_str))
    }
}

impl From<&MaterialSpec> for Material {
    fn from(spec: &MaterialSpec) -> Self {
        Self {
            key: spec.key.to_string(),
            label: spec.label.to_string(),
            aliases: spec.aliases.iter().map(|a| (*a).to_string()).collect(),
            unit: spec.unit,
            emission_factor: spec.emission_factor,
            role: spec.role,
            flow: spec.flow,
        }
    }
}

/// Immutable name → material mapping.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    materials: Vec<Material>,
    /// Map from every accepted name to an index in `materials`.
    index: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Builds a table, rejecting duplicate names and non-finite or negative factors.
    pub fn new(materials: Vec<Material>) -> Result<Self, ReferenceDataError> {
        let mut index = HashMap::new();
        for (position, material) in materials.iter().enumerate() {
            if !material.emission_factor.is_finite() || material.emission_factor < 0.0 {
                return Err(ReferenceDataError::InvalidFactor {
                    name: material.key.clone(),
                    factor: material.emission_factor,
                });
            }
            for name in material.names() {
                if index.insert(name.to_string(), position).is_some() {
                    // The same spelling used as both key and label of one entry is harmless
                    if name == material.key && name == material.label {
                        continue;
                    }
                    return Err(ReferenceDataError::DuplicateName(name.to_string()));
                }
            }
        }
        Ok(Self { materials, index })
    }

    fn builtin() -> Self {
        let materials: Vec<Material> = DEFAULT_MATERIALS.iter().map(Material::from).collect();
        let index = materials
            .iter()
            .enumerate()
            .flat_map(|(position, m)| m.names().map(move |name| (name.to_string(), position)))
            .collect();
        Self { materials, index }
    }

    /// Looks up a material by key, label or alias.
    pub fn lookup(&self, name: &str) -> Option<&Material> {
        self.index
            .get(name.trim())
            .map(|&position| &self.materials[position])
    }

    /// All materials in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Materials whose intensity is entered by the user.
    pub fn entered(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter().filter(|m| !m.role.is_derived())
    }

    /// The material playing a derived role, if the table has one.
    pub fn derived(&self, role: MaterialRole) -> Option<&Material> {
        self.materials.iter().find(|m| m.role == role)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Position of a material in display order.
    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(key: &str, label: &str) -> Material {
        Material {
            key: key.to_string(),
            label: label.to_string(),
            aliases: vec![],
            unit: DisplayUnit::KilogramPerTon,
            emission_factor: 1.0,
            role: MaterialRole::Entered,
            flow: Flow::Emission,
        }
    }

    #[test]
    fn test_builtin_lookup_by_key_label_and_alias() {
        let by_key = REFERENCE_TABLE.lookup(NATURAL_GAS).unwrap();
        let by_label = REFERENCE_TABLE.lookup("Natural gas").unwrap();
        let by_alias = REFERENCE_TABLE.lookup("天然气").unwrap();
        assert_eq!(by_key, by_label);
        assert_eq!(by_key, by_alias);
        assert_eq!(by_key.unit_divisor(), 1.0);
    }

    #[test]
    fn test_unknown_material_not_found() {
        assert!(REFERENCE_TABLE.lookup("unobtainium").is_none());
    }

    #[test]
    fn test_builtin_has_single_derived_roles() {
        assert_eq!(
            REFERENCE_TABLE.derived(MaterialRole::HotMetal).unwrap().key,
            HOT_METAL
        );
        assert_eq!(
            REFERENCE_TABLE.derived(MaterialRole::Scrap).unwrap().key,
            SCRAP_STEEL
        );
        assert!(REFERENCE_TABLE.entered().all(|m| !m.role.is_derived()));
        assert_eq!(REFERENCE_TABLE.entered().count(), REFERENCE_TABLE.len() - 2);
    }

    #[test]
    fn test_builtin_names_unique() {
        assert!(!has_duplicate_names(DEFAULT_MATERIALS));
        // The runtime validator agrees with the compile-time check
        let rebuilt = ReferenceTable::new(DEFAULT_MATERIALS.iter().map(Material::from).collect());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_const_duplicate_detection() {
        let specs = [
            MaterialSpec::entered("a", "A", &[], DisplayUnit::TonPerTon, 1.0),
            MaterialSpec::entered("b", "B", &["a"], DisplayUnit::TonPerTon, 1.0),
        ];
        assert!(has_duplicate_names(&specs));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = ReferenceTable::new(vec![material("lime", "Lime"), material("lime", "Lime 2")]);
        assert_eq!(
            result.unwrap_err(),
            ReferenceDataError::DuplicateName("lime".to_string())
        );
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut second = material("dolomite", "Dolomite");
        second.aliases.push("Lime".to_string());
        let result = ReferenceTable::new(vec![material("lime", "Lime"), second]);
        assert!(matches!(result, Err(ReferenceDataError::DuplicateName(name)) if name == "Lime"));
    }

    #[test]
    fn test_invalid_factor_rejected() {
        let mut bad = material("lime", "Lime");
        bad.emission_factor = f64::NAN;
        assert!(matches!(
            ReferenceTable::new(vec![bad]),
            Err(ReferenceDataError::InvalidFactor { .. })
        ));
    }

    #[test]
    fn test_offsets_are_flagged() {
        assert_eq!(REFERENCE_TABLE.lookup(STEAM_RECOVERY).unwrap().flow, Flow::Offset);
        assert_eq!(REFERENCE_TABLE.lookup(BILLET).unwrap().flow, Flow::Offset);
        assert_eq!(REFERENCE_TABLE.lookup(ELECTRICITY).unwrap().flow, Flow::Emission);
    }
}
