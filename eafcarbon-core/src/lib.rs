//! Emissions calculation model for electric-arc-furnace (EAF) steelmaking.
//!
//! Estimates yearly CO₂ emissions of an EAF shop from a handful of process
//! parameters and per-ton consumption intensities.
//!
//! # Module Organisation
//!
//! - [`materials`]: reference data (units and emission factors per material)
//! - [`parameters`]: process parameters and intensity input
//! - [`engine`]: the calculation pipeline
//! - [`ranking`]: ordered breakdowns for charts and tables
//! - [`report`]: display-ready figures
//! - [`export`]: single-page report documents
//! - [`session`]: editable state for an interactive front end
//! - [`scenario`]: TOML scenario configuration
//! - [`units`]: display units and explicit mass scales
//!
//! # Quick Start
//!
//! ```
//! use eafcarbon_core::engine::calculate;
//! use eafcarbon_core::materials::NATURAL_GAS;
//! use eafcarbon_core::parameters::{IntensityInput, ProcessParameters};
//!
//! let intensities = IntensityInput::new().with(NATURAL_GAS, 20.0);
//! let result = calculate(&ProcessParameters::default(), &intensities);
//!
//! assert_eq!(result.figures.annual_output, 768_000.0);
//! // Hot metal and scrap always contribute on top of the entered materials
//! assert!(result.total_emissions > result.emission(NATURAL_GAS).unwrap());
//! assert!(result.is_clean());
//! ```

pub mod engine;
pub mod errors;
pub mod export;
pub mod input;
pub mod materials;
pub mod parameters;
pub mod ranking;
pub mod report;
pub mod scenario;
pub mod session;
pub mod units;

/// Floating point type used for all physical quantities.
pub type FloatValue = f64;
