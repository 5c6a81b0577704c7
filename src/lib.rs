//! EAF carbon emissions calculator.
//!
//! Re-exports the calculation model from [`eafcarbon_core`] and, with the
//! `python` feature, builds the `_lib` extension module used by the Python
//! front end.

pub use eafcarbon_core::*;

#[cfg(feature = "python")]
pub mod python;
