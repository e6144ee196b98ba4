//! Helpers for calculation input parameters

pub mod units;

pub use units::{apply_default_units, InputParams, Role, UnitKeys};
