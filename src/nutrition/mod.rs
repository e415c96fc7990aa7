//! Nutrition units module
//!
//! Handles the nutrient unit vocabulary and unit conversions.

pub mod converter;
pub mod units;

pub use converter::{UnitDefinition, UnitsConvertor, UnitsError, UnitsResult};
pub use units::{api_unit_name, rename_unit, UNKNOWN_UNIT};
