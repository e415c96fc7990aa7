//! Unit vocabulary and conversion constants
//!
//! Maps FDC nutrient unit codes to the unit names used by the FDC API, and
//! provides the standard factors behind [`UnitsConvertor::standard`].
//!
//! [`UnitsConvertor::standard`]: super::UnitsConvertor::standard

/// Unit name emitted for a nutrient unit code missing from the vocabulary
pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";

/// Rename an FDC nutrient unit code (`unit_name` column) to its API name
///
/// Returns None for codes outside the controlled vocabulary.
pub fn api_unit_name(unit_code: &str) -> Option<&'static str> {
    match unit_code {
        "G" => Some("g"),
        "UG" => Some("\u{00b5}g"),
        "IU" => Some("IU"),
        "kJ" => Some("kJ"),
        "MG_ATE" => Some("mg_ATE"),
        "MG" => Some("mg"),
        "KCAL" => Some("kcal"),
        _ => None,
    }
}

/// Rename a unit code, falling back to [`UNKNOWN_UNIT`]
pub fn rename_unit(unit_code: &str) -> &'static str {
    api_unit_name(unit_code).unwrap_or(UNKNOWN_UNIT)
}

// ============================================================================
// Mass Conversion Constants (to grams)
// ============================================================================

/// Grams per microgram
pub const G_PER_UG: f64 = 0.000_001;
/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.92892;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.7868;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;
/// Milliliters per pint (US)
pub const ML_PER_PINT: f64 = 473.176;
/// Milliliters per quart (US)
pub const ML_PER_QUART: f64 = 946.353;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per gallon (US)
pub const ML_PER_GALLON: f64 = 3785.41;

// ============================================================================
// Energy Conversion Constants (to kilocalories)
// ============================================================================

/// Kilocalories per kilojoule
pub const KCAL_PER_KJ: f64 = 1.0 / 4.184;

/// Standard unit table as `(unit, scale to base, base unit)`
pub const STANDARD_UNITS: &[(&str, f64, &str)] = &[
    ("g", 1.0, "g"),
    ("\u{00b5}g", G_PER_UG, "g"),
    ("mg", G_PER_MG, "g"),
    ("kg", G_PER_KG, "g"),
    ("oz", G_PER_OZ, "g"),
    ("lb", G_PER_LB, "g"),
    ("ml", 1.0, "ml"),
    ("tsp", ML_PER_TSP, "ml"),
    ("tbsp", ML_PER_TBSP, "ml"),
    ("fl oz", ML_PER_FL_OZ, "ml"),
    ("cup", ML_PER_CUP, "ml"),
    ("pint", ML_PER_PINT, "ml"),
    ("quart", ML_PER_QUART, "ml"),
    ("L", ML_PER_LITER, "ml"),
    ("gallon", ML_PER_GALLON, "ml"),
    ("kcal", 1.0, "kcal"),
    ("kJ", KCAL_PER_KJ, "kcal"),
];
