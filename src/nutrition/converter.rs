//! Unit conversion registry
//!
//! A unit is defined relative to a base unit, e.g. `kg = 1000 g`. Two units
//! convert into each other only when they share a base unit.

use std::collections::HashMap;

use thiserror::Error;

use super::units::STANDARD_UNITS;

/// Unit registry error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitsError {
    #[error("Unknown unit {0}")]
    UnknownUnit(String),

    #[error("Cannot convert between units {from} and {to}")]
    IncompatibleUnits { from: String, to: String },

    #[error("Unit {0} was defined twice")]
    DuplicateUnitDefinition(String),
}

/// Result type for unit conversions
pub type UnitsResult<T> = Result<T, UnitsError>;

/// Defines a unit, e.g. `UnitDefinition::new("kg", 1000.0, "g")`
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDefinition {
    pub unit: String,
    /// Amount of the base unit in one of this unit
    pub scale_to_base: f64,
    pub base_unit: String,
}

impl UnitDefinition {
    pub fn new(unit: impl Into<String>, scale_to_base: f64, base_unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            scale_to_base,
            base_unit: base_unit.into(),
        }
    }
}

/// Immutable set of unit definitions
#[derive(Debug, Clone)]
pub struct UnitsConvertor {
    definitions: HashMap<String, (f64, String)>,
}

impl UnitsConvertor {
    /// Build a registry, rejecting a unit symbol defined more than once
    pub fn new<I>(definitions: I) -> UnitsResult<Self>
    where
        I: IntoIterator<Item = UnitDefinition>,
    {
        let mut map = HashMap::new();
        for def in definitions {
            if map.contains_key(&def.unit) {
                return Err(UnitsError::DuplicateUnitDefinition(def.unit));
            }
            map.insert(def.unit, (def.scale_to_base, def.base_unit));
        }
        Ok(Self { definitions: map })
    }

    /// Registry of the common mass, volume and energy units
    pub fn standard() -> Self {
        let definitions = STANDARD_UNITS
            .iter()
            .map(|&(unit, scale, base)| (unit.to_string(), (scale, base.to_string())))
            .collect();
        Self { definitions }
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.definitions.contains_key(unit)
    }

    /// Base unit of a registered unit
    pub fn base_unit(&self, unit: &str) -> UnitsResult<&str> {
        self.lookup(unit).map(|(_, base)| base)
    }

    /// Convert `amount` of `from` into the equivalent amount of `to`
    ///
    /// With `from = a * base` and `to = b * base`, `amount * from` equals
    /// `amount * a / b * to`.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> UnitsResult<f64> {
        let (from_scale, from_base) = self.lookup(from)?;
        let (to_scale, to_base) = self.lookup(to)?;
        if from_base != to_base {
            return Err(UnitsError::IncompatibleUnits {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(amount * from_scale / to_scale)
    }

    fn lookup(&self, unit: &str) -> UnitsResult<(f64, &str)> {
        self.definitions
            .get(unit)
            .map(|(scale, base)| (*scale, base.as_str()))
            .ok_or_else(|| UnitsError::UnknownUnit(unit.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_convertor() -> UnitsConvertor {
        UnitsConvertor::new([
            UnitDefinition::new("g", 1.0, "g"),
            UnitDefinition::new("kg", 1000.0, "g"),
            UnitDefinition::new("lb", 454.0, "g"),
            UnitDefinition::new("ml", 1.0, "ml"),
            UnitDefinition::new("L", 1000.0, "ml"),
            UnitDefinition::new("cup", 237.0, "ml"),
        ])
        .unwrap()
    }

    #[test]
    fn test_kg_to_lb() {
        let result = test_convertor().convert(2.0, "kg", "lb").unwrap();
        assert!((result - 2.0 * 1000.0 / 454.0).abs() < 1e-9);
    }

    #[test]
    fn test_kg_to_g() {
        let result = test_convertor().convert(2.0, "kg", "g").unwrap();
        assert!((result - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let convertor = test_convertor();
        for x in [0.001, 1.0, 2.5, 454.0, 1e6] {
            let lb = convertor.convert(x, "kg", "lb").unwrap();
            let back = convertor.convert(lb, "lb", "kg").unwrap();
            assert!((back - x).abs() <= 1e-9 * x.max(1.0), "{x} -> {back}");
        }
    }

    #[test]
    fn test_incompatible_units() {
        let err = test_convertor().convert(2.0, "lb", "cup").unwrap_err();
        assert_eq!(
            err,
            UnitsError::IncompatibleUnits {
                from: "lb".to_string(),
                to: "cup".to_string()
            }
        );
        assert_eq!(err.to_string(), "Cannot convert between units lb and cup");
    }

    #[test]
    fn test_unknown_unit() {
        let err = test_convertor().convert(2.0, "furlong", "cup").unwrap_err();
        assert_eq!(err.to_string(), "Unknown unit furlong");
    }

    #[test]
    fn test_unknown_target_unit() {
        let err = test_convertor().convert(2.0, "L", "second").unwrap_err();
        assert_eq!(err, UnitsError::UnknownUnit("second".to_string()));
    }

    #[test]
    fn test_duplicate_definition() {
        let err = UnitsConvertor::new([
            UnitDefinition::new("g", 1.0, "g"),
            UnitDefinition::new("g", 1000.0, "g"),
        ])
        .unwrap_err();
        assert_eq!(err, UnitsError::DuplicateUnitDefinition("g".to_string()));
    }

    #[test]
    fn test_standard_registry() {
        let convertor = UnitsConvertor::standard();
        assert!(convertor.contains("µg"));
        assert_eq!(convertor.base_unit("tbsp").unwrap(), "ml");

        let mg = convertor.convert(1.5, "g", "mg").unwrap();
        assert!((mg - 1500.0).abs() < 1e-9);

        let kcal = convertor.convert(418.4, "kJ", "kcal").unwrap();
        assert!((kcal - 100.0).abs() < 1e-9);

        assert!(matches!(
            convertor.convert(1.0, "lb", "cup"),
            Err(UnitsError::IncompatibleUnits { .. })
        ));
    }

    #[test]
    fn test_standard_round_trip_kg_lb() {
        let convertor = UnitsConvertor::standard();
        for x in [0.25, 3.0, 72.5] {
            let lb = convertor.convert(x, "kg", "lb").unwrap();
            let kg = convertor.convert(lb, "lb", "kg").unwrap();
            assert!((kg - x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_standard_table_has_no_duplicates() {
        let defs = STANDARD_UNITS
            .iter()
            .map(|&(unit, scale, base)| UnitDefinition::new(unit, scale, base));
        assert!(UnitsConvertor::new(defs).is_ok());
    }
}
