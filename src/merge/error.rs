//! Merge error types

use thiserror::Error;

/// A relational inconsistency between tables for one branded food
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    #[error("food record has data_type {0:?}, expected \"branded_food\"")]
    NotBrandedFood(String),

    #[error("food record has fdc_id {0}")]
    FdcIdMismatch(String),

    #[error("food record has no publication_date")]
    MissingPublicationDate,

    #[error("food_nutrient {food_nutrient_id} belongs to fdc_id {found}")]
    FoodNutrientMismatch {
        food_nutrient_id: String,
        found: String,
    },
}

/// Merge error types
///
/// Every variant aborts the whole run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("No food record for branded food {fdc_id}")]
    MissingFoodRecord { fdc_id: String },

    #[error("Data integrity violation for branded food {fdc_id}: {violation}")]
    DataIntegrityViolation {
        fdc_id: String,
        violation: IntegrityViolation,
    },

    #[error("Invalid number {value:?} in {table}.{field} (row {row_key})")]
    InvalidNumber {
        table: &'static str,
        field: &'static str,
        row_key: String,
        value: String,
    },

    #[error("Invalid date {value:?} in {table}.{field} (row {row_key}): {source}")]
    InvalidDate {
        table: &'static str,
        field: &'static str,
        row_key: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Nutrient {nutrient_id} used by branded food {fdc_id} has unit code {unit_code:?} outside the unit vocabulary")]
    UnknownNutrientUnit {
        nutrient_id: i64,
        unit_code: String,
        fdc_id: String,
    },
}

/// Result type for merge operations
pub type MergeResult<T> = Result<T, MergeError>;

impl MergeError {
    pub(crate) fn integrity(fdc_id: &str, violation: IntegrityViolation) -> Self {
        MergeError::DataIntegrityViolation {
            fdc_id: fdc_id.to_string(),
            violation,
        }
    }
}
