//! Data models
//!
//! Output documents in FDC API shape.

mod api_date;
mod document;

pub use api_date::{ApiDate, FILE_DATE_FORMAT};
pub use document::{
    FieldValue, FoodNutrientEntry, FoodPortion, MergedDocument, NutrientDescriptor, DATA_TYPE,
    FOOD_CLASS, FOOD_NUTRIENT_TYPE, SCALAR_FIELDS, TABLE_ALIAS_NAME,
};
