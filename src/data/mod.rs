//! Raw data module
//!
//! Typed table schemas and the CSV row reader.

pub mod reader;
pub mod schemas;

pub use reader::{load_raw_data, read_records, read_table, LoadError, LoadResult};
pub use schemas::{
    BrandedFood, Food, FoodAttribute, FoodNutrient, FoodUpdateLogEntry, Nutrient, RawData, Record,
};
