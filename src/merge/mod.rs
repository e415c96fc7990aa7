//! Merge module
//!
//! Joins the raw tables into FDC API documents.

mod engine;
mod error;

pub use engine::{
    merge_sources, merge_sources_with, MergeEngine, MergeOptions, BRANDED_FOOD_DATA_TYPE,
};
pub use error::{IntegrityViolation, MergeError, MergeResult};
