//! FDC Branded Foods merger
//!
//! Reads the USDA FoodData Central Branded Foods download and rebuilds the
//! documents the FDC API serves for each product.

pub mod build_info;
pub mod data;
pub mod merge;
pub mod models;
pub mod nutrition;
pub mod tools;

#[cfg(test)]
mod test_fixtures;
