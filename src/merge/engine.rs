//! Merge engine
//!
//! Joins the tables of a [`RawData`] into one [`MergedDocument`] per branded
//! food, in `branded_food.csv` order.

use std::collections::HashMap;

use crate::data::{BrandedFood, Food, FoodNutrient, Nutrient, RawData, Record};
use crate::models::{
    ApiDate, FoodNutrientEntry, MergedDocument, NutrientDescriptor, DATA_TYPE, FOOD_CLASS,
    FOOD_NUTRIENT_TYPE, TABLE_ALIAS_NAME,
};
use crate::nutrition::{rename_unit, UNKNOWN_UNIT};

use super::error::{IntegrityViolation, MergeError, MergeResult};

/// `data_type` of food rows that have a branded food row
pub const BRANDED_FOOD_DATA_TYPE: &str = "branded_food";

/// Merge behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Emit `UNKNOWN_UNIT` for nutrients whose unit code is outside the
    /// vocabulary instead of failing the run
    pub allow_unknown_units: bool,
}

/// A nutrient row normalized to API shape
#[derive(Debug, Clone)]
struct IndexedNutrient<'a> {
    descriptor: NutrientDescriptor,
    unit_code: &'a str,
}

/// Lookup tables built once from a [`RawData`]
pub struct MergeEngine<'a> {
    branded_foods: &'a [BrandedFood],
    foods: HashMap<&'a str, &'a Food>,
    nutrients: HashMap<&'a str, IndexedNutrient<'a>>,
    food_nutrients: HashMap<&'a str, Vec<&'a FoodNutrient>>,
    options: MergeOptions,
}

impl<'a> MergeEngine<'a> {
    /// Index foods, nutrients and food nutrients of `raw`
    pub fn new(raw: &'a RawData, options: MergeOptions) -> MergeResult<Self> {
        // Duplicate fdc_ids are not expected; the last row wins
        let foods: HashMap<&str, &Food> = raw
            .foods
            .iter()
            .map(|food| (food.fdc_id.as_str(), food))
            .collect();

        let mut nutrients = HashMap::with_capacity(raw.nutrients.len());
        for nutrient in &raw.nutrients {
            nutrients.insert(nutrient.id.as_str(), index_nutrient(nutrient)?);
        }

        let mut food_nutrients: HashMap<&str, Vec<&FoodNutrient>> = HashMap::new();
        for food_nutrient in &raw.food_nutrients {
            food_nutrients
                .entry(food_nutrient.fdc_id.as_str())
                .or_default()
                .push(food_nutrient);
        }

        tracing::debug!(
            foods = raw.foods.len(),
            nutrients = nutrients.len(),
            grouped_foods = food_nutrients.len(),
            "Merge indexes built"
        );

        Ok(Self {
            branded_foods: &raw.branded_foods,
            foods,
            nutrients,
            food_nutrients,
            options,
        })
    }

    /// Merge every branded food, stopping at the first error
    pub fn merge_all(&self) -> MergeResult<Vec<MergedDocument>> {
        tracing::info!(
            branded_foods = self.branded_foods.len(),
            "Merging raw data rows"
        );

        let documents = self
            .branded_foods
            .iter()
            .map(|branded_food| self.merge_record(branded_food))
            .collect::<MergeResult<Vec<_>>>()?;

        let entries: usize = documents.iter().map(|d| d.food_nutrients.len()).sum();
        tracing::info!(
            documents = documents.len(),
            nutrient_entries = entries,
            "Merge complete"
        );
        Ok(documents)
    }

    /// Merge one branded food with its food row and nutrient rows
    pub fn merge_record(&self, branded_food: &BrandedFood) -> MergeResult<MergedDocument> {
        let fdc_id = branded_food.fdc_id.as_str();

        let food = self
            .foods
            .get(fdc_id)
            .copied()
            .ok_or_else(|| MergeError::MissingFoodRecord {
                fdc_id: fdc_id.to_string(),
            })?;
        check_food(branded_food, food)?;

        let linked = self
            .food_nutrients
            .get(fdc_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for food_nutrient in linked {
            if food_nutrient.fdc_id != fdc_id {
                return Err(MergeError::integrity(
                    fdc_id,
                    IntegrityViolation::FoodNutrientMismatch {
                        food_nutrient_id: food_nutrient.id.clone(),
                        found: food_nutrient.fdc_id.clone(),
                    },
                ));
            }
        }

        let mut food_nutrients = Vec::with_capacity(linked.len());
        for food_nutrient in linked {
            // References to nutrients missing from nutrient.csv are dropped
            let Some(nutrient) = self.nutrients.get(food_nutrient.nutrient_id.as_str()) else {
                tracing::trace!(
                    fdc_id,
                    nutrient_id = %food_nutrient.nutrient_id,
                    "Dropping food nutrient with unknown nutrient"
                );
                continue;
            };
            food_nutrients.push(self.nutrient_entry(fdc_id, food_nutrient, nutrient)?);
        }

        Ok(MergedDocument {
            food_class: FOOD_CLASS,
            description: food.description.clone(),
            food_nutrients,
            table_alias_name: TABLE_ALIAS_NAME,
            brand_owner: branded_food.brand_owner.clone(),
            gtin_upc: branded_food.gtin_upc.clone(),
            data_source: branded_food.data_source.clone(),
            ingredients: branded_food.ingredients.clone(),
            modified_date: parse_optional_date::<BrandedFood>(
                "modified_date",
                fdc_id,
                &branded_food.modified_date,
            )?,
            available_date: parse_optional_date::<BrandedFood>(
                "available_date",
                fdc_id,
                &branded_food.available_date,
            )?,
            serving_size: parse_decimal::<BrandedFood>(
                "serving_size",
                fdc_id,
                &branded_food.serving_size,
            )?,
            serving_size_unit: branded_food.serving_size_unit.clone(),
            household_serving_fulltext: branded_food.household_serving_fulltext.clone(),
            branded_food_category: branded_food.branded_food_category.clone(),
            fdc_id: parse_integer::<BrandedFood>("fdc_id", fdc_id, fdc_id)?,
            data_type: DATA_TYPE,
            publication_date: parse_date::<Food>(
                "publication_date",
                fdc_id,
                &food.publication_date,
            )?,
            food_portions: Vec::new(),
        })
    }

    fn nutrient_entry(
        &self,
        fdc_id: &str,
        food_nutrient: &FoodNutrient,
        nutrient: &IndexedNutrient<'_>,
    ) -> MergeResult<FoodNutrientEntry> {
        if nutrient.descriptor.unit_name == UNKNOWN_UNIT && !self.options.allow_unknown_units {
            return Err(MergeError::UnknownNutrientUnit {
                nutrient_id: nutrient.descriptor.id,
                unit_code: nutrient.unit_code.to_string(),
                fdc_id: fdc_id.to_string(),
            });
        }

        Ok(FoodNutrientEntry {
            kind: FOOD_NUTRIENT_TYPE,
            id: parse_integer::<FoodNutrient>("id", fdc_id, &food_nutrient.id)?,
            nutrient: nutrient.descriptor.clone(),
            amount: parse_decimal::<FoodNutrient>("amount", fdc_id, &food_nutrient.amount)?,
        })
    }
}

/// Merge all branded foods of `raw` with default options
pub fn merge_sources(raw: &RawData) -> MergeResult<Vec<MergedDocument>> {
    merge_sources_with(raw, MergeOptions::default())
}

/// Merge all branded foods of `raw`
pub fn merge_sources_with(raw: &RawData, options: MergeOptions) -> MergeResult<Vec<MergedDocument>> {
    MergeEngine::new(raw, options)?.merge_all()
}

fn check_food(branded_food: &BrandedFood, food: &Food) -> MergeResult<()> {
    let fdc_id = branded_food.fdc_id.as_str();
    if food.data_type != BRANDED_FOOD_DATA_TYPE {
        return Err(MergeError::integrity(
            fdc_id,
            IntegrityViolation::NotBrandedFood(food.data_type.clone()),
        ));
    }
    if food.fdc_id != fdc_id {
        return Err(MergeError::integrity(
            fdc_id,
            IntegrityViolation::FdcIdMismatch(food.fdc_id.clone()),
        ));
    }
    if food.publication_date.is_empty() {
        return Err(MergeError::integrity(
            fdc_id,
            IntegrityViolation::MissingPublicationDate,
        ));
    }
    Ok(())
}

fn index_nutrient(nutrient: &Nutrient) -> MergeResult<IndexedNutrient<'_>> {
    let key = nutrient.id.as_str();
    let unit_name = rename_unit(&nutrient.unit_name);
    if unit_name == UNKNOWN_UNIT {
        tracing::warn!(
            nutrient_id = key,
            unit_code = %nutrient.unit_name,
            "Nutrient unit code outside the unit vocabulary"
        );
    }
    let rank = if nutrient.rank.is_empty() {
        None
    } else {
        Some(parse_integer::<Nutrient>("rank", key, &nutrient.rank)?)
    };

    Ok(IndexedNutrient {
        descriptor: NutrientDescriptor {
            id: parse_integer::<Nutrient>("id", key, key)?,
            name: nutrient.name.clone(),
            unit_name,
            number: nutrient.nutrient_nbr.clone(),
            rank,
        },
        unit_code: &nutrient.unit_name,
    })
}

fn invalid_number<R: Record>(field: &'static str, row_key: &str, value: &str) -> MergeError {
    MergeError::InvalidNumber {
        table: R::TABLE,
        field,
        row_key: row_key.to_string(),
        value: value.to_string(),
    }
}

fn parse_integer<R: Record>(field: &'static str, row_key: &str, value: &str) -> MergeResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_number::<R>(field, row_key, value))
}

/// Parse a finite decimal; `NaN` and infinities have no JSON form
fn parse_decimal<R: Record>(field: &'static str, row_key: &str, value: &str) -> MergeResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid_number::<R>(field, row_key, value))
}

fn parse_date<R: Record>(field: &'static str, row_key: &str, value: &str) -> MergeResult<ApiDate> {
    ApiDate::parse_file_date(value).map_err(|source| MergeError::InvalidDate {
        table: R::TABLE,
        field,
        row_key: row_key.to_string(),
        value: value.to_string(),
        source,
    })
}

fn parse_optional_date<R: Record>(
    field: &'static str,
    row_key: &str,
    value: &str,
) -> MergeResult<Option<ApiDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_date::<R>(field, row_key, value).map(Some)
}
