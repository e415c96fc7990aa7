//! Merged branded food document
//!
//! Mirrors the JSON returned by the FDC API for a branded food. Fields that
//! can be absent are `Option`s and are left out of the JSON when `None`.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::ApiDate;

/// Value of `foodClass` for every merged document
pub const FOOD_CLASS: &str = "Branded";
/// Value of `tableAliasName` for every merged document
pub const TABLE_ALIAS_NAME: &str = "branded_food";
/// Value of `dataType` for every merged document
pub const DATA_TYPE: &str = "Branded";
/// Value of `type` for every nutrient entry
pub const FOOD_NUTRIENT_TYPE: &str = "FoodNutrient";

/// API names of the scalar fields of a [`MergedDocument`]
pub const SCALAR_FIELDS: &[&str] = &[
    "foodClass",
    "description",
    "tableAliasName",
    "brandOwner",
    "gtinUpc",
    "dataSource",
    "ingredients",
    "modifiedDate",
    "availableDate",
    "servingSize",
    "servingSizeUnit",
    "householdServingFullText",
    "brandedFoodCategory",
    "fdcId",
    "dataType",
    "publicationDate",
];

/// Nutrient reference data attached to each nutrient entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientDescriptor {
    pub id: i64,
    pub name: String,
    pub unit_name: &'static str,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
}

/// One measured nutrient of a food
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodNutrientEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: i64,
    pub nutrient: NutrientDescriptor,
    pub amount: f64,
}

/// A portion description; branded foods never carry any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodPortion {}

/// A branded food in FDC API shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedDocument {
    pub food_class: &'static str,
    pub description: String,
    pub food_nutrients: Vec<FoodNutrientEntry>,
    pub table_alias_name: &'static str,
    pub brand_owner: String,
    pub gtin_upc: String,
    pub data_source: String,
    pub ingredients: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<ApiDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_date: Option<ApiDate>,
    pub serving_size: f64,
    pub serving_size_unit: String,
    #[serde(rename = "householdServingFullText")]
    pub household_serving_fulltext: String,
    pub branded_food_category: String,
    pub fdc_id: i64,
    pub data_type: &'static str,
    pub publication_date: ApiDate,
    pub food_portions: Vec<FoodPortion>,
}

/// A scalar field value looked up by its API name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Decimal(x) => write!(f, "{}", x),
            FieldValue::Date(d) => write!(f, "{}", ApiDate::from(*d)),
        }
    }
}

impl MergedDocument {
    /// Look up a scalar field by its API name
    ///
    /// Returns None for absent optional fields and for names outside
    /// [`SCALAR_FIELDS`].
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = match name {
            "foodClass" => FieldValue::Text(self.food_class),
            "description" => FieldValue::Text(&self.description),
            "tableAliasName" => FieldValue::Text(self.table_alias_name),
            "brandOwner" => FieldValue::Text(&self.brand_owner),
            "gtinUpc" => FieldValue::Text(&self.gtin_upc),
            "dataSource" => FieldValue::Text(&self.data_source),
            "ingredients" => FieldValue::Text(&self.ingredients),
            "modifiedDate" => FieldValue::Date(self.modified_date?.date()),
            "availableDate" => FieldValue::Date(self.available_date?.date()),
            "servingSize" => FieldValue::Decimal(self.serving_size),
            "servingSizeUnit" => FieldValue::Text(&self.serving_size_unit),
            "householdServingFullText" => FieldValue::Text(&self.household_serving_fulltext),
            "brandedFoodCategory" => FieldValue::Text(&self.branded_food_category),
            "fdcId" => FieldValue::Integer(self.fdc_id),
            "dataType" => FieldValue::Text(self.data_type),
            "publicationDate" => FieldValue::Date(self.publication_date.date()),
            _ => return None,
        };
        Some(value)
    }

    /// The entry for a nutrient id; the last one wins if listed twice
    pub fn nutrient(&self, nutrient_id: i64) -> Option<&FoodNutrientEntry> {
        self.food_nutrients
            .iter()
            .rev()
            .find(|entry| entry.nutrient.id == nutrient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> MergedDocument {
        MergedDocument {
            food_class: FOOD_CLASS,
            description: "GRANOLA".to_string(),
            food_nutrients: vec![FoodNutrientEntry {
                kind: FOOD_NUTRIENT_TYPE,
                id: 1,
                nutrient: NutrientDescriptor {
                    id: 1003,
                    name: "Protein".to_string(),
                    unit_name: "g",
                    number: "203".to_string(),
                    rank: None,
                },
                amount: 10.0,
            }],
            table_alias_name: TABLE_ALIAS_NAME,
            brand_owner: "Acme".to_string(),
            gtin_upc: "0001".to_string(),
            data_source: "LI".to_string(),
            ingredients: "OATS".to_string(),
            modified_date: None,
            available_date: Some(ApiDate::parse_file_date("2019-04-01").unwrap()),
            serving_size: 30.0,
            serving_size_unit: "g".to_string(),
            household_serving_fulltext: "1 cup".to_string(),
            branded_food_category: "Cereal".to_string(),
            fdc_id: 42,
            data_type: DATA_TYPE,
            publication_date: ApiDate::parse_file_date("2019-04-01").unwrap(),
            food_portions: Vec::new(),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample_document()).unwrap();
        assert_eq!(value["foodClass"], json!("Branded"));
        assert_eq!(value["householdServingFullText"], json!("1 cup"));
        assert_eq!(value["availableDate"], json!("4/1/2019"));
        assert_eq!(value["fdcId"], json!(42));
        assert_eq!(value["foodPortions"], json!([]));
        assert_eq!(
            value["foodNutrients"][0],
            json!({
                "type": "FoodNutrient",
                "id": 1,
                "nutrient": {"id": 1003, "name": "Protein", "unitName": "g", "number": "203"},
                "amount": 10.0
            })
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let value = serde_json::to_value(sample_document()).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("modifiedDate"));
        assert!(!object.contains_key("rank"));
        assert!(object.values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_field_order_follows_api() {
        let text = serde_json::to_string(&sample_document()).unwrap();
        let food_class = text.find("\"foodClass\"").unwrap();
        let nutrients = text.find("\"foodNutrients\"").unwrap();
        let portions = text.find("\"foodPortions\"").unwrap();
        assert!(food_class < nutrients && nutrients < portions);
    }

    #[test]
    fn test_every_scalar_field_resolves() {
        let mut doc = sample_document();
        doc.modified_date = doc.available_date;
        for name in SCALAR_FIELDS {
            assert!(doc.field(name).is_some(), "{name}");
        }
        assert_eq!(doc.field("foodNutrients"), None);
    }

    #[test]
    fn test_absent_date_field() {
        let doc = sample_document();
        assert_eq!(doc.field("modifiedDate"), None);
        assert_eq!(doc.field("fdcId"), Some(FieldValue::Integer(42)));
    }

    #[test]
    fn test_field_value_display() {
        let doc = sample_document();
        let rendered: Vec<String> = ["brandOwner", "fdcId", "servingSize", "availableDate"]
            .iter()
            .filter_map(|name| doc.field(name))
            .map(|value| value.to_string())
            .collect();
        assert_eq!(rendered, vec!["Acme", "42", "30", "4/1/2019"]);
    }

    #[test]
    fn test_nutrient_lookup() {
        let doc = sample_document();
        assert_eq!(doc.nutrient(1003).map(|n| n.amount), Some(10.0));
        assert!(doc.nutrient(1008).is_none());
    }
}
