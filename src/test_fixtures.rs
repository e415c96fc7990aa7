//! Small download shared by unit tests

use crate::data::{BrandedFood, Food, FoodNutrient, Nutrient, RawData};
use crate::merge::merge_sources;
use crate::models::MergedDocument;

fn food(fdc_id: &str, description: &str, publication_date: &str) -> Food {
    Food {
        fdc_id: fdc_id.to_string(),
        data_type: "branded_food".to_string(),
        description: description.to_string(),
        food_category_id: String::new(),
        publication_date: publication_date.to_string(),
    }
}

fn branded_food(fdc_id: &str, category: &str, modified: &str, available: &str) -> BrandedFood {
    BrandedFood {
        fdc_id: fdc_id.to_string(),
        brand_owner: "Acme Foods".to_string(),
        gtin_upc: format!("000000000{fdc_id}"),
        ingredients: "OATS, SUGAR".to_string(),
        serving_size: "28.5".to_string(),
        serving_size_unit: "g".to_string(),
        household_serving_fulltext: "1 ONZ".to_string(),
        branded_food_category: category.to_string(),
        data_source: "LI".to_string(),
        modified_date: modified.to_string(),
        available_date: available.to_string(),
    }
}

fn nutrient(id: &str, name: &str, unit_name: &str, nbr: &str, rank: &str) -> Nutrient {
    Nutrient {
        id: id.to_string(),
        name: name.to_string(),
        unit_name: unit_name.to_string(),
        nutrient_nbr: nbr.to_string(),
        rank: rank.to_string(),
    }
}

fn food_nutrient(id: &str, fdc_id: &str, nutrient_id: &str, amount: &str) -> FoodNutrient {
    FoodNutrient {
        id: id.to_string(),
        fdc_id: fdc_id.to_string(),
        nutrient_id: nutrient_id.to_string(),
        amount: amount.to_string(),
        ..Default::default()
    }
}

/// Three branded foods: 100 and 300 are cereals, 200 is a snack
pub(crate) fn sample_raw_data() -> RawData {
    RawData {
        branded_foods: vec![
            branded_food("100", "Cereal", "2019-11-21", "2020-01-05"),
            branded_food("200", "Snacks", "", ""),
            branded_food("300", "Cereal", "2018-02-03", ""),
        ],
        foods: vec![
            food("100", "HONEY OAT CEREAL", "2020-01-05"),
            food("200", "PRETZELS", "2019-04-01"),
            food("300", "CORN FLAKES", "2018-02-03"),
        ],
        nutrients: vec![
            nutrient("1003", "Protein", "G", "203", "600"),
            nutrient("1008", "Energy", "KCAL", "208", "300"),
            nutrient("1162", "Vitamin C, total ascorbic acid", "MG", "401", "6300"),
        ],
        food_nutrients: vec![
            food_nutrient("11", "100", "1008", "390"),
            food_nutrient("12", "100", "1003", "12.5"),
            food_nutrient("13", "100", "1162", "1.2"),
            food_nutrient("21", "200", "1003", "7.5"),
            food_nutrient("22", "200", "1008", "150"),
            food_nutrient("31", "300", "1003", "3"),
            food_nutrient("32", "300", "4000", "1"),
        ],
        ..Default::default()
    }
}

pub(crate) fn sample_documents() -> Vec<MergedDocument> {
    merge_sources(&sample_raw_data()).expect("sample data merges")
}
