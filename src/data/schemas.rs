//! Table schemas for the Branded Foods download
//!
//! One plain record type per CSV file. Every column is kept as the raw text
//! from the file; typed conversion happens in the merge engine.

use csv::StringRecord;

/// A row type bound to one table of the download
pub trait Record: Sized {
    /// Table name as used in the download
    const TABLE: &'static str;
    /// File name inside the download directory
    const FILE_NAME: &'static str;
    /// Expected header, in column order
    const FIELDS: &'static [&'static str];

    /// Build a row from a record whose arity matches `FIELDS`
    fn from_record(record: &StringRecord) -> Self;
}

/// Declare a record type whose fields are the table's columns, in order
macro_rules! table_record {
    (
        $(#[$meta:meta])*
        $name:ident => $table:literal {
            $($(#[$field_meta:meta])* $field:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: String,)+
        }

        impl Record for $name {
            const TABLE: &'static str = $table;
            const FILE_NAME: &'static str = concat!($table, ".csv");
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn from_record(record: &StringRecord) -> Self {
                let mut values = record.iter();
                Self {
                    $($field: values.next().unwrap_or_default().to_owned(),)+
                }
            }
        }
    };
}

table_record! {
    /// A row of `food.csv`, one per product
    Food => "food" {
        fdc_id,
        data_type,
        description,
        /// Empty for branded foods
        food_category_id,
        /// `YYYY-MM-DD`, required
        publication_date,
    }
}

table_record! {
    /// A row of `branded_food.csv`
    BrandedFood => "branded_food" {
        fdc_id,
        brand_owner,
        gtin_upc,
        ingredients,
        serving_size,
        serving_size_unit,
        household_serving_fulltext,
        branded_food_category,
        data_source,
        /// `YYYY-MM-DD` or empty
        modified_date,
        /// `YYYY-MM-DD` or empty
        available_date,
    }
}

table_record! {
    /// A row of `food_nutrient.csv`, linking a food to a nutrient amount
    FoodNutrient => "food_nutrient" {
        id,
        fdc_id,
        nutrient_id,
        amount,
        data_points,
        derivation_id,
        min,
        max,
        median,
        footnote,
        min_year_acquired,
    }
}

table_record! {
    FoodAttribute => "food_attribute" {
        id,
        fdc_id,
        seq_num,
        food_attribute_type_id,
        name,
        value,
    }
}

table_record! {
    FoodUpdateLogEntry => "food_update_log_entry" {
        id,
        description,
        last_updated,
    }
}

table_record! {
    /// A row of `nutrient.csv`, the nutrient reference table
    Nutrient => "nutrient" {
        id,
        name,
        /// FDC unit code, e.g. `G`, `MG`, `KCAL`
        unit_name,
        nutrient_nbr,
        /// Display ordering hint, may be empty
        rank,
    }
}

/// All tables of one download, loaded once per run
#[derive(Debug, Clone, Default)]
pub struct RawData {
    pub branded_foods: Vec<BrandedFood>,
    pub food_nutrients: Vec<FoodNutrient>,
    pub food_attributes: Vec<FoodAttribute>,
    pub food_update_log_entries: Vec<FoodUpdateLogEntry>,
    pub foods: Vec<Food>,
    pub nutrients: Vec<Nutrient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_follow_declaration_order() {
        assert_eq!(
            Food::FIELDS,
            &["fdc_id", "data_type", "description", "food_category_id", "publication_date"]
        );
        assert_eq!(Nutrient::FIELDS.len(), 5);
        assert_eq!(FoodNutrient::FIELDS[3], "amount");
        assert_eq!(BrandedFood::FIELDS.last(), Some(&"available_date"));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(BrandedFood::FILE_NAME, "branded_food.csv");
        assert_eq!(FoodUpdateLogEntry::FILE_NAME, "food_update_log_entry.csv");
    }

    #[test]
    fn test_from_record_is_positional() {
        let record = StringRecord::from(vec!["1003", "Protein", "G", "203", "600"]);
        let nutrient = Nutrient::from_record(&record);
        assert_eq!(nutrient.id, "1003");
        assert_eq!(nutrient.unit_name, "G");
        assert_eq!(nutrient.rank, "600");
    }
}
