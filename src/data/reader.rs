//! Row reader
//!
//! Loads the CSV tables of a download directory into typed rows.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::schemas::{
    BrandedFood, Food, FoodAttribute, FoodNutrient, FoodUpdateLogEntry, Nutrient, RawData, Record,
};

/// Table loading error types
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in table {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("Header of table {table} does not match its schema: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        table: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Result type for table loading
pub type LoadResult<T> = Result<T, LoadError>;

/// Read every row of one table from `input`
///
/// The header row must equal `R::FIELDS` exactly, order included.
pub fn read_records<R: Record, I: Read>(input: I) -> LoadResult<Vec<R>> {
    let csv_error = |source: csv::Error| LoadError::Csv {
        table: R::TABLE,
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let headers = reader.headers().map_err(csv_error)?;
    if !headers.iter().eq(R::FIELDS.iter().copied()) {
        return Err(LoadError::SchemaMismatch {
            table: R::TABLE,
            expected: R::FIELDS.iter().map(|f| f.to_string()).collect(),
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    reader
        .records()
        .map(|record| record.map(|r| R::from_record(&r)).map_err(csv_error))
        .collect()
}

/// Read one table from `data_dir`
pub fn read_table<R: Record>(data_dir: &Path) -> LoadResult<Vec<R>> {
    let path = data_dir.join(R::FILE_NAME);
    tracing::info!("Loading file {}", path.display());

    let file = File::open(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    let rows = read_records::<R, _>(file)?;

    tracing::debug!(table = R::TABLE, rows = rows.len(), "Table loaded");
    Ok(rows)
}

/// Load all six tables of a download directory
pub fn load_raw_data(data_dir: &Path) -> LoadResult<RawData> {
    Ok(RawData {
        branded_foods: read_table::<BrandedFood>(data_dir)?,
        food_nutrients: read_table::<FoodNutrient>(data_dir)?,
        food_attributes: read_table::<FoodAttribute>(data_dir)?,
        food_update_log_entries: read_table::<FoodUpdateLogEntry>(data_dir)?,
        foods: read_table::<Food>(data_dir)?,
        nutrients: read_table::<Nutrient>(data_dir)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records_in_file_order() {
        let input = "\
id,name,unit_name,nutrient_nbr,rank
1003,Protein,G,203,600
1008,Energy,KCAL,208,
";
        let rows: Vec<Nutrient> = read_records(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Protein");
        assert_eq!(rows[1].id, "1008");
        assert_eq!(rows[1].rank, "");
    }

    #[test]
    fn test_quoted_fields() {
        let input = "\
\"id\",\"description\",\"last_updated\"
\"7\",\"Sugar, brown\",\"2020-04-01\"
";
        let rows: Vec<FoodUpdateLogEntry> = read_records(input.as_bytes()).unwrap();
        assert_eq!(rows[0].description, "Sugar, brown");
    }

    #[test]
    fn test_header_order_mismatch() {
        let input = "name,id,unit_name,nutrient_nbr,rank\nProtein,1003,G,203,600\n";
        let err = read_records::<Nutrient, _>(input.as_bytes()).unwrap_err();
        match err {
            LoadError::SchemaMismatch { table, found, .. } => {
                assert_eq!(table, "nutrient");
                assert_eq!(found[0], "name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let input = "id,name,unit_name,nutrient_nbr\n1003,Protein,G,203\n";
        let err = read_records::<Nutrient, _>(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_empty_file_is_schema_mismatch() {
        let err = read_records::<Food, _>("".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_short_row_is_csv_error() {
        let input = "id,description,last_updated\n1,only two\n";
        let err = read_records::<FoodUpdateLogEntry, _>(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { table: "food_update_log_entry", .. }));
    }

    #[test]
    fn test_read_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_table::<Food>(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
