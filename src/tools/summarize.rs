//! Summary tables
//!
//! Value frequencies of selected document fields and of nutrients, written
//! as CSV files into a summary directory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::models::MergedDocument;

/// Fields summarized by [`summarize`], with their output file
pub const SUMMARIZED_FIELDS: &[(&str, &str)] = &[
    ("brandedFoodCategory", "category.csv"),
    ("dataSource", "data_source.csv"),
];

/// Output file for nutrient frequencies
pub const NUTRIENT_SUMMARY_FILE: &str = "nutrient.csv";

/// Summary error types
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for summaries
pub type SummaryResult<T> = Result<T, SummaryError>;

/// How often one field value occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueFrequency {
    pub value: String,
    pub frequency: usize,
}

/// How often a nutrient occurs, per document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientFrequency {
    pub id: i64,
    pub name: String,
    pub unit_name: &'static str,
    pub frequency: f64,
}

/// Sort counted keys by descending count, ties in first-seen order
fn most_common<K>(counts: IndexMap<K, usize>) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Count the values of one scalar field, most common first
///
/// Documents where the field is absent are counted under the empty string.
pub fn value_frequencies(documents: &[MergedDocument], field: &str) -> Vec<ValueFrequency> {
    tracing::info!("Generating values and frequencies for field: {}", field);

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for doc in documents {
        let value = doc.field(field).map(|v| v.to_string()).unwrap_or_default();
        *counts.entry(value).or_insert(0) += 1;
    }

    most_common(counts)
        .into_iter()
        .map(|(value, frequency)| ValueFrequency { value, frequency })
        .collect()
}

/// Count nutrient occurrences, normalized by the number of documents
pub fn nutrient_frequencies(documents: &[MergedDocument]) -> Vec<NutrientFrequency> {
    tracing::info!("Generating values and frequencies for nutrients");

    let mut counts: IndexMap<(i64, &str, &'static str), usize> = IndexMap::new();
    for entry in documents.iter().flat_map(|d| &d.food_nutrients) {
        let key = (
            entry.nutrient.id,
            entry.nutrient.name.as_str(),
            entry.nutrient.unit_name,
        );
        *counts.entry(key).or_insert(0) += 1;
    }

    let total = documents.len() as f64;
    most_common(counts)
        .into_iter()
        .map(|((id, name, unit_name), count)| NutrientFrequency {
            id,
            name: name.to_string(),
            unit_name,
            frequency: count as f64 / total,
        })
        .collect()
}

/// Render a frequency the way the FDC tooling prints floats
///
/// Whole numbers keep a `.0` and magnitudes below `1e-4` use a two-digit
/// exponent, e.g. `1.0`, `0.5`, `3.2e-05`.
pub fn format_frequency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e16 {
        return format!("{:.1}", value);
    }
    if value.abs() < 1e-4 {
        let scientific = format!("{:e}", value);
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
    }
    value.to_string()
}

fn summary_writer(path: &Path) -> SummaryResult<csv::Writer<File>> {
    let file = File::create(path).map_err(|source| SummaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(file))
}

/// Write `field,frequency` rows for one field
pub fn write_value_frequencies<W: Write>(
    documents: &[MergedDocument],
    field: &str,
    writer: &mut csv::Writer<W>,
) -> SummaryResult<()> {
    writer.write_record([field, "frequency"])?;
    for row in value_frequencies(documents, field) {
        writer.write_record([row.value, row.frequency.to_string()])?;
    }
    Ok(())
}

/// Write `id,name,unit,frequency` rows for all nutrients
pub fn write_nutrient_frequencies<W: Write>(
    documents: &[MergedDocument],
    writer: &mut csv::Writer<W>,
) -> SummaryResult<()> {
    writer.write_record(["id", "name", "unit", "frequency"])?;
    for row in nutrient_frequencies(documents) {
        writer.write_record([
            row.id.to_string(),
            row.name,
            row.unit_name.to_string(),
            format_frequency(row.frequency),
        ])?;
    }
    Ok(())
}

/// Write all summary files into `summary_dir`
pub fn summarize(documents: &[MergedDocument], summary_dir: &Path) -> SummaryResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    for (field, file_name) in SUMMARIZED_FIELDS {
        let path = summary_dir.join(file_name);
        let mut writer = summary_writer(&path)?;
        write_value_frequencies(documents, field, &mut writer)?;
        writer.flush().map_err(|source| SummaryError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    let path = summary_dir.join(NUTRIENT_SUMMARY_FILE);
    let mut writer = summary_writer(&path)?;
    write_nutrient_frequencies(documents, &mut writer)?;
    writer.flush().map_err(|source| SummaryError::Io {
        path: path.clone(),
        source,
    })?;
    written.push(path);

    Ok(written)
}
