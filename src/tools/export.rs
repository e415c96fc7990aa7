//! Flat CSV export
//!
//! Writes one row per merged document with columns chosen by a JSON export
//! config. Nutrient columns can be scaled and converted to another unit.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{FieldValue, MergedDocument, SCALAR_FIELDS};
use crate::nutrition::{UnitsConvertor, UnitsError};

/// File written by [`export_csv`] inside the merged data directory
pub const MERGED_CSV_FILE: &str = "merged.csv";

/// Export error types
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid export config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported float format {0:?}")]
    UnsupportedFloatFormat(String),

    #[error("Invalid date format {0:?}")]
    InvalidDateFormat(String),

    #[error("Column {column} refers to unknown field {field:?}")]
    UnknownField { column: String, field: String },

    #[error("Column {column}: {source}")]
    Units {
        column: String,
        #[source]
        source: UnitsError,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for exports
pub type ExportResult<T> = Result<T, ExportError>;

/// `printf`-style float conversion used for numeric cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum FloatFormat {
    /// `%g` / `%.Ng`: N significant digits, trailing zeros removed
    General(usize),
    /// `%f` / `%.Nf`: N digits after the point
    Fixed(usize),
}

impl FloatFormat {
    /// Parse `%g`, `%.Ng`, `%f` or `%.Nf`
    pub fn parse(pattern: &str) -> Option<Self> {
        let body = pattern.strip_prefix('%')?;
        let (precision, conversion) = match body.strip_prefix('.') {
            Some(rest) => {
                let digits_end = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                let (digits, conversion) = rest.split_at(digits_end);
                (Some(digits.parse::<usize>().ok()?), conversion)
            }
            None => (None, body),
        };
        match conversion {
            "g" => Some(FloatFormat::General(precision.unwrap_or(6))),
            "f" => Some(FloatFormat::Fixed(precision.unwrap_or(6))),
            _ => None,
        }
    }

    pub fn format(&self, value: f64) -> String {
        match *self {
            FloatFormat::Fixed(precision) => format!("{:.*}", precision, value),
            FloatFormat::General(precision) => format_general(value, precision),
        }
    }
}

impl TryFrom<String> for FloatFormat {
    type Error = ExportError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        FloatFormat::parse(&pattern).ok_or(ExportError::UnsupportedFloatFormat(pattern))
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// C `%.{precision}g`
fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn default_scale() -> f64 {
    1.0
}

/// One output column
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColumnConfig {
    /// A scalar document field, by API name
    Field { name: String, field: String },
    /// A nutrient amount, scaled and optionally converted
    Nutrient {
        name: String,
        nutrient_id: i64,
        #[serde(default = "default_scale")]
        scale: f64,
        #[serde(default)]
        unit: Option<String>,
    },
}

impl ColumnConfig {
    pub fn name(&self) -> &str {
        match self {
            ColumnConfig::Field { name, .. } | ColumnConfig::Nutrient { name, .. } => name,
        }
    }
}

/// Export configuration, read from JSON
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    pub columns: Vec<ColumnConfig>,
    pub float_format: FloatFormat,
    pub date_format: String,
}

impl ExportConfig {
    /// Read and validate a config file
    pub fn from_file(path: &Path) -> ExportResult<Self> {
        let file = File::open(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ExportConfig =
            serde_json::from_reader(file).map_err(|source| ExportError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate(&UnitsConvertor::standard())?;
        Ok(config)
    }

    /// Reject unknown fields, unknown units and bad date formats
    pub fn validate(&self, convertor: &UnitsConvertor) -> ExportResult<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ExportError::InvalidDateFormat(self.date_format.clone()));
        }

        for column in &self.columns {
            match column {
                ColumnConfig::Field { name, field } => {
                    if !SCALAR_FIELDS.contains(&field.as_str()) {
                        return Err(ExportError::UnknownField {
                            column: name.clone(),
                            field: field.clone(),
                        });
                    }
                }
                ColumnConfig::Nutrient {
                    name,
                    unit: Some(unit),
                    ..
                } => {
                    convertor
                        .base_unit(unit)
                        .map_err(|source| ExportError::Units {
                            column: name.clone(),
                            source,
                        })?;
                }
                ColumnConfig::Nutrient { unit: None, .. } => {}
            }
        }
        Ok(())
    }
}

/// Renders documents into CSV cells
pub struct CsvExporter<'a> {
    config: &'a ExportConfig,
    convertor: &'a UnitsConvertor,
}

impl<'a> CsvExporter<'a> {
    pub fn new(config: &'a ExportConfig, convertor: &'a UnitsConvertor) -> ExportResult<Self> {
        config.validate(convertor)?;
        Ok(Self { config, convertor })
    }

    pub fn header(&self) -> Vec<&str> {
        self.config.columns.iter().map(ColumnConfig::name).collect()
    }

    /// Cells of one document, in column order
    pub fn row(&self, document: &MergedDocument) -> ExportResult<Vec<String>> {
        self.config
            .columns
            .iter()
            .map(|column| self.cell(column, document))
            .collect()
    }

    fn cell(&self, column: &ColumnConfig, document: &MergedDocument) -> ExportResult<String> {
        match column {
            ColumnConfig::Field { field, .. } => match document.field(field) {
                Some(FieldValue::Decimal(value)) => Ok(self.config.float_format.format(value)),
                Some(FieldValue::Date(date)) => self.format_date(date),
                Some(value) => Ok(value.to_string()),
                None => Ok(String::new()),
            },
            ColumnConfig::Nutrient {
                name,
                nutrient_id,
                scale,
                unit,
            } => {
                let Some(entry) = document.nutrient(*nutrient_id) else {
                    return Ok(String::new());
                };
                let amount = match unit {
                    Some(unit) => self
                        .convertor
                        .convert(entry.amount, entry.nutrient.unit_name, unit)
                        .map_err(|source| ExportError::Units {
                            column: name.clone(),
                            source,
                        })?,
                    None => entry.amount,
                };
                Ok(self.config.float_format.format(amount * scale))
            }
        }
    }

    fn format_date(&self, date: NaiveDate) -> ExportResult<String> {
        // Time specifiers pass validation but cannot render a bare date
        let mut out = String::new();
        write!(out, "{}", date.format(&self.config.date_format))
            .map_err(|_| ExportError::InvalidDateFormat(self.config.date_format.clone()))?;
        Ok(out)
    }

    /// Write the header and one row per document
    pub fn write<W: Write>(
        &self,
        documents: &[MergedDocument],
        writer: &mut csv::Writer<W>,
    ) -> ExportResult<()> {
        tracing::info!(rows = documents.len(), "Writing merged data to CSV");
        writer.write_record(self.header())?;
        for document in documents {
            writer.write_record(self.row(document)?)?;
        }
        Ok(())
    }
}

/// Write `merged.csv` into `merged_data_dir`
pub fn export_csv(
    documents: &[MergedDocument],
    config: &ExportConfig,
    merged_data_dir: &Path,
) -> ExportResult<PathBuf> {
    let convertor = UnitsConvertor::standard();
    let exporter = CsvExporter::new(config, &convertor)?;

    let path = merged_data_dir.join(MERGED_CSV_FILE);
    let io_error = |source: std::io::Error| ExportError::Io {
        path: path.clone(),
        source,
    };
    let file = File::create(&path).map_err(io_error)?;
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(file);
    exporter.write(documents, &mut writer)?;
    writer.flush().map_err(io_error)?;

    Ok(path)
}
