//! Fixture verification
//!
//! Compares merged documents with documents saved from the FDC API. Keys the
//! download cannot reproduce are removed from both sides before comparing.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::data::{load_raw_data, LoadError};
use crate::merge::{merge_sources, MergeError};
use crate::models::MergedDocument;

/// Keys left out of the comparison, at any depth
pub const IGNORED_KEYS: &[&str] = &[
    "foodNutrientDerivation",
    "foodComponents",
    "foodAttributes",
    "dataSource",
    "modifiedDate",
    "availableDate",
    "labelNutrients",
    "changes",
];

/// Verification error types
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot serialize document {fdc_id}: {source}")]
    Serialize {
        fdc_id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("No merged document for fdc_id {0}")]
    MissingDocument(String),

    #[error("Document {fdc_id} differs at {path}: expected {expected}, got {actual}")]
    Mismatch {
        fdc_id: String,
        path: String,
        expected: String,
        actual: String,
    },
}

/// Result type for verification
pub type VerifyResult<T> = Result<T, VerifyError>;

/// First point where two JSON values differ
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Dotted path, array indices as numbers, empty for the root
    pub path: String,
    pub expected: Option<Value>,
    pub actual: Option<Value>,
}

/// Copy of `value` without the given keys, at any nesting depth
pub fn remove_keys(value: &Value, keys: &[&str]) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| remove_keys(v, keys)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !keys.contains(&key.as_str()))
                .map(|(key, v)| (key.clone(), remove_keys(v, keys)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn numbers_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
        _ => false,
    }
}

/// Find the first difference between `expected` and `actual`
///
/// Object keys are visited in sorted order. Numbers compare by value, so
/// `390` equals `390.0`.
pub fn first_difference(expected: &Value, actual: &Value) -> Option<Difference> {
    diff_at(String::new(), expected, actual)
}

fn diff_at(path: String, expected: &Value, actual: &Value) -> Option<Difference> {
    match (expected, actual) {
        (Value::Object(e), Value::Object(a)) => {
            let keys: BTreeSet<&String> = e.keys().chain(a.keys()).collect();
            keys.into_iter().find_map(|key| {
                let child = child_path(&path, key);
                match (e.get(key), a.get(key)) {
                    (Some(ev), Some(av)) => diff_at(child, ev, av),
                    (ev, av) => Some(Difference {
                        path: child,
                        expected: ev.cloned(),
                        actual: av.cloned(),
                    }),
                }
            })
        }
        (Value::Array(e), Value::Array(a)) if e.len() == a.len() => e
            .iter()
            .zip(a)
            .enumerate()
            .find_map(|(i, (ev, av))| diff_at(child_path(&path, &i.to_string()), ev, av)),
        _ if expected == actual || numbers_equal(expected, actual) => None,
        _ => Some(Difference {
            path,
            expected: Some(expected.clone()),
            actual: Some(actual.clone()),
        }),
    }
}

fn describe(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<missing>".to_string(),
    }
}

/// Compare one merged document with its API fixture
///
/// [`IGNORED_KEYS`] are removed from both sides first.
pub fn verify_document(document: &MergedDocument, fixture: &Value) -> VerifyResult<()> {
    let merged = serde_json::to_value(document).map_err(|source| VerifyError::Serialize {
        fdc_id: document.fdc_id,
        source,
    })?;
    let actual = remove_keys(&merged, IGNORED_KEYS);
    let expected = remove_keys(fixture, IGNORED_KEYS);

    match first_difference(&expected, &actual) {
        None => Ok(()),
        Some(diff) => Err(VerifyError::Mismatch {
            fdc_id: document.fdc_id.to_string(),
            path: diff.path,
            expected: describe(&diff.expected),
            actual: describe(&diff.actual),
        }),
    }
}

/// Read `<fdc_id>.json` from `dir`
pub fn read_fixture(dir: &Path, fdc_id: &str) -> VerifyResult<Value> {
    let path = dir.join(format!("{}.json", fdc_id));
    let file = File::open(&path).map_err(|source| VerifyError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_reader(file).map_err(|source| VerifyError::Fixture { path, source })
}

/// FDC ids of the `<fdc_id>.json` fixtures in `dir`, sorted
pub fn fixture_ids(dir: &Path) -> VerifyResult<Vec<String>> {
    let io_error = |source: std::io::Error| VerifyError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut ids = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()) {
                ids.push(stem.to_string());
            }
        }
    }
    ids.sort();
    Ok(ids)
}

/// Check each listed document against its fixture
pub fn verify_documents(
    documents: &[MergedDocument],
    fixture_dir: &Path,
    fdc_ids: &[String],
) -> VerifyResult<()> {
    let by_id: HashMap<String, &MergedDocument> = documents
        .iter()
        .map(|doc| (doc.fdc_id.to_string(), doc))
        .collect();

    for fdc_id in fdc_ids {
        tracing::info!("Validating food with fdc_id: {}", fdc_id);
        let document = by_id
            .get(fdc_id.as_str())
            .ok_or_else(|| VerifyError::MissingDocument(fdc_id.clone()))?;
        let fixture = read_fixture(fixture_dir, fdc_id)?;
        verify_document(document, &fixture)?;
    }
    Ok(())
}

/// Load and merge the tables in `test_data_dir`, then verify fixtures
///
/// With no ids given, every `<fdc_id>.json` in the directory is checked.
/// Returns the number of documents verified.
pub fn verify_test_data(test_data_dir: &Path, fdc_ids: &[String]) -> VerifyResult<usize> {
    let raw_data = load_raw_data(test_data_dir)?;
    let documents = merge_sources(&raw_data)?;

    let fdc_ids = if fdc_ids.is_empty() {
        fixture_ids(test_data_dir)?
    } else {
        fdc_ids.to_vec()
    };
    verify_documents(&documents, test_data_dir, &fdc_ids)?;
    Ok(fdc_ids.len())
}
