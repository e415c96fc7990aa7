//! Tools module
//!
//! Consumers of merged documents: summary tables, CSV export and fixture
//! verification.

pub mod export;
pub mod summarize;
pub mod verify;

pub use export::{export_csv, CsvExporter, ExportConfig, ExportError, ExportResult};
pub use summarize::{summarize, SummaryError, SummaryResult};
pub use verify::{verify_test_data, VerifyError, VerifyResult};
