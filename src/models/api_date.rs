//! Date as written by the FDC API
//!
//! The download uses `YYYY-MM-DD`; the API writes `M/D/YYYY` with no zero
//! padding on month or day.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Date format used by the CSV tables
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date rendered in API format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiDate(NaiveDate);

impl ApiDate {
    /// Parse a `YYYY-MM-DD` date from a table cell
    pub fn parse_file_date(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(s, FILE_DATE_FORMAT).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for ApiDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for ApiDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.0.month(), self.0.day(), self.0.year())
    }
}

impl Serialize for ApiDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
