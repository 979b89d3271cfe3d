//! Spreadsheet column references (`A`, `B`, ..., `Z`, `AA`, ...).
//!
//! A `ColumnReference` can only be obtained through validation, so holding one
//! means the string is one or more ASCII letters. Case is preserved exactly as
//! typed; `index` reads the letters case-insensitively.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ColumnField, QueryError};

static COLUMN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());

/// Columns in an xlsx worksheet, `A` through `XFD`.
pub const MAX_COLUMNS: usize = 16_384;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnReference(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0:?} no es una columna válida")]
pub struct InvalidColumn(pub String);

impl ColumnReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Zero-based column position: `A` is 0, `Z` is 25, `AA` is 26.
    ///
    /// Returns `None` only when the reference is too long to fit in `usize`.
    pub fn index(&self) -> Option<usize> {
        let mut col: usize = 0;
        for b in self.0.bytes() {
            let v = (b.to_ascii_uppercase() - b'A' + 1) as usize;
            col = col.checked_mul(26)?.checked_add(v)?;
        }
        Some(col - 1)
    }

    /// Whether the column exists in an xlsx worksheet (no further right than `XFD`).
    pub fn fits_worksheet(&self) -> bool {
        self.index().is_some_and(|i| i < MAX_COLUMNS)
    }
}

impl FromStr for ColumnReference {
    type Err = InvalidColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if COLUMN_RE.is_match(s) {
            Ok(ColumnReference(s.to_string()))
        } else {
            Err(InvalidColumn(s.to_string()))
        }
    }
}

impl TryFrom<String> for ColumnReference {
    type Error = InvalidColumn;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if COLUMN_RE.is_match(&value) {
            Ok(ColumnReference(value))
        } else {
            Err(InvalidColumn(value))
        }
    }
}

impl From<ColumnReference> for String {
    fn from(value: ColumnReference) -> Self {
        value.0
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates the raw value of a column field.
///
/// Nothing is trimmed: `" A"` is rejected just like `"A1"` or `""`.
pub fn validate_column(field: ColumnField, input: &str) -> Result<ColumnReference, QueryError> {
    input
        .parse()
        .map_err(|InvalidColumn(value)| QueryError::InvalidColumnReference { field, value })
}
