//! Errors shared by the frontend and the backend.
//!
//! Every variant is user-visible: the frontend renders its `Display` text in the
//! result area, so the text is in Spanish like the rest of the form. Validation variants are produced before the engine is invoked;
//! `EngineFailure` carries the engine messages untouched.

use std::fmt;

use thiserror::Error;

/// The form field a column reference was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnField {
    QueryColumn,
    ResultColumn,
}

impl ColumnField {
    /// Wire/field name as used by the descriptor (`queryColumn`, `resultColumn`).
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnField::QueryColumn => "queryColumn",
            ColumnField::ResultColumn => "resultColumn",
        }
    }
}

impl fmt::Display for ColumnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The field value is not a sequence of one or more letters.
    #[error("{field}: {value:?} no es una columna válida, use solo letras (A, B, ..., AA)")]
    InvalidColumnReference { field: ColumnField, value: String },

    /// No workbook was selected, its read is still pending, or the encoded value
    /// does not carry a spreadsheet data-URL signature.
    #[error("seleccione un libro .xlsx antes de ejecutar la consulta")]
    MissingOrInvalidWorkbook,

    /// The selected file could not be read.
    #[error("no se pudo leer {name}: {reason}")]
    ReadFailure { name: String, reason: String },

    /// The engine reported one or more errors.
    #[error("{}", messages.join("\n"))]
    EngineFailure { messages: Vec<String> },
}

impl QueryError {
    /// Messages to render in the result area, one entry per line.
    pub fn messages(&self) -> Vec<String> {
        match self {
            QueryError::EngineFailure { messages } => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}
