//! Workbooks encoded as Base64 data URLs.
//!
//! The browser hands us raw bytes plus whatever MIME type it guessed for the
//! file. `to_data_url`/`transcode` turn that into a `data:<mime>;base64,<payload>`
//! string without judging it; `EncodedWorkbook` is the checked form, accepted
//! only when the MIME prefix is an OOXML spreadsheet or a generic binary.

use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::QueryError;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const BINARY_MIME: &str = "application/octet-stream";

static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^data:application/(?:vnd\.openxmlformats-officedocument\.spreadsheetml\.sheet|octet-stream);base64,[A-Za-z0-9+/]+={0,2}$",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a spreadsheet data URL")]
pub struct InvalidWorkbook;

/// A data URL known to carry a spreadsheet (or generic binary) payload.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedWorkbook(String);

impl EncodedWorkbook {
    /// Checks `raw` against the spreadsheet data-URL signature.
    pub fn parse(raw: &str) -> Option<Self> {
        SIGNATURE_RE
            .is_match(raw)
            .then(|| EncodedWorkbook(raw.to_string()))
    }

    /// Encodes an xlsx file produced by the engine.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Some(EncodedWorkbook(to_data_url(XLSX_MIME, bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The MIME type between `data:` and `;base64,`, as written.
    pub fn mime(&self) -> &str {
        let rest = &self.0["data:".len()..];
        rest.split(';').next().unwrap_or(rest)
    }

    pub fn payload(&self) -> &str {
        self.0.split_once(',').map(|(_, p)| p).unwrap_or_default()
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(self.payload())
    }
}

impl TryFrom<String> for EncodedWorkbook {
    type Error = InvalidWorkbook;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if SIGNATURE_RE.is_match(&value) {
            Ok(EncodedWorkbook(value))
        } else {
            Err(InvalidWorkbook)
        }
    }
}

impl From<EncodedWorkbook> for String {
    fn from(value: EncodedWorkbook) -> Self {
        value.0
    }
}

// Payloads run to megabytes; keep debug output readable.
impl fmt::Debug for EncodedWorkbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedWorkbook")
            .field("mime", &self.mime())
            .field("payload_len", &self.payload().len())
            .finish()
    }
}

/// Encodes `bytes` as a Base64 data URL with the given MIME type.
///
/// An empty MIME type becomes `application/octet-stream`, like a browser
/// `FileReader.readAsDataURL` does for files it can't classify.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = mime.trim();
    let mime = if mime.is_empty() { BINARY_MIME } else { mime };
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// The file the user picked, after transcoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedWorkbook {
    pub name: String,
    pub data_url: String,
    pub size: usize,
}

impl SelectedWorkbook {
    pub fn encoded(&self) -> Option<EncodedWorkbook> {
        EncodedWorkbook::parse(&self.data_url)
    }

    pub fn has_spreadsheet_signature(&self) -> bool {
        SIGNATURE_RE.is_match(&self.data_url)
    }
}

/// Turns the bytes read from a selected file into a `SelectedWorkbook`.
///
/// The browser-supplied MIME type is kept as is; a file of the wrong type is
/// still stored and rejected later by the descriptor builder.
pub fn transcode(name: &str, mime: &str, bytes: &[u8]) -> Result<SelectedWorkbook, QueryError> {
    if bytes.is_empty() {
        return Err(QueryError::ReadFailure {
            name: name.to_string(),
            reason: "el archivo está vacío".to_string(),
        });
    }
    Ok(SelectedWorkbook {
        name: name.to_string(),
        data_url: to_data_url(mime, bytes),
        size: bytes.len(),
    })
}
