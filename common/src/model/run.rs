use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::model::workbook::EncodedWorkbook;

const SILENT_FAILURE: &str = "el motor falló sin informar ningún error";

/// What the engine hands back for one run.
///
/// Deserializing goes through `RunResult::failed`, so a failed result read off
/// the wire never carries an empty error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", from = "WireRunResult")]
pub enum RunResult {
    Updated { workbook: EncodedWorkbook },
    Failed { errors: Vec<String> },
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum WireRunResult {
    Updated { workbook: EncodedWorkbook },
    Failed { errors: Vec<String> },
}

impl From<WireRunResult> for RunResult {
    fn from(wire: WireRunResult) -> Self {
        match wire {
            WireRunResult::Updated { workbook } => RunResult::updated(workbook),
            WireRunResult::Failed { errors } => RunResult::failed(errors),
        }
    }
}

impl RunResult {
    pub fn updated(workbook: EncodedWorkbook) -> Self {
        RunResult::Updated { workbook }
    }

    /// A failed run. Blank messages are dropped; if nothing is left a generic
    /// message is used so the error list is never empty.
    pub fn failed<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut errors: Vec<String> = messages
            .into_iter()
            .map(Into::into)
            .filter(|m| !m.trim().is_empty())
            .collect();
        if errors.is_empty() {
            errors.push(SILENT_FAILURE.to_string());
        }
        RunResult::Failed { errors }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, RunResult::Updated { .. })
    }

    pub fn into_result(self) -> Result<EncodedWorkbook, QueryError> {
        match self {
            RunResult::Updated { workbook } => Ok(workbook),
            RunResult::Failed { errors } => Err(QueryError::EngineFailure { messages: errors }),
        }
    }
}

/// What the result area shows: a download link or a list of errors, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Download { file_name: String, workbook: EncodedWorkbook },
    Errors(Vec<String>),
}

impl RunOutcome {
    pub fn from_run(workbook_name: &str, result: RunResult) -> Self {
        match result.into_result() {
            Ok(workbook) => RunOutcome::Download {
                file_name: workbook_name.to_string(),
                workbook,
            },
            Err(err) => RunOutcome::from_error(&err),
        }
    }

    pub fn from_error(err: &QueryError) -> Self {
        RunOutcome::Errors(err.messages())
    }

    pub fn messages(&self) -> &[String] {
        match self {
            RunOutcome::Errors(messages) => messages,
            RunOutcome::Download { .. } => &[],
        }
    }

    pub fn download(&self) -> Option<(&str, &EncodedWorkbook)> {
        match self {
            RunOutcome::Download { file_name, workbook } => Some((file_name, workbook)),
            RunOutcome::Errors(_) => None,
        }
    }
}
