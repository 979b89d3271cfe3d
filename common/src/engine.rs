//! Boundary between the query pipeline and the engine that does the work.
//!
//! The engine fetches the search results, evaluates the data path and writes
//! the values into the workbook. None of that happens here: this module only
//! marshals a `QueryDescriptor` into an engine call and relays the `RunResult`.

use crate::model::column::ColumnReference;
use crate::model::query::QueryDescriptor;
use crate::model::run::RunResult;
use crate::model::workbook::EncodedWorkbook;

pub trait QueryEngine {
    /// Writes the values found under `data_path` into `result_column` of
    /// `sheet_name`, one row per value of `query_column`. With `overwrite`
    /// unset, cells that already hold a value are left alone.
    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        search_url: &str,
        data_path: &str,
        sheet_name: &str,
        query_column: &ColumnReference,
        result_column: &ColumnReference,
        overwrite: bool,
        encoded_workbook: &EncodedWorkbook,
        workbook_name: &str,
    ) -> RunResult;
}

/// Hands one descriptor to the engine. No retries.
pub fn run_query<E: QueryEngine + ?Sized>(engine: &E, descriptor: &QueryDescriptor) -> RunResult {
    engine.run(
        descriptor.search_url(),
        descriptor.data_path(),
        descriptor.sheet_name(),
        descriptor.query_column(),
        descriptor.result_column(),
        descriptor.overwrite(),
        descriptor.encoded_workbook(),
        descriptor.workbook_name(),
    )
}
