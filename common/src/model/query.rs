//! Query descriptors: the validated, immutable input of one engine run.
//!
//! `QueryFields` is the raw state of the form. `build_descriptor` turns it,
//! together with the currently selected workbook, into a `QueryDescriptor` or
//! the first validation error, in this order:
//!
//! 1. query column
//! 2. result column
//! 3. overwrite flag (never fails)
//! 4. sheet name, trimmed, empty means `Sheet1`
//! 5. data path, trimmed, empty means `.item[].link`
//! 6. encoded workbook, must be present and carry a spreadsheet signature

use serde::{Deserialize, Serialize};

use crate::error::{ColumnField, QueryError};
use crate::model::column::{validate_column, ColumnReference};
use crate::model::workbook::{EncodedWorkbook, SelectedWorkbook};

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_DATA_PATH: &str = ".item[].link";

/// Raw field values as typed in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFields {
    pub search_url: String,
    pub data_path: String,
    pub sheet_name: String,
    pub query_column: String,
    pub result_column: String,
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    #[serde(rename = "searchURL")]
    search_url: String,
    data_path: String,
    sheet_name: String,
    query_column: ColumnReference,
    result_column: ColumnReference,
    overwrite: bool,
    workbook_name: String,
    encoded_workbook: EncodedWorkbook,
}

impl QueryDescriptor {
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    pub fn data_path(&self) -> &str {
        &self.data_path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn query_column(&self) -> &ColumnReference {
        &self.query_column
    }

    pub fn result_column(&self) -> &ColumnReference {
        &self.result_column
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn workbook_name(&self) -> &str {
        &self.workbook_name
    }

    pub fn encoded_workbook(&self) -> &EncodedWorkbook {
        &self.encoded_workbook
    }
}

/// Defaults the backend hands to the form on first render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefaults {
    pub version: String,
    #[serde(rename = "searchURL")]
    pub search_url: String,
    pub sheet_name: String,
    pub data_path: String,
}

impl QueryDefaults {
    pub fn new(version: impl Into<String>, search_url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            search_url: search_url.into(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            data_path: DEFAULT_DATA_PATH.to_string(),
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn checked_workbook(workbook: Option<&SelectedWorkbook>) -> Result<(String, EncodedWorkbook), QueryError> {
    workbook
        .and_then(|wb| wb.encoded().map(|encoded| (wb.name.clone(), encoded)))
        .ok_or(QueryError::MissingOrInvalidWorkbook)
}

/// Builds the descriptor for one run, stopping at the first invalid field.
pub fn build_descriptor(
    fields: &QueryFields,
    workbook: Option<&SelectedWorkbook>,
) -> Result<QueryDescriptor, QueryError> {
    let query_column = validate_column(ColumnField::QueryColumn, &fields.query_column)?;
    let result_column = validate_column(ColumnField::ResultColumn, &fields.result_column)?;
    let overwrite = fields.overwrite;
    let sheet_name = or_default(&fields.sheet_name, DEFAULT_SHEET_NAME);
    let data_path = or_default(&fields.data_path, DEFAULT_DATA_PATH);
    let (workbook_name, encoded_workbook) = checked_workbook(workbook)?;

    Ok(QueryDescriptor {
        search_url: fields.search_url.trim().to_string(),
        data_path,
        sheet_name,
        query_column,
        result_column,
        overwrite,
        workbook_name,
        encoded_workbook,
    })
}

/// Runs every check `build_descriptor` runs, without stopping at the first
/// failure. Used to flag all offending fields in the form at once.
pub fn collect_field_errors(fields: &QueryFields, workbook: Option<&SelectedWorkbook>) -> Vec<QueryError> {
    [
        validate_column(ColumnField::QueryColumn, &fields.query_column).err(),
        validate_column(ColumnField::ResultColumn, &fields.result_column).err(),
        checked_workbook(workbook).err(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::workbook::{transcode, XLSX_MIME};

    fn workbook() -> SelectedWorkbook {
        transcode("authors.xlsx", XLSX_MIME, b"PK\x03\x04").unwrap()
    }

    fn fields(query: &str, result: &str) -> QueryFields {
        QueryFields {
            search_url: "http://authors.library.caltech.edu/cgi/search/advanced/".to_string(),
            query_column: query.to_string(),
            result_column: result.to_string(),
            ..QueryFields::default()
        }
    }

    #[test]
    fn empty_sheet_and_path_fall_back_to_defaults() {
        let wb = workbook();
        let d = build_descriptor(&fields("A", "B"), Some(&wb)).unwrap();
        assert_eq!(d.sheet_name(), "Sheet1");
        assert_eq!(d.data_path(), ".item[].link");
        assert_eq!(d.query_column().as_str(), "A");
        assert_eq!(d.result_column().as_str(), "B");
        assert!(!d.overwrite());
        assert_eq!(d.workbook_name(), "authors.xlsx");
        assert_eq!(d.encoded_workbook().as_str(), wb.data_url);
    }

    #[test]
    fn whitespace_only_values_also_fall_back() {
        let mut f = fields("A", "B");
        f.sheet_name = "   ".to_string();
        f.data_path = "\t".to_string();
        let d = build_descriptor(&f, Some(&workbook())).unwrap();
        assert_eq!(d.sheet_name(), DEFAULT_SHEET_NAME);
        assert_eq!(d.data_path(), DEFAULT_DATA_PATH);
    }

    #[test]
    fn given_values_are_trimmed_and_kept() {
        let mut f = fields("a", "c");
        f.sheet_name = " Authors ".to_string();
        f.data_path = " .item[].title ".to_string();
        f.search_url = " http://example.org/search ".to_string();
        f.overwrite = true;
        let d = build_descriptor(&f, Some(&workbook())).unwrap();
        assert_eq!(d.sheet_name(), "Authors");
        assert_eq!(d.data_path(), ".item[].title");
        assert_eq!(d.search_url(), "http://example.org/search");
        assert!(d.overwrite());
        assert_eq!(d.query_column().as_str(), "a");
    }

    #[test]
    fn query_column_is_checked_first() {
        let err = build_descriptor(&fields("1", "2"), None).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidColumnReference { field: ColumnField::QueryColumn, .. }
        ));

        let err = build_descriptor(&fields("A", "B2"), None).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidColumnReference { field: ColumnField::ResultColumn, .. }
        ));
    }

    #[test]
    fn workbook_must_be_selected_and_valid() {
        let f = fields("A", "B");
        assert_eq!(build_descriptor(&f, None), Err(QueryError::MissingOrInvalidWorkbook));

        let csv = transcode("notes.csv", "text/csv", b"a,b").unwrap();
        assert_eq!(build_descriptor(&f, Some(&csv)), Err(QueryError::MissingOrInvalidWorkbook));

        let garbage = SelectedWorkbook {
            name: "x.xlsx".to_string(),
            data_url: "not a data url".to_string(),
            size: 3,
        };
        assert_eq!(build_descriptor(&f, Some(&garbage)), Err(QueryError::MissingOrInvalidWorkbook));
    }

    #[test]
    fn building_twice_gives_equal_descriptors() {
        let wb = workbook();
        let f = fields("A", "B");
        assert_eq!(
            build_descriptor(&f, Some(&wb)).unwrap(),
            build_descriptor(&f, Some(&wb)).unwrap()
        );
    }

    #[test]
    fn collect_reports_every_bad_field_in_order() {
        let errors = collect_field_errors(&fields("A1", ""), None);
        assert_eq!(errors.len(), 3);
        assert!(matches!(
            errors[0],
            QueryError::InvalidColumnReference { field: ColumnField::QueryColumn, .. }
        ));
        assert!(matches!(
            errors[1],
            QueryError::InvalidColumnReference { field: ColumnField::ResultColumn, .. }
        ));
        assert_eq!(errors[2], QueryError::MissingOrInvalidWorkbook);

        assert!(collect_field_errors(&fields("A", "B"), Some(&workbook())).is_empty());
    }

    #[test]
    fn descriptor_uses_camel_case_on_the_wire() {
        let d = build_descriptor(&fields("A", "B"), Some(&workbook())).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["searchURL"], "http://authors.library.caltech.edu/cgi/search/advanced/");
        assert_eq!(json["sheetName"], "Sheet1");
        assert_eq!(json["dataPath"], ".item[].link");
        assert_eq!(json["queryColumn"], "A");
        assert_eq!(json["workbookName"], "authors.xlsx");
        let back: QueryDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn deserializing_rechecks_fields() {
        let d = build_descriptor(&fields("A", "B"), Some(&workbook())).unwrap();
        let mut json = serde_json::to_value(&d).unwrap();
        json["resultColumn"] = "B7".into();
        assert!(serde_json::from_value::<QueryDescriptor>(json.clone()).is_err());
        json["resultColumn"] = "B".into();
        json["encodedWorkbook"] = "data:text/plain;base64,QUJD".into();
        assert!(serde_json::from_value::<QueryDescriptor>(json).is_err());
    }
}
