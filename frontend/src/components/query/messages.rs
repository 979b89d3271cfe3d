use common::error::QueryError;
use common::model::query::QueryDefaults;
use common::model::run::RunResult;
use common::model::workbook::SelectedWorkbook;
use common::session::Ticket;

/// Text fields of the form.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SearchUrl,
    DataPath,
    SheetName,
    QueryColumn,
    ResultColumn,
}

pub enum Msg {
    SetField(Field, String),
    SetOverwrite(bool),
    FileSelected(web_sys::File),
    WorkbookRead {
        ticket: Ticket,
        result: Result<SelectedWorkbook, QueryError>,
    },
    Run,
    RunFinished {
        ticket: Ticket,
        workbook_name: String,
        result: RunResult,
    },
    SetDefaults(QueryDefaults),
}
