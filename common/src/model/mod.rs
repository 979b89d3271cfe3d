pub mod column;
pub mod query;
pub mod run;
pub mod workbook;
