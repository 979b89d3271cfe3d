//! Update function for the query form.
//!
//! Elm-style: takes the current state, the `Context` and a `Msg`, mutates the
//! state and returns whether the view must re-render.
//!
//! Key behaviors
//! - File selection: read the bytes (one await), transcode to a data URL, store
//!   the result in the session's `WorkbookSlot`. A read that finishes after a
//!   newer selection is dropped.
//! - Run: build the descriptor from the fields and the slot; a validation error
//!   goes straight to the result area and the engine is not called. Otherwise
//!   post the descriptor and show the returned workbook or errors. A result
//!   that belongs to an older run is dropped.

use common::error::QueryError;
use common::model::query::build_descriptor;
use common::model::run::RunOutcome;
use common::model::workbook::transcode;
use gloo_file::{futures::read_as_bytes, File};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::engine_client;
use super::helpers::show_toast;
use super::messages::{Field, Msg};
use super::state::QueryComponent;

pub fn update(component: &mut QueryComponent, ctx: &Context<QueryComponent>, msg: Msg) -> bool {
    match msg {
        Msg::SetField(field, value) => {
            let fields = &mut component.fields;
            let slot = match field {
                Field::SearchUrl => &mut fields.search_url,
                Field::DataPath => &mut fields.data_path,
                Field::SheetName => &mut fields.sheet_name,
                Field::QueryColumn => &mut fields.query_column,
                Field::ResultColumn => &mut fields.result_column,
            };
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }
        Msg::SetOverwrite(overwrite) => {
            component.fields.overwrite = overwrite;
            true
        }
        Msg::SetDefaults(defaults) => {
            let fields = &mut component.fields;
            // Fields the user already typed into are left alone.
            if fields.search_url.is_empty() {
                fields.search_url = defaults.search_url;
            }
            if fields.sheet_name.is_empty() {
                fields.sheet_name = defaults.sheet_name;
            }
            if fields.data_path.is_empty() {
                fields.data_path = defaults.data_path;
            }
            component.version = Some(defaults.version);
            true
        }
        Msg::FileSelected(file) => {
            let ticket = component.workbook.begin_read();
            let name = file.name();
            let mime = file.type_();
            let link = ctx.link().clone();

            spawn_local(async move {
                let file = File::from(file);
                let result = match read_as_bytes(&file).await {
                    Ok(bytes) => transcode(&name, &mime, &bytes),
                    Err(err) => Err(QueryError::ReadFailure {
                        name,
                        reason: err.to_string(),
                    }),
                };
                link.send_message(Msg::WorkbookRead { ticket, result });
            });
            true
        }
        Msg::WorkbookRead { ticket, result } => {
            if let Ok(workbook) = &result {
                if !workbook.has_spreadsheet_signature() {
                    gloo_console::warn!(format!(
                        "{} no parece ser un libro .xlsx ({} bytes)",
                        workbook.name, workbook.size
                    ));
                }
            }
            if !component.workbook.resolve(ticket, result) {
                gloo_console::log!("lectura obsoleta descartada");
                return false;
            }
            match (component.workbook.current(), component.workbook.failure()) {
                (Some(workbook), _) => {
                    show_toast(&format!("Libro cargado: {}", workbook.name));
                    component.outcome = None;
                }
                (None, Some(err)) => {
                    component.outcome = Some(RunOutcome::from_error(err));
                }
                (None, None) => {}
            }
            true
        }
        Msg::Run => {
            component.attempted = true;
            let descriptor = match build_descriptor(&component.fields, component.workbook.current()) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    component.outcome = Some(RunOutcome::from_error(&err));
                    return true;
                }
            };

            let ticket = component.runs.advance();
            component.running = true;
            component.outcome = None;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = engine_client::invoke(&descriptor).await;
                link.send_message(Msg::RunFinished {
                    ticket,
                    workbook_name: descriptor.workbook_name().to_string(),
                    result,
                });
            });
            true
        }
        Msg::RunFinished {
            ticket,
            workbook_name,
            result,
        } => {
            if !component.runs.is_current(ticket) {
                return false;
            }
            component.running = false;
            if result.is_updated() {
                show_toast("Consulta terminada.");
            }
            let outcome = RunOutcome::from_run(&workbook_name, result);
            component.outcome = Some(outcome);
            true
        }
    }
}
