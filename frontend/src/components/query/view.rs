//! View rendering for the query form.
//!
//! Layout: search endpoint and data path, sheet name and overwrite flag, the
//! workbook picker, the two column fields side by side, the run button and the
//! result area. After the first run attempt, fields that would fail validation
//! are outlined with their error below.
//!
//! All user-facing labels are in Spanish; engine and validation messages are
//! shown as received.

use common::error::{ColumnField, QueryError};
use common::model::query::{collect_field_errors, DEFAULT_DATA_PATH, DEFAULT_SHEET_NAME};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::format_size;
use super::messages::{Field, Msg};
use super::state::QueryComponent;

pub fn view(component: &QueryComponent, ctx: &Context<QueryComponent>) -> Html {
    let link = ctx.link();
    let errors = if component.attempted {
        collect_field_errors(&component.fields, component.workbook.current())
    } else {
        Vec::new()
    };

    html! {
        <div class="query-root">
            <h1>{"Consulta de libros Excel"}</h1>
            { text_field(link, Field::SearchUrl, "URL de búsqueda", &component.fields.search_url, "", None) }
            { text_field(link, Field::DataPath, "Ruta de datos", &component.fields.data_path, DEFAULT_DATA_PATH, None) }
            { text_field(link, Field::SheetName, "Hoja", &component.fields.sheet_name, DEFAULT_SHEET_NAME, None) }
            <div class="field">
                <label>
                    <input
                        type="checkbox"
                        checked={component.fields.overwrite}
                        onchange={link.callback(|e: Event| {
                            Msg::SetOverwrite(e.target_unchecked_into::<HtmlInputElement>().checked())
                        })}
                    />
                    {" Sobrescribir resultados existentes"}
                </label>
            </div>
            { build_workbook_picker(component, link, workbook_error(&errors)) }
            <div class="columns">
                { text_field(link, Field::QueryColumn, "Columna de consulta", &component.fields.query_column, "A", column_error(&errors, ColumnField::QueryColumn)) }
                { text_field(link, Field::ResultColumn, "Columna de resultados", &component.fields.result_column, "B", column_error(&errors, ColumnField::ResultColumn)) }
            </div>
            <button
                class="run-btn"
                disabled={component.running}
                onclick={link.callback(|_| Msg::Run)}
            >
                { if component.running { "Ejecutando..." } else { "Ejecutar consulta" } }
            </button>
            { build_result_area(component) }
            {
                match &component.version {
                    Some(version) => html! { <div class="version">{ format!("xlquery {}", version) }</div> },
                    None => html! {},
                }
            }
        </div>
    }
}

fn column_error(errors: &[QueryError], wanted: ColumnField) -> Option<String> {
    errors.iter().find_map(|err| match err {
        QueryError::InvalidColumnReference { field, .. } if *field == wanted => Some(err.to_string()),
        _ => None,
    })
}

fn workbook_error(errors: &[QueryError]) -> Option<String> {
    errors
        .iter()
        .find(|err| matches!(err, QueryError::MissingOrInvalidWorkbook))
        .map(|err| err.to_string())
}

/// A labelled text input bound to one `Field`, with an optional error hint.
fn text_field(
    link: &Scope<QueryComponent>,
    field: Field,
    label: &'static str,
    value: &str,
    placeholder: &'static str,
    error: Option<String>,
) -> Html {
    let invalid = error.is_some();
    html! {
        <div class={classes!("field", invalid.then_some("invalid"))}>
            <label>{label}</label>
            <input
                type="text"
                value={value.to_string()}
                placeholder={placeholder}
                oninput={link.callback(move |e: InputEvent| {
                    Msg::SetField(field, e.target_unchecked_into::<HtmlInputElement>().value())
                })}
            />
            {
                match error {
                    Some(message) => html! { <span class="hint">{message}</span> },
                    None => html! {},
                }
            }
        </div>
    }
}

fn build_workbook_picker(
    component: &QueryComponent,
    link: &Scope<QueryComponent>,
    error: Option<String>,
) -> Html {
    let status = if component.workbook.is_pending() {
        "Leyendo archivo...".to_string()
    } else if let Some(workbook) = component.workbook.current() {
        format!("{} ({})", workbook.name, format_size(workbook.size))
    } else {
        "Ningún archivo seleccionado".to_string()
    };

    html! {
        <div class={classes!("field", error.is_some().then_some("invalid"))}>
            <label>{"Libro (.xlsx)"}</label>
            <input
                type="file"
                accept=".xlsx,application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                onchange={link.batch_callback(|e: Event| {
                    let input = e.target_unchecked_into::<HtmlInputElement>();
                    input
                        .files()
                        .and_then(|files| files.get(0))
                        .map(Msg::FileSelected)
                        .into_iter()
                        .collect::<Vec<_>>()
                })}
            />
            <span class="workbook-status">{status}</span>
            {
                match error {
                    Some(message) => html! { <span class="hint">{message}</span> },
                    None => html! {},
                }
            }
        </div>
    }
}

/// Either the error list or the download link for the updated workbook.
fn build_result_area(component: &QueryComponent) -> Html {
    let Some(outcome) = &component.outcome else {
        return html! {};
    };

    match outcome.download() {
        Some((file_name, workbook)) => html! {
            <div class="result">
                <a class="download" href={workbook.as_str().to_string()} download={file_name.to_string()}>
                    { format!("Descargar {}", file_name) }
                </a>
            </div>
        },
        None => html! {
            <div class="result">
                <ul class="errors">
                    { for outcome.messages().iter().map(|message| html! { <li>{ message.clone() }</li> }) }
                </ul>
            </div>
        },
    }
}
