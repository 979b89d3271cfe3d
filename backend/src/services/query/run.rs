//! `POST /api/query/run`: hands one query descriptor to the engine.
//!
//! The descriptor arrives as JSON; deserializing it re-checks the column and
//! workbook rules, so an invalid body never reaches the engine (the JSON
//! extractor answers `400` first). Columns past `XFD` get a failed result
//! without starting the engine. The engine runs on a blocking thread since the
//! adapter waits for a child process. Whatever the engine returns is sent
//! back as a `RunResult` with `200`; engine errors are data, not HTTP errors.

use actix_web::{web, HttpResponse, Responder};
use common::engine::run_query;
use common::error::ColumnField;
use common::model::query::QueryDescriptor;
use common::model::run::RunResult;
use log::{error, info, warn};
use std::time::Instant;
use uuid::Uuid;

use crate::engine::SharedEngine;

pub(crate) async fn process(
    engine: web::Data<SharedEngine>,
    payload: web::Json<QueryDescriptor>,
) -> impl Responder {
    let descriptor = payload.into_inner();
    let run_id = Uuid::new_v4();
    info!(
        "run {}: {} sheet={} {} -> {} overwrite={}",
        run_id,
        descriptor.workbook_name(),
        descriptor.sheet_name(),
        descriptor.query_column(),
        descriptor.result_column(),
        descriptor.overwrite()
    );

    let outside = columns_outside_worksheet(&descriptor);
    if !outside.is_empty() {
        warn!("run {} rejected: {}", run_id, outside.join("; "));
        return HttpResponse::Ok().json(RunResult::failed(outside));
    }

    let start = Instant::now();
    let result = run_descriptor(engine.get_ref().clone(), descriptor).await;
    match &result {
        RunResult::Updated { .. } => info!("run {} finished in {:.2?}", run_id, start.elapsed()),
        RunResult::Failed { errors } => error!(
            "run {} failed in {:.2?}: {}",
            run_id,
            start.elapsed(),
            errors.join("; ")
        ),
    }
    HttpResponse::Ok().json(result)
}

async fn run_descriptor(engine: SharedEngine, descriptor: QueryDescriptor) -> RunResult {
    let handle = tokio::task::spawn_blocking(move || run_query(engine.as_ref(), &descriptor));
    match handle.await {
        Ok(result) => result,
        Err(join_err) => RunResult::failed([format!("la tarea del motor falló: {}", join_err)]),
    }
}

fn columns_outside_worksheet(descriptor: &QueryDescriptor) -> Vec<String> {
    [
        (ColumnField::QueryColumn, descriptor.query_column()),
        (ColumnField::ResultColumn, descriptor.result_column()),
    ]
    .into_iter()
    .filter(|(_, column)| !column.fits_worksheet())
    .map(|(field, column)| {
        format!("{}: la columna {} queda fuera de la hoja (la última es XFD)", field, column)
    })
    .collect()
}
