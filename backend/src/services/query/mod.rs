//! # Query Service Module
//!
//! Endpoints used by the query form.
//!
//! *   **`POST /run`**: takes a `QueryDescriptor` (JSON) and returns the engine's
//!     `RunResult` (JSON). A body that does not deserialize, or that carries an
//!     invalid column reference or a non-spreadsheet data URL, is rejected with
//!     `400 Bad Request` before the engine is invoked.
//! *   **`GET /defaults`**: returns the `QueryDefaults` used to pre-fill the form.

mod defaults;
mod run;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use log::warn;

const API_PATH: &str = "/api/query";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/run", post().to(run::process))
        .route("/defaults", get().to(defaults::process))
}

/// JSON extractor settings: encoded workbooks make for large bodies, and
/// rejections are answered with a plain-text reason.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            warn!("rejected query descriptor, {}", err);
            let message = format!("Error: {}", err);
            let response = match &err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    HttpResponse::PayloadTooLarge().body(message)
                }
                _ => HttpResponse::BadRequest().body(message),
            };
            InternalError::from_response(err, response).into()
        })
}
