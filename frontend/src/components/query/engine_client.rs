//! HTTP side of the engine boundary.
//!
//! The engine runs behind the backend's `/api/query` scope. `invoke` posts the
//! descriptor and always comes back with a `RunResult`: transport problems are
//! folded into a failed result with a single message, so the caller renders
//! them like any engine error.

use common::model::query::{QueryDefaults, QueryDescriptor};
use common::model::run::RunResult;
use gloo_net::http::Request;

const RUN_PATH: &str = "/api/query/run";
const DEFAULTS_PATH: &str = "/api/query/defaults";

pub async fn invoke(descriptor: &QueryDescriptor) -> RunResult {
    let request = match Request::post(RUN_PATH).json(descriptor) {
        Ok(request) => request,
        Err(err) => return RunResult::failed([format!("No se pudo preparar la consulta: {}", err)]),
    };

    match request.send().await {
        Ok(response) if response.ok() => match response.json::<RunResult>().await {
            Ok(result) => result,
            Err(err) => RunResult::failed([format!("Respuesta no válida del servidor: {}", err)]),
        },
        Ok(response) => RunResult::failed([format!(
            "El servidor respondió {}: {}",
            response.status(),
            response.text().await.unwrap_or_default()
        )]),
        Err(err) => RunResult::failed([format!("No se pudo contactar al servidor: {}", err)]),
    }
}

pub async fn fetch_defaults() -> Option<QueryDefaults> {
    let response = Request::get(DEFAULTS_PATH).send().await.ok()?;
    if !response.ok() {
        return None;
    }
    response.json::<QueryDefaults>().await.ok()
}
