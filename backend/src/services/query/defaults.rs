use actix_web::{web, HttpResponse, Responder};
use common::model::query::QueryDefaults;

use crate::config::Config;

/// Values the form starts with: search endpoint, sheet name and data path.
pub(crate) async fn process(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(QueryDefaults::new(
        env!("CARGO_PKG_VERSION"),
        config.search_url.clone(),
    ))
}
