mod config;
mod engine;
mod services;

use crate::config::Config;
use crate::engine::{CommandEngine, SharedEngine};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("invalid configuration, {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    let url = config.url();

    if config.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url_clone);
        });
    }

    let engine: SharedEngine = Arc::new(CommandEngine::new(
        config.engine_program.clone(),
        config.engine_args.clone(),
    ));

    info!("Server running at {}", url);
    info!(
        "engine: {} {}, search endpoint: {}",
        config.engine_program,
        config.engine_args.join(" "),
        config.search_url
    );

    let bind = (config.host.clone(), config.port);
    let json_limit = config.json_limit_bytes();
    let config = web::Data::new(config);
    let engine = web::Data::new(engine);

    HttpServer::new(move || {
        App::new()
            .app_data(services::query::json_config(json_limit))
            .app_data(engine.clone())
            .app_data(config.clone())
            .service(services::query::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
        .bind(bind)?
        .run()
        .await
}
