use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use mailtrack::config::{Config, StoreBackend};
use mailtrack::db::{MemoryStore, MongoStore, Store};
use mailtrack::routes::init_routes;
use mailtrack::state::app_state::AppState;
use mailtrack::utils::pixel::Pixel;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize the store
    let store: Arc<dyn Store> = match config.backend {
        StoreBackend::MongoDb => {
            let uri = config.mongodb_uri.as_deref().unwrap_or_default();
            match MongoStore::connect(uri, config.mongodb_database.as_deref()).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Error connecting to the database: {}", e);
                    std::process::exit(1);
                }
            }
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = web::Data::new(AppState::new(
        store.clone(),
        Pixel::load(&config.pixel_path),
        &config,
    ));
    let cors_origins = config.cors_allowed_origins.clone();

    let server = HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        App::new()
            .wrap(logger)
            .wrap(build_cors(&cors_origins))
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind((config.host.as_str(), config.port));

    let server = match server {
        Ok(server) => server,
        Err(e) => {
            store.close().await;
            return Err(e);
        }
    };

    info!("Server is running on http://{}:{}", config.host, config.port);
    let result = server.run().await;

    store.close().await;
    result
}

/// Any origin unless specific ones are configured.
fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "PATCH"])
        .allowed_headers(vec![http::header::ACCEPT, http::header::CONTENT_TYPE])
        .max_age(3600)
}
