use std::io;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use yanitmatik_server::{app_state::AppState, config::Config, graphql, handlers};

fn cors(origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    match origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors,
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()
        .and_then(|config| config.validate().map(|_| config))
        .map_err(|e| {
            log::error!("{}", e);
            io::Error::other(e.to_string())
        })?;

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let origin = config.cors_allowed_origin.clone();

    log::info!("Using {} question store", config.backend);
    let state = AppState::new(config)
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;
    let schema = graphql::create_schema(state.clone());

    log::info!("Starting HTTP server on {}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphql", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(cors(origin.as_deref()))
            .wrap(Logger::default())
            .configure(handlers::configure)
            .configure(graphql::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
