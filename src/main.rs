use std::sync::Arc;

use actix_files as fs;
use actix_web::{web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use tera::Tera;

use slide_prompt_web::config::{ServerConfig, UpstreamConfig};
use slide_prompt_web::upstream::ChatMessagesClient;
use slide_prompt_web::wizard::client::HttpGenerateApi;
use slide_prompt_web::web::routes;
use slide_prompt_web::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting slide prompt generator");

    let server = ServerConfig::from_env();
    let upstream = UpstreamConfig::from_env();

    // Initialize template engine
    let mut tera = match Tera::new(&server.template_glob) {
        Ok(t) => t,
        Err(e) => {
            error!("Template parsing error: {}", e);
            std::process::exit(1);
        }
    };
    tera.autoescape_on(vec![".html"]);

    // Create app state
    info!("Wizard sends generation requests to {}", server.api_base);
    let app_state = Data::new(AppState::new(
        tera,
        upstream,
        Arc::new(ChatMessagesClient::new()),
        Arc::new(HttpGenerateApi::new(&server.api_base)),
    ));

    info!("Listening on {}:{}", server.host, server.port);
    let static_dir = server.static_dir.clone();

    // Start web server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", &static_dir))
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
