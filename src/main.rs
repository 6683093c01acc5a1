// deckhub server entrypoint
//!
//! The heavy lifting lives in dedicated modules so this file remains a thin
//! orchestrator: load configuration, set up logging, check the registry,
//! serve.

mod archive;
mod config;
mod handlers;
mod registry;
mod state;

use std::env;

use actix_web::{App, HttpServer, web};
use anyhow::Result;
use log::info;

use config::ServerConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> Result<()> {
    // Optional config path as the first argument, `deckhub.toml` otherwise.
    let config_path = env::args().nth(1).unwrap_or_else(|| "deckhub.toml".to_string());
    let config = ServerConfig::load(&config_path)?;

    // Logging before any other side effects.
    let default_level = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    info!("deckhub v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Static root: {:?}  Registered decks: {}  Archive: {}",
        config.static_root,
        config.decks.len(),
        config.archive_name
    );

    let state = AppState::from_config(&config);
    state.registry.ensure_root();
    state.registry.check_registered_files();

    let bind_addr = (config.host.clone(), config.port);
    info!("Starting HTTP server on {}:{}", config.host, config.port);
    info!("Endpoints: GET /download/{{filename}}, GET /healthz");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
