// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use log::info;
use std::sync::Arc;

mod catalog;
mod config;
mod errors;
mod handlers;
mod models;
mod services;
mod state;

use crate::config::Config;
use crate::services::{GeminiService, ImageProcessor, RenovationAi};
use crate::state::SessionStore;

/// Shared services handed to every handler.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<SessionStore>,
    pub ai: Arc<dyn RenovationAi>,
    pub images: Arc<ImageProcessor>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    info!("Starting inmueblar service...");
    if config.gemini_api_key.is_empty() {
        // Deliberately not fatal: the key is only needed once a call is made.
        info!("GEMINI_API_KEY is not set; AI calls will fail until it is provided");
    }

    let ai: Arc<dyn RenovationAi> = Arc::new(GeminiService::new(
        config.gemini_api_key.clone(),
        config.analysis_model.clone(),
        config.editing_model.clone(),
    ));

    let context = AppContext {
        store: Arc::new(SessionStore::new()),
        ai,
        images: Arc::new(ImageProcessor::new()),
    };

    info!("Starting HTTP server on {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(context.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("failed to bind {}", config.bind_addr))?
    .run()
    .await?;

    Ok(())
}
