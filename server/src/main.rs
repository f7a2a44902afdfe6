use std::process;
use std::sync::Arc;

use covenant_core::Registry;
use log::{error, info};

mod api;
mod config;
mod state;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = match config::Config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("configuration error: {err}");
            process::exit(1);
        }
    };

    info!(
        "covenant-server starting owner={} deadline={} required_count={} listen={}",
        cfg.owner, cfg.deadline, cfg.required_count, cfg.listen
    );

    let registry = Registry::new(cfg.owner.clone(), cfg.deadline, cfg.required_count, Arc::new(api::LogSink));
    let shared = Arc::new(state::AppState::new(registry));
    let app = api::router(shared);

    let listener = match tokio::net::TcpListener::bind(cfg.listen).await {
        Ok(l) => l,
        Err(err) => {
            error!("failed to bind {}: {err}", cfg.listen);
            process::exit(1);
        }
    };
    info!("covenant-server listening on {}", cfg.listen);
    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {err}");
        process::exit(1);
    }
}
