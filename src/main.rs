mod ai;
mod app;
mod config;
mod domain;
mod export;
mod infrastructure;
mod ingest;
mod worklist;

use anyhow::Result;
use infrastructure::{directories, logging, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config.logging, &paths)?;

    let stop = shutdown::install_stop_handlers();
    let app = app::ReviewApp::initialize(config, paths, stop)?;
    app.run().await
}
