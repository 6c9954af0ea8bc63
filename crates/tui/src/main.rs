mod app;
mod client;
mod config;
mod error;
mod local_state;
mod logging;
mod ui;

use crate::{config::ConfigLoader, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let loader = ConfigLoader::from_args();
    let config = loader.load()?;
    logging::init(&config)?;
    tracing::info!(backend = ?config.backend, currency = %config.currency, "starting pennywise");

    let mut app = app::App::new(loader, config).await?;
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!(%err, "pennywise stopped with an error");
    }
    result
}
