use std::sync::Arc;

use anyhow::Result;
use house_price::{
    config::{self, Config},
    logger::setup_logger,
    model::load_model,
    web::{start_http_server, AppState},
};
use log::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logger
    setup_logger()?;

    let config: Arc<Config> = Arc::new(config::read_config());

    let model = load_model(&config).await.unwrap_or_else(|err| {
        error!("Error loading model: {:#}", err);
        std::process::exit(1);
    });

    let state = AppState::new(config.clone(), model);
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);

    let mut server_handle = tokio::task::spawn(start_http_server(state, shutdown_rx));

    let finished = tokio::select! {
        joined = &mut server_handle => Some(joined),
        _ = tokio::signal::ctrl_c() => None,
    };
    let joined = match finished {
        Some(joined) => joined,
        None => {
            info!("shutting down");
            let _ = shutdown_tx.send(());
            server_handle.await
        }
    };

    if let Err(err) = joined? {
        error!("Error: {:?}", err)
    }

    Ok(())
}
