//! Demo binary: wires configuration, logging, a hub and two clients, then
//! prints what each client's subscriptions pick up.

use std::sync::Arc;

use serde_json::json;
use tagsub::broker::Hub;
use tagsub::client::Client;
use tagsub::config::load_config;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tagsub::utils::logging::init("info");
            error!("Failed to load configuration: {}", e);
            return;
        }
    };
    tagsub::utils::logging::init(&config.logging.level);

    if let Err(e) = run(config).await {
        error!("Demo failed: {}", e);
    }
}

async fn run(config: tagsub::config::Settings) -> Result<(), Box<dyn std::error::Error>> {
    let hub = Arc::new(Hub::new(config.hub.overflow));
    let buffer = config.client.intake_buffer;

    let kitchen = Client::new(hub.clone(), buffer);
    let everything = Client::new(hub.clone(), buffer);

    kitchen.subscribe(["sensor", "kitchen"])?;
    everything.subscribe(Vec::<String>::new())?;
    info!(
        kitchen = ?kitchen.list()?,
        everything = ?everything.list()?,
        "subscriptions installed"
    );

    let readers = [&kitchen, &everything].map(|client| {
        let id = client.id();
        let messages = client.messages();
        tokio::spawn(async move {
            while let Some(message) = messages.recv().await {
                info!(%id, tags = ?message.tags, payload = %message.payload, "received");
            }
            info!(%id, "stream closed");
        })
    });

    kitchen
        .publish(["sensor", "kitchen", "temp"], json!({"celsius": 21.5}))
        .await?;
    everything
        .publish(["sensor", "garage"], json!({"celsius": 9.0}))
        .await?;

    tokio::select! {
        _ = tokio::time::sleep(std::time::Duration::from_millis(200)) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    for client in [&kitchen, &everything] {
        client.close()?;
        client.wait().await;
    }
    for reader in readers {
        reader.await?;
    }
    hub.shutdown();

    Ok(())
}
