use anyhow::Result;
use faraday::config::Config;
use faraday::entry::EntryStateMachine;
use faraday::prompt::ConsolePrompt;
use faraday::store::JsonDataStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;

    faraday::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Faraday EV dataset curator starting up");

    let store = JsonDataStore::open(&config.dataset.file)
        .map_err(|e| anyhow::anyhow!("Failed to open dataset: {}", e))?;
    let prompt = ConsolePrompt::new();

    let mut machine = EntryStateMachine::new(prompt, store, config.entry.clone());
    machine
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Entry session failed: {}", e))?;

    faraday::logging::shutdown();
    Ok(())
}
