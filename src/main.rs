use alphaess::logging::init_logging;
use alphaess::{AlphaEssClient, Config};
use anyhow::Result;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config path as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path, e))?,
        None => Config::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?,
    };

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let mut client = AlphaEssClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    info!("AlphaESS client starting up");

    let result = run(&client).await;
    client.close();

    match result {
        Ok(()) => {
            info!("Done");
            Ok(())
        }
        Err(e) => {
            error!("Run failed with error: {}", e);
            Err(e)
        }
    }
}

async fn run(client: &AlphaEssClient) -> Result<()> {
    if !client.authenticate().await? {
        warn!("No systems are bound to this application ID");
        return Ok(());
    }

    let devices = client.get_data_with_defaults().await?;
    println!("{}", serde_json::to_string_pretty(&devices)?);
    Ok(())
}
