mod config;
mod service;

use anyhow::Result;
use crate::config::Config;
use crate::service::CompileService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Compile every configured agent
    let service = CompileService::new(config);
    service.run().await
}
