//! Configuration and connectivity check

use std::io::Write;

use anyhow::{Context, Result};
use watersave_core::{AdviceBackend, AdviceClient, Config};

/// Print the resolved configuration and probe the advice service
pub async fn cmd_check(config: &Config) -> Result<()> {
    println!("🔍 WaterSave configuration\n");

    println!(
        "   Config file:    {}",
        config
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none, using defaults and environment)".to_string())
    );
    println!("   API key:        {}", config.masked_key());
    println!("   Backend:        {:?}", config.backend);
    println!("   Base URL:       {}", config.base_url);
    println!("   Model:          {}", config.model);
    println!("   Timeout:        {}s", config.timeout.as_secs());
    println!("   Summary window: {} days", config.summary_window);

    let client = AdviceClient::from_config(config).context("Failed to create advice client")?;

    print!("\n   Advice service at {}: ", client.host());
    std::io::stdout().flush()?;
    if client.health_check().await {
        println!("✅ Reachable");
    } else {
        println!("❌ Unreachable");
        println!("\n⚠️  Advice features will report errors until the service is reachable.");
        println!("   Check the base URL, your network connection and the API key.");
    }

    Ok(())
}
