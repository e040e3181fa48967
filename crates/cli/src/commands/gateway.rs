//! `parley gateway` — Start the HTTP API server.

use parley_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(port_override)?;

    println!("Parley Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Weather API configured: {}",
        if config.weather.api_key.is_some() { "yes" } else { "no (demo data)" }
    );
    println!("   Knowledge corpus: {}", config.retrieval.docs_dir);

    parley_gateway::start(config).await?;

    Ok(())
}

fn load_config(port_override: Option<u16>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    Ok(config)
}
