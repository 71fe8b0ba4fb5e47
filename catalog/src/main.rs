use anyhow::Result;
use catalog::App;
use catalog_auth::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("\nA config.toml (or the file named by CATALOG_CONFIG) may contain:");
        eprintln!("\nbase_url = \"http://localhost:8000/api\"");
        eprintln!("# request_timeout_secs = 30");
        e
    })?;

    settings.validate().map_err(|e| {
        eprintln!("Configuration validation failed: {}", e);
        anyhow::anyhow!(e)
    })?;

    // Logging is initialized in App::run()
    App::new(settings).run().await?;

    Ok(())
}
