use anyhow::{Context, Result};
use painto_core::config::StorefrontConfig;
use painto_infrastructure::ConfigService;

pub fn show(service: &ConfigService) -> Result<()> {
    let mut config = service.load()?;
    if !config.shopify.public_access_token.is_empty() {
        config.shopify.public_access_token = "<set>".to_string();
    }
    println!("# {}", service.path().display());
    print!("{}", toml::to_string_pretty(&config).context("Failed to render config")?);
    Ok(())
}

pub fn init(service: &ConfigService) -> Result<()> {
    if service.path().exists() {
        println!("Config already exists at {}", service.path().display());
        return Ok(());
    }
    service.save(&StorefrontConfig::default())?;
    println!("Wrote default config to {}", service.path().display());
    Ok(())
}
