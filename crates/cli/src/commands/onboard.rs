//! `silent-investigator onboard`: first-time setup.

use std::path::Path;

use investigator_config::AppConfig;

pub async fn run(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = super::config_path(config);

    println!("Silent Investigator: First-Time Setup");
    println!("=====================================\n");

    if let Some(dir) = config_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("Created config directory: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        println!("Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("Created config.toml at: {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or set generator.api_key)");
    println!("  2. Run: silent-investigator doctor");
    println!("  3. Run: silent-investigator investigate --file <document>\n");

    Ok(())
}
