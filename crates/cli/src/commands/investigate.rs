//! `silent-investigator investigate`: run the pipeline on one document.

use std::path::Path;

use investigator_agent::Investigator;
use investigator_providers::build_from_config;

pub async fn run(config: Option<&Path>, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config)?;
    let document = super::read_text(file)?;

    let generator = build_from_config(&config.generator)?;
    let investigator = Investigator::from_config(&config, generator)?;
    let investigation = investigator.investigate(&document).await?;

    println!("{}", serde_json::to_string_pretty(&investigation.to_json())?);
    Ok(())
}
