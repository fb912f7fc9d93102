//! `silent-investigator evaluate`: batch evaluation over a dataset.

use std::path::Path;

use investigator_agent::{Evaluator, Investigator, load_cases, setup};
use investigator_judge::ResponseGrader;
use investigator_providers::build_from_config;
use tracing::info;

pub async fn run(
    config: Option<&Path>,
    dataset: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config)?;
    let cases = load_cases(dataset)?;
    info!(cases = cases.len(), dataset = %dataset.display(), "Loaded dataset");

    let generator = build_from_config(&config.generator)?;
    let evaluator = Evaluator::new(
        Investigator::from_config(&config, generator)?,
        ResponseGrader::new(setup::grading_rules(&config.judge)),
    );

    let report = evaluator.run(&cases).await?;
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output {
        std::fs::write(path, &json)?;
        info!(path = %path.display(), "Report written");
    }
    println!("{json}");
    Ok(())
}
