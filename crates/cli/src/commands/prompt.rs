//! `silent-investigator prompt`: print the assembled prompt.

use std::path::Path;

use investigator_agent::setup;
use investigator_prompting::SYSTEM_PROMPT;

pub async fn run(
    config: Option<&Path>,
    file: &Path,
    system: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config)?;
    let document = super::read_text(file)?;

    let selection = setup::selector(&config)?.select(&document)?;
    let prompt = setup::assembler(&config.prompting).assemble(selection.strategy, &selection.examples, &document);

    if system {
        println!("{SYSTEM_PROMPT}");
    }
    print!("{prompt}");
    Ok(())
}
