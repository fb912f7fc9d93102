//! `silent-investigator judge`: grade one predicted result.

use std::path::Path;

use investigator_agent::setup;
use investigator_core::result::StructuredResult;
use investigator_judge::{ResponseGrader, judge_prompt, parse_structured_output};

pub async fn run(
    config: Option<&Path>,
    predicted: &Path,
    expected: &Path,
    rubric: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config)?;

    let predicted = parse_structured_output(&super::read_text(predicted)?)?;
    let expected: StructuredResult = serde_json::from_str(&super::read_text(expected)?)?;

    if rubric {
        print!("{}", judge_prompt(&predicted, &expected));
        return Ok(());
    }

    let grade = ResponseGrader::new(setup::grading_rules(&config.judge)).grade(&predicted, &expected);
    println!("{}", serde_json::to_string_pretty(&grade)?);
    Ok(())
}
