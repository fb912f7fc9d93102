//! `silent-investigator doctor`: diagnose configuration.

use std::path::Path;

use investigator_agent::setup;
use investigator_providers::{build_from_config, default_base_url};

pub async fn run(config: Option<&Path>, ping: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Silent Investigator Doctor");
    println!("==========================\n");

    let mut issues = 0;

    let config_path = super::config_path(config);
    if !config_path.exists() {
        println!("  [warn] No config file at {}; using defaults (run `onboard`)", config_path.display());
        issues += 1;
    }

    let config = match super::load_config(config) {
        Ok(config) => {
            println!("  [ok]   Configuration valid");
            config
        }
        Err(e) => {
            println!("  [fail] Configuration invalid: {e}");
            println!("\n  1 blocking issue found.");
            return Ok(());
        }
    };

    let provider = &config.generator.provider;
    match (&config.generator.api_url, default_base_url(provider)) {
        (Some(url), _) => println!("  [ok]   Generator '{provider}' at {url}"),
        (None, Some(url)) => println!("  [ok]   Generator '{provider}' at {url}"),
        (None, None) => {
            println!("  [fail] Generator '{provider}' has no known endpoint; set generator.api_url");
            issues += 1;
        }
    }

    if config.has_api_key() {
        println!("  [ok]   API key configured");
    } else {
        println!("  [warn] No API key; export GEMINI_API_KEY or INVESTIGATOR_API_KEY");
        issues += 1;
    }

    match setup::selector(&config) {
        Ok(selector) => println!(
            "  [ok]   Example library: {} entries, {} rules, {:?} selection",
            selector.library().len(),
            selector.library().rules.len(),
            selector.policy()
        ),
        Err(e) => {
            println!("  [fail] Example library: {e}");
            issues += 1;
        }
    }

    if ping {
        match build_from_config(&config.generator) {
            Ok(generator) => match generator.health_check().await {
                Ok(true) => println!("  [ok]   Generator reachable"),
                Ok(false) => {
                    println!("  [fail] Generator not reachable");
                    issues += 1;
                }
                Err(e) => {
                    println!("  [fail] Generator check failed: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  [fail] {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
