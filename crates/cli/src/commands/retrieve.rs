//! `silent-investigator retrieve`: rank text files against a query.

use std::path::{Path, PathBuf};

use investigator_agent::setup;
use investigator_retrieval::VectorStore;
use serde_json::json;

pub async fn run(
    config: Option<&Path>,
    query: &str,
    docs: &[PathBuf],
    top_k: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config)?;

    let texts = docs
        .iter()
        .map(|p| super::read_text(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut store = VectorStore::new(setup::embedder(&config.embedding)?);
    store.index_documents(texts)?;

    let hits: Vec<_> = store
        .retrieve(query, top_k)?
        .into_iter()
        .map(|hit| {
            json!({
                "index": hit.index,
                "path": docs[hit.index].display().to_string(),
                "score": hit.score,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&hits)?);
    Ok(())
}
