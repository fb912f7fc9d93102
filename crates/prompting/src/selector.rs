//! Example selection.
//!
//! Two policies pick few-shot examples for a document:
//!
//! - **Keyword**: the first library rule (in priority order) whose trigger
//!   occurs in the document selects that domain's entries only; with no
//!   match the whole library in declared order is the fallback mix. The
//!   result is then truncated to `count`, and never padded.
//! - **Similarity**: the library documents are indexed into a
//!   [`VectorStore`] and the `count` nearest examples are returned.

use std::sync::Arc;

use investigator_core::embedder::Embedder;
use investigator_core::error::RetrievalError;
use investigator_retrieval::VectorStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::library::{ExampleEntry, ExampleLibrary};
use crate::strategy::{Strategy, StrategyConfig, choose_strategy, word_count};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    #[default]
    Keyword,
    Similarity,
}

impl std::str::FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyword" => Ok(Self::Keyword),
            "similarity" => Ok(Self::Similarity),
            other => Err(format!("unknown selection policy '{other}'")),
        }
    }
}

/// The strategy and examples chosen for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub strategy: Strategy,
    pub policy: SelectionPolicy,
    /// Domain whose rule supplied the examples (keyword policy, at least one example)
    pub matched_domain: Option<String>,
    pub examples: Vec<ExampleEntry>,
}

/// Chooses a strategy and a bounded set of examples for a document.
pub struct ExampleSelector {
    library: Arc<ExampleLibrary>,
    strategy: StrategyConfig,
    policy: SelectionPolicy,
    /// Library documents, indexed in entry order (similarity policy only).
    store: Option<VectorStore>,
}

impl ExampleSelector {
    /// Create a keyword selector over `library`.
    pub fn new(library: Arc<ExampleLibrary>) -> Self {
        Self {
            library,
            strategy: StrategyConfig::default(),
            policy: SelectionPolicy::Keyword,
            store: None,
        }
    }

    /// Set strategy thresholds and example counts.
    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    /// Switch to the similarity policy, indexing the library with `embedder`.
    pub fn with_similarity(mut self, embedder: Arc<dyn Embedder>) -> Result<Self, RetrievalError> {
        let mut store = VectorStore::new(embedder);
        store.index_documents(
            self.library
                .entries
                .iter()
                .map(|e| e.document.clone())
                .collect(),
        )?;
        self.store = Some(store);
        self.policy = SelectionPolicy::Similarity;
        Ok(self)
    }

    pub fn library(&self) -> &ExampleLibrary {
        &self.library
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn strategy_config(&self) -> &StrategyConfig {
        &self.strategy
    }

    pub fn choose_strategy(&self, document: &str) -> Strategy {
        choose_strategy(document, &self.strategy)
    }

    /// Keyword policy: domain match, else full mix; truncated to `count`.
    pub fn select_examples(&self, document: &str, count: usize) -> Vec<ExampleEntry> {
        if count == 0 {
            return Vec::new();
        }

        match self.library.match_domain(document) {
            Some(rule) => self
                .library
                .entries_for(&rule.domain)
                .take(count)
                .cloned()
                .collect(),
            None => self.library.entries.iter().take(count).cloned().collect(),
        }
    }

    /// Similarity policy: the `count` library entries nearest to `document`.
    ///
    /// Falls back to the keyword policy when no store was built.
    pub fn select_similar(
        &self,
        document: &str,
        count: usize,
    ) -> Result<Vec<ExampleEntry>, RetrievalError> {
        let Some(store) = &self.store else {
            return Ok(self.select_examples(document, count));
        };

        let hits = store.retrieve(document, count)?;
        Ok(hits
            .into_iter()
            .filter_map(|h| self.library.entries.get(h.index).cloned())
            .collect())
    }

    /// Choose the strategy and its examples under the configured policy.
    pub fn select(&self, document: &str) -> Result<Selection, RetrievalError> {
        let strategy = self.choose_strategy(document);
        let count = strategy.example_count(&self.strategy);

        let (examples, matched_domain) = match self.policy {
            SelectionPolicy::Keyword => (
                self.select_examples(document, count),
                self.library
                    .match_domain(document)
                    .filter(|_| count > 0)
                    .map(|r| r.domain.clone()),
            ),
            SelectionPolicy::Similarity => (self.select_similar(document, count)?, None),
        };

        debug!(
            words = word_count(document),
            strategy = %strategy,
            policy = ?self.policy,
            domain = matched_domain.as_deref().unwrap_or("mix"),
            examples = examples.len(),
            "Selected examples"
        );

        Ok(Selection {
            strategy,
            policy: self.policy,
            matched_domain,
            examples,
        })
    }
}
