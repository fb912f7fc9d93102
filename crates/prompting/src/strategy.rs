//! Prompting strategy as a pure function of document length.

use serde::{Deserialize, Serialize};

/// How many worked examples accompany the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ZeroShot,
    OneShot,
    MultiShot,
}

impl Strategy {
    /// Label used in prompt text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ZeroShot => "zero-shot",
            Self::OneShot => "one-shot",
            Self::MultiShot => "multi-shot",
        }
    }

    /// Number of examples requested for this strategy.
    pub fn example_count(&self, config: &StrategyConfig) -> usize {
        match self {
            Self::ZeroShot => 0,
            Self::OneShot => config.one_shot_examples,
            Self::MultiShot => config.multi_shot_examples,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Word-count thresholds and per-strategy example counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    /// Fewer words than this → zero-shot.
    pub zero_shot_below: usize,
    /// At least this many words → multi-shot.
    pub multi_shot_from: usize,
    pub one_shot_examples: usize,
    pub multi_shot_examples: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            zero_shot_below: 20,
            multi_shot_from: 100,
            one_shot_examples: 1,
            multi_shot_examples: 2,
        }
    }
}

/// Whitespace-separated word count.
pub fn word_count(document: &str) -> usize {
    document.split_whitespace().count()
}

/// Pick the strategy for `document`.
pub fn choose_strategy(document: &str, config: &StrategyConfig) -> Strategy {
    let words = word_count(document);
    if words < config.zero_shot_below {
        Strategy::ZeroShot
    } else if words < config.multi_shot_from {
        Strategy::OneShot
    } else {
        Strategy::MultiShot
    }
}
