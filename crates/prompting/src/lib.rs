//! Prompt construction for Silent Investigator.
//!
//! Picks a zero/one/multi-shot strategy from document length, selects
//! few-shot examples from a fixed library (keyword rules or embedding
//! similarity), and renders the final prompt text.
//!
//! # Flow
//!
//! 1. [`choose_strategy`] counts words and picks a [`Strategy`]
//! 2. [`ExampleSelector`] picks up to the strategy's example count
//! 3. [`PromptAssembler`] renders instruction + examples + task block

pub mod assembler;
pub mod library;
pub mod selector;
pub mod strategy;

pub use assembler::{PromptAssembler, SYSTEM_PROMPT};
pub use library::{DomainRule, ExampleEntry, ExampleLibrary, LibraryError};
pub use selector::{ExampleSelector, Selection, SelectionPolicy};
pub use strategy::{Strategy, StrategyConfig, choose_strategy, word_count};
