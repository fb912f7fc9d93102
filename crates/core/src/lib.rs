//! # Silent Investigator Core
//!
//! Domain types, traits, and error definitions for the Silent Investigator.
//! This crate has **no framework dependencies**: it defines the structured
//! result model and the two external collaborator seams that every other
//! crate implements against.
//!
//! ## Collaborators
//!
//! - [`Embedder`] turns texts into fixed-dimension vectors (synchronous).
//! - [`Generator`] turns a prompt into a text completion (async, may fail).

pub mod embedder;
pub mod error;
pub mod generator;
pub mod result;

// Re-export key types at crate root for ergonomics
pub use embedder::Embedder;
pub use error::{Error, GenerationError, RetrievalError, Result};
pub use generator::{Completion, GenerationOutcome, GenerationRequest, Generator};
pub use result::{MissingFieldEntry, Priority, StructuredResult};
