//! Generator implementations for Silent Investigator.
//!
//! All generators implement the `investigator_core::Generator` trait.
//! [`build_from_config`] picks one from the `[generator]` config section.

mod http;

pub mod gemini;
pub mod openai_compat;
pub mod router;

pub use gemini::GeminiGenerator;
pub use openai_compat::OpenAiCompatGenerator;
pub use router::{build_from_config, default_base_url};
