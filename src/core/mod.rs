//! Core domain logic: grammar correction and text normalization.

pub mod grammar;
pub mod normalizer;

pub use grammar::{GrammarModel, OllamaGrammar};
pub use normalizer::Normalizer;
