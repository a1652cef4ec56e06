//! Generic evolutionary search.
//!
//! [`GeneticAlgorithm`] maintains a score-sorted population of arbitrary
//! candidates and advances it generation by generation; the candidate
//! representation and its operators are supplied through the
//! [`GeneticHelper`] strategy trait. Scores are minimized.

mod engine;
mod types;

pub use engine::GeneticAlgorithm;
pub use types::GeneticHelper;
