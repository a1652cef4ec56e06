//! Strategy contract for the evolutionary engine.
//!
//! [`GeneticHelper`] is the single trait a user implements to plug a
//! candidate representation into [`GeneticAlgorithm`](super::GeneticAlgorithm).
//! It covers creation, mutation, crossover, and scoring; the engine owns
//! everything else (population, ordering, generational composition).

use rand::Rng;
use std::time::Duration;

/// Defines how candidates of one type are created, varied, and scored.
///
/// All operators return fresh candidates; the engine never mutates a
/// candidate in place, so a candidate handed to `mutate` or `cross` may
/// simultaneously be a parent for other offspring in the same generation.
///
/// Lower scores are better (minimization). Orient the fitness function
/// accordingly.
///
/// # Purity
///
/// `score` must be a pure read of the candidate: the engine caches scores
/// across generations (elites carry theirs forward) and may evaluate
/// candidates in parallel, so any hidden state would produce inconsistent
/// orderings. The operators may draw from `rng` but must not touch other
/// shared state.
///
/// # Implementing
///
/// ```ignore
/// struct FitScalar { target: f64 }
///
/// impl GeneticHelper for FitScalar {
///     type Candidate = f64;
///
///     fn new_instance<R: Rng>(&self, rng: &mut R) -> f64 {
///         rng.random_range(-100.0..100.0)
///     }
///     fn mutate<R: Rng>(&self, c: &f64, rng: &mut R) -> f64 {
///         c + rng.random_range(-1.0..1.0)
///     }
///     fn cross<R: Rng>(&self, left: &f64, right: &f64, _rng: &mut R) -> f64 {
///         (left + right) / 2.0
///     }
///     fn score(&self, c: &f64) -> f64 {
///         (c - self.target).abs()
///     }
/// }
/// ```
pub trait GeneticHelper: Send + Sync {
    /// The candidate (solution) type this strategy operates on.
    type Candidate: Send;

    /// Creates a fresh random candidate for the initial population.
    fn new_instance<R: Rng>(&self, rng: &mut R) -> Self::Candidate;

    /// Produces a perturbed copy of `instance`.
    fn mutate<R: Rng>(&self, instance: &Self::Candidate, rng: &mut R) -> Self::Candidate;

    /// Produces one offspring by recombining two parents.
    ///
    /// The engine's composition policy is asymmetric: in the biased block
    /// of each generation, `left` is always one of the current elite.
    fn cross<R: Rng>(
        &self,
        left: &Self::Candidate,
        right: &Self::Candidate,
        rng: &mut R,
    ) -> Self::Candidate;

    /// Scores a candidate. Lower is better.
    fn score(&self, instance: &Self::Candidate) -> f64;

    /// Called once at the end of each generation.
    ///
    /// Useful for progress reporting or adaptive control. The default
    /// implementation is a no-op.
    fn on_generation(&self, _generation: usize, _elapsed: Duration, _best_score: f64) {}
}
