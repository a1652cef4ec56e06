//! The generational update loop.
//!
//! [`GeneticAlgorithm`] maintains a score-sorted population of candidates
//! and advances it through generations with a fixed composition policy
//! biased toward the current elite.

use log::debug;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::Instant;

use super::types::GeneticHelper;

/// Number of individuals treated as the elite: carried through each
/// generation unmodified, and the width of each biased operator block.
const ELITE: usize = 5;

/// A generic evolutionary search over candidates of one type.
///
/// Construction builds and scores generation 0; [`train`](Self::train)
/// advances the population; [`best`](Self::best) borrows the current
/// front-runner. The population is kept sorted ascending by score at all
/// times (lower is better).
///
/// # Generational composition
///
/// Each generation replaces the population wholesale with exactly
/// `population_size` individuals:
///
/// - 5 mutants of the current top 5,
/// - 5 crosses of each top-5 member with a uniformly random member of
///   the whole current population,
/// - `population_size - 15` crosses of two independently chosen uniform
///   random members,
/// - the top 5 carried through unmodified with their cached scores.
///
/// Random member selection draws a uniform index over the entire current
/// population with a half-open range, so a draw can never be out of
/// bounds. Because elites keep their candidates and scores, the best
/// score never worsens across generations.
pub struct GeneticAlgorithm<H: GeneticHelper, R: Rng> {
    population_size: usize,
    helper: H,
    rng: R,
    /// Sorted ascending by score.
    population: Vec<(H::Candidate, f64)>,
    generation: usize,
}

impl<H: GeneticHelper, R: Rng> GeneticAlgorithm<H, R> {
    /// Builds and scores generation 0.
    ///
    /// # Panics
    ///
    /// Panics if `population_size < 15`: the composition policy needs
    /// room for 5 elites, 5 mutants, and 5 elite crosses.
    pub fn new(population_size: usize, helper: H, mut rng: R) -> Self {
        assert!(
            population_size >= 3 * ELITE,
            "population_size must be at least {}, got {population_size}",
            3 * ELITE
        );
        let mut population: Vec<(H::Candidate, f64)> = (0..population_size)
            .map(|_| {
                let candidate = helper.new_instance(&mut rng);
                let score = helper.score(&candidate);
                (candidate, score)
            })
            .collect();
        sort_by_score(&mut population);

        Self {
            population_size,
            helper,
            rng,
            population,
            generation: 0,
        }
    }

    /// Advances the population by `epochs` generations.
    pub fn train(&mut self, epochs: usize) {
        for _ in 0..epochs {
            self.step();
        }
    }

    fn step(&mut self) {
        let start = Instant::now();
        let n = self.population.len();

        let mut offspring: Vec<H::Candidate> = Vec::with_capacity(self.population_size - ELITE);

        // mutants of the current elite
        for i in 0..ELITE {
            offspring.push(self.helper.mutate(&self.population[i].0, &mut self.rng));
        }
        // each elite crossed with a random member of the whole population
        for i in 0..ELITE {
            let j = self.rng.random_range(0..n);
            offspring.push(
                self.helper
                    .cross(&self.population[i].0, &self.population[j].0, &mut self.rng),
            );
        }
        // the remaining slots are pure exploration: random x random
        for _ in 0..self.population_size - 3 * ELITE {
            let a = self.rng.random_range(0..n);
            let b = self.rng.random_range(0..n);
            offspring.push(
                self.helper
                    .cross(&self.population[a].0, &self.population[b].0, &mut self.rng),
            );
        }

        let mut next = score_offspring(&self.helper, offspring);

        // elites carry their cached scores; the rest of the retired
        // population is dropped with it
        let retired = std::mem::take(&mut self.population);
        next.extend(retired.into_iter().take(ELITE));

        sort_by_score(&mut next);
        self.population = next;
        self.generation += 1;

        let elapsed = start.elapsed();
        let best_score = self.population[0].1;
        debug!(
            "generation {}: {} ms, best score {best_score}",
            self.generation,
            elapsed.as_millis()
        );
        self.helper.on_generation(self.generation, elapsed, best_score);
    }

    /// Borrows the best-scoring candidate.
    ///
    /// The borrow is tied to `&self`: the backing population is replaced
    /// wholesale by [`train`](Self::train), so the reference cannot be
    /// held across it. The population is never empty after construction.
    pub fn best(&self) -> &H::Candidate {
        &self.population[0].0
    }

    /// Score of the best candidate.
    pub fn best_score(&self) -> f64 {
        self.population[0].1
    }

    /// Number of generations applied so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Scores of the whole population, best first.
    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.population.iter().map(|(_, score)| *score)
    }
}

fn sort_by_score<C>(population: &mut [(C, f64)]) {
    population.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
}

#[cfg(feature = "parallel")]
fn score_offspring<H: GeneticHelper>(
    helper: &H,
    offspring: Vec<H::Candidate>,
) -> Vec<(H::Candidate, f64)> {
    offspring
        .into_par_iter()
        .map(|candidate| {
            let score = helper.score(&candidate);
            (candidate, score)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_offspring<H: GeneticHelper>(
    helper: &H,
    offspring: Vec<H::Candidate>,
) -> Vec<(H::Candidate, f64)> {
    offspring
        .into_iter()
        .map(|candidate| {
            let score = helper.score(&candidate);
            (candidate, score)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{product, EmptyProvider, Expression};
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // ---- one-dimensional fitting: minimize |value - target| ----

    struct FitScalar {
        target: f64,
    }

    impl GeneticHelper for FitScalar {
        type Candidate = f64;

        fn new_instance<R: Rng>(&self, rng: &mut R) -> f64 {
            rng.random_range(-100.0..100.0)
        }

        fn mutate<R: Rng>(&self, c: &f64, rng: &mut R) -> f64 {
            c + rng.random_range(-1.0..1.0)
        }

        fn cross<R: Rng>(&self, left: &f64, right: &f64, _rng: &mut R) -> f64 {
            (left + right) / 2.0
        }

        fn score(&self, c: &f64) -> f64 {
            (c - self.target).abs()
        }
    }

    fn assert_sorted_ascending(ga: &GeneticAlgorithm<FitScalar, StdRng>) {
        let scores: Vec<f64> = ga.scores().collect();
        for window in scores.windows(2) {
            assert!(
                window[0] <= window[1],
                "population must stay sorted ascending: {} > {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_construction_scores_and_sorts() {
        let ga = GeneticAlgorithm::new(30, FitScalar { target: 42.0 }, StdRng::seed_from_u64(42));

        assert_eq!(ga.generation(), 0);
        assert_eq!(ga.scores().count(), 30);
        assert_sorted_ascending(&ga);
    }

    #[test]
    fn test_population_stays_sorted_and_sized_across_training() {
        let mut ga =
            GeneticAlgorithm::new(30, FitScalar { target: 42.0 }, StdRng::seed_from_u64(42));

        for _ in 0..10 {
            ga.train(1);
            assert_eq!(ga.scores().count(), 30);
            assert_sorted_ascending(&ga);
        }
        assert_eq!(ga.generation(), 10);
    }

    #[test]
    fn test_best_is_no_worse_than_every_member() {
        let mut ga =
            GeneticAlgorithm::new(20, FitScalar { target: 0.0 }, StdRng::seed_from_u64(7));
        ga.train(5);

        let best = ga.best_score();
        assert!(ga.scores().all(|s| best <= s));
        assert_eq!(ga.best_score(), (ga.best() - 0.0).abs());
    }

    #[test]
    fn test_best_score_never_worsens() {
        init_logging();
        let mut ga =
            GeneticAlgorithm::new(30, FitScalar { target: 42.0 }, StdRng::seed_from_u64(42));

        let mut previous = ga.best_score();
        for _ in 0..20 {
            ga.train(1);
            let current = ga.best_score();
            assert!(
                current <= previous,
                "elitism must keep the best: {current} > {previous}"
            );
            previous = current;
        }
    }

    #[test]
    fn test_convergence_toward_target() {
        let mut ga =
            GeneticAlgorithm::new(30, FitScalar { target: 42.0 }, StdRng::seed_from_u64(42));
        ga.train(50);

        assert!(
            ga.best_score() < 1.0,
            "expected best within 1.0 of target, got {}",
            ga.best_score()
        );
    }

    #[test]
    fn test_minimum_population_size_works() {
        let mut ga =
            GeneticAlgorithm::new(15, FitScalar { target: 0.0 }, StdRng::seed_from_u64(1));
        ga.train(5);
        assert_eq!(ga.scores().count(), 15);
        assert_sorted_ascending(&ga);
    }

    #[test]
    #[should_panic(expected = "population_size must be at least 15")]
    fn test_undersized_population_panics() {
        GeneticAlgorithm::new(14, FitScalar { target: 0.0 }, StdRng::seed_from_u64(1));
    }

    // ---- elitism against destructive operators ----

    struct Saboteur;

    impl GeneticHelper for Saboteur {
        type Candidate = f64;

        fn new_instance<R: Rng>(&self, rng: &mut R) -> f64 {
            rng.random_range(0.0..10.0)
        }

        // every operator makes things strictly worse
        fn mutate<R: Rng>(&self, c: &f64, _rng: &mut R) -> f64 {
            c + 1000.0
        }

        fn cross<R: Rng>(&self, left: &f64, right: &f64, _rng: &mut R) -> f64 {
            left + right + 1000.0
        }

        fn score(&self, c: &f64) -> f64 {
            c.abs()
        }
    }

    #[test]
    fn test_elites_survive_destructive_operators() {
        let mut ga = GeneticAlgorithm::new(20, Saboteur, StdRng::seed_from_u64(3));
        let initial_best = ga.best_score();

        ga.train(10);
        assert_eq!(
            ga.best_score(),
            initial_best,
            "the carried elite must remain the best when all offspring are worse"
        );
    }

    // ---- observer ----

    struct Counting {
        calls: AtomicUsize,
        last_generation: AtomicUsize,
    }

    impl GeneticHelper for Counting {
        type Candidate = f64;

        fn new_instance<R: Rng>(&self, rng: &mut R) -> f64 {
            rng.random_range(-1.0..1.0)
        }

        fn mutate<R: Rng>(&self, c: &f64, _rng: &mut R) -> f64 {
            *c
        }

        fn cross<R: Rng>(&self, left: &f64, _right: &f64, _rng: &mut R) -> f64 {
            *left
        }

        fn score(&self, c: &f64) -> f64 {
            c.abs()
        }

        fn on_generation(&self, generation: usize, _elapsed: Duration, _best_score: f64) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.last_generation.store(generation, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_observer_fires_once_per_generation() {
        let helper = Counting {
            calls: AtomicUsize::new(0),
            last_generation: AtomicUsize::new(0),
        };
        let mut ga = GeneticAlgorithm::new(15, helper, StdRng::seed_from_u64(9));

        ga.train(7);
        // construction is generation 0 and does not notify
        assert_eq!(ga.helper.calls.load(Ordering::Relaxed), 7);
        assert_eq!(ga.helper.last_generation.load(Ordering::Relaxed), 7);
    }

    // ---- evolving expressions against a target ----

    /// Fits `offset + slope * x` to a target expression by cosine
    /// similarity over a sampling grid.
    struct LinearFit {
        target: Expression,
    }

    impl GeneticHelper for LinearFit {
        type Candidate = (f64, f64);

        fn new_instance<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
            (rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
        }

        fn mutate<R: Rng>(&self, c: &(f64, f64), rng: &mut R) -> (f64, f64) {
            (
                c.0 + rng.random_range(-0.1..0.1),
                c.1 + rng.random_range(-0.1..0.1),
            )
        }

        fn cross<R: Rng>(&self, left: &(f64, f64), right: &(f64, f64), rng: &mut R) -> (f64, f64) {
            (
                if rng.random_bool(0.5) { left.0 } else { right.0 },
                if rng.random_bool(0.5) { left.1 } else { right.1 },
            )
        }

        fn score(&self, c: &(f64, f64)) -> f64 {
            let candidate = Expression::binary(
                |a, b| a + b,
                Expression::constant(c.0),
                Expression::binary(
                    |a, b| a * b,
                    Expression::constant(c.1),
                    Expression::variable("x"),
                ),
            );
            match product(&self.target, &candidate, 0.0, 1.0, 0.1, "x", &EmptyProvider) {
                Ok(similarity) => 1.0 - similarity,
                Err(_) => f64::INFINITY,
            }
        }
    }

    #[test]
    fn test_evolves_expression_toward_target() {
        init_logging();
        let helper = LinearFit {
            target: Expression::variable("x"),
        };
        let mut ga = GeneticAlgorithm::new(30, helper, StdRng::seed_from_u64(42));

        ga.train(60);

        let best = ga.best_score();
        assert!(best < 0.05, "expected near-perfect similarity, got {best}");
        let (_, slope) = *ga.best();
        assert!(slope > 0.0, "a positively correlated fit needs a positive slope");
    }
}
