//! Composable expression evaluation and generic evolutionary search.
//!
//! Two coupled subsystems:
//!
//! - **Expressions** ([`expr`]): immutable arithmetic-expression trees
//!   over named variables, resolved through composable argument
//!   providers with scoped rebinding, plus numeric approximation —
//!   discretized integration and normalized correlation of two
//!   expressions over an interval.
//! - **Evolution** ([`evolve`]): a generic generational search engine
//!   that optimizes a population of arbitrary candidates through a
//!   pluggable creation/mutation/crossover/scoring strategy.
//!
//! # Architecture
//!
//! The two halves meet only in the caller: a target expression plus a
//! [`evolve::GeneticHelper`] whose `score` measures candidates against
//! the target (typically via [`expr::product`]) turn the engine into a
//! function-approximation search. The engine knows nothing about
//! expressions; expressions know nothing about evolution.
//!
//! Randomness is injected everywhere as `&mut impl rand::Rng`; nothing
//! in this crate constructs its own generator. Recoverable failures are
//! typed variants of [`error::ExprError`]; contract violations panic at
//! the offending constructor.

pub mod error;
pub mod evolve;
pub mod expr;
