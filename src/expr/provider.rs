//! Variable resolution.
//!
//! An [`ArgumentProvider`] maps variable names to numeric values.
//! Providers compose by reference: [`Fallback`] chains any number of
//! providers with earlier entries shadowing later ones, and
//! [`SingleVariable`] is the one mutable provider, made for sweeping a
//! single variable across many evaluations without reallocating.

use crate::error::{ExprError, Result};

/// A queryable set of variable bindings.
///
/// # Examples
///
/// ```
/// use evofit::expr::{ArgumentProvider, Fallback, SingleVariable};
///
/// let x = SingleVariable::new("x", 1.0);
/// let y = SingleVariable::new("y", 2.0);
/// let scope = Fallback::new(vec![&x, &y]);
/// assert!(scope.has("y"));
/// assert_eq!(scope.get("x").unwrap(), 1.0);
/// ```
pub trait ArgumentProvider: std::fmt::Debug {
    /// Whether this provider holds a binding for `name`.
    fn has(&self, name: &str) -> bool;

    /// The value bound to `name`.
    ///
    /// Fails with [`ExprError::MissingBinding`] whenever
    /// [`has`](ArgumentProvider::has) is false for `name`.
    fn get(&self, name: &str) -> Result<f64>;
}

/// A single mutable `(name, value)` binding.
///
/// [`set`](SingleVariable::set) rebinds the value in place, so one
/// instance can drive an entire grid sweep.
#[derive(Debug, Clone)]
pub struct SingleVariable {
    name: String,
    value: f64,
}

impl SingleVariable {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Rebinds the value in place.
    pub fn set(&mut self, value: f64) {
        self.value = value;
    }
}

impl ArgumentProvider for SingleVariable {
    fn has(&self, name: &str) -> bool {
        name == self.name
    }

    fn get(&self, name: &str) -> Result<f64> {
        if name == self.name {
            Ok(self.value)
        } else {
            Err(ExprError::MissingBinding(name.to_string()))
        }
    }
}

/// An ordered chain of borrowed providers.
///
/// Lookup walks the chain front to back and stops at the first provider
/// holding the name, so earlier providers shadow later ones. The chain
/// borrows its members; the same underlying bindings can back any number
/// of chains.
#[derive(Debug)]
pub struct Fallback<'a> {
    providers: Vec<&'a dyn ArgumentProvider>,
}

impl<'a> Fallback<'a> {
    pub fn new(providers: Vec<&'a dyn ArgumentProvider>) -> Self {
        Self { providers }
    }
}

impl ArgumentProvider for Fallback<'_> {
    fn has(&self, name: &str) -> bool {
        self.providers.iter().any(|p| p.has(name))
    }

    fn get(&self, name: &str) -> Result<f64> {
        match self.providers.iter().find(|p| p.has(name)) {
            Some(p) => p.get(name),
            None => Err(ExprError::MissingBinding(name.to_string())),
        }
    }
}

/// A provider with no bindings. Neutral default context.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyProvider;

impl ArgumentProvider for EmptyProvider {
    fn has(&self, _name: &str) -> bool {
        false
    }

    fn get(&self, name: &str) -> Result<f64> {
        Err(ExprError::MissingBinding(name.to_string()))
    }
}
