//! The generational execution engine.
//!
//! - [`Strategy`]: what to run (operators, counts, seed)
//! - [`Environment`]: what to run it against (gene pool, fitness function)
//! - [`Callback`]: who watches ([`BestWorst`], [`Diversity`])
//!
//! ```text
//! generation 0: create → evaluate → callbacks
//! generation g: select → mutate → reproduce → evaluate offspring
//!               → integrate → migrate (demes only) → callbacks
//! ```

mod callback;
mod environment;
mod strategy;

pub use callback::{BestWorst, Callback, Diversity, Snapshot};
pub use environment::{fitness, Environment, EvolutionResult, FitnessFn, FitnessFunction};
pub use strategy::{Strategy, StrategyBuilder};
