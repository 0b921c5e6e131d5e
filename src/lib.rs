//! Evolutionary computation with composable operators.
//!
//! Candidate solutions ([`Individual`](genetics::Individual)s) are bred
//! over generations by operators that all share one shape: an
//! [`Operator`](operators::Operator) splits its input into batches with an
//! [`IterationType`](operators::IterationType) and transforms each batch.
//! The same operator works on a flat [`Population`](container::Population)
//! and on a [`Community`](container::Community) of populations (demes).
//!
//! - [`genetics`]: genes, individuals and gene pools (bit, integer, real encodings)
//! - [`container`]: populations and communities
//! - [`operators`]: iteration types, the operator trait, chains, and the
//!   selection / mutation / reproduction / integration / migration catalogue
//! - [`engine`]: strategies, the generation loop, and callbacks
//! - [`random`]: the explicitly owned random source
//!
//! # Example
//!
//! ```
//! use u_evolution::engine::{fitness, BestWorst, Environment, Strategy};
//! use u_evolution::genetics::{Individual, IntegerPool};
//! use u_evolution::operators::{integration, mutation, reproduction, selection};
//!
//! const TARGET: [i64; 5] = [4, 74, 43, 23, 0];
//!
//! let environment = Environment::new(
//!     IntegerPool::new(5, 0, 100).unwrap(),
//!     fitness(|ind: &Individual<i64>| {
//!         let mse = ind
//!             .genes()
//!             .iter()
//!             .zip(TARGET)
//!             .map(|(&g, t)| ((g - t) as f64).powi(2))
//!             .sum::<f64>()
//!             / TARGET.len() as f64;
//!         -mse
//!     }),
//! );
//!
//! let strategy = Strategy::builder()
//!     .with_init_individuals(100)
//!     .with_generations(30)
//!     .with_selection(selection::Tournament::new(4).unwrap())
//!     .with_mutation(mutation::UniformInt::new(0.1, 0, 100).unwrap())
//!     .with_reproduction(reproduction::Crossover::new(1, 0.7).unwrap())
//!     .with_integration(integration::Crowded::new(10).unwrap())
//!     .with_seed(42)
//!     .build()
//!     .unwrap();
//!
//! let mut tracker = BestWorst::new();
//! let result = environment.execute(&strategy, &mut [&mut tracker]).unwrap();
//! assert!(result.best_fitness().unwrap() >= tracker.best_fitness()[0]);
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluate fitness on the rayon thread pool
//!   (`Strategy::builder().with_parallel(true)`)
//! - `serde`: `Serialize`/`Deserialize` for individuals, containers and pools

pub mod container;
pub mod engine;
pub mod error;
pub mod genetics;
pub mod operators;
pub mod random;

#[cfg(test)]
mod testing;

pub use error::{EvolutionError, FitnessError, Result};
