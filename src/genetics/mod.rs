//! Gene encodings and individuals.
//!
//! An [`Individual`] is a fixed-length sequence of genes plus optional
//! hidden genes (self-adaptive strategy parameters) and a cached fitness.
//! A [`GenePool`] is the factory that knows the encoding: how many genes,
//! which values they may take, and how to draw random individuals.
//!
//! # Encodings
//!
//! - [`BoolPool`]: bit strings
//! - [`IntegerPool`]: integers in an inclusive range
//! - [`FloatPool`]: reals in a half-open range, optionally with a step size
//!   hidden gene for self-adaptive mutation

mod gene;
mod individual;
mod pool;

pub use gene::Gene;
pub use individual::Individual;
pub use pool::{BoolPool, FloatPool, GenePool, IntegerPool};
