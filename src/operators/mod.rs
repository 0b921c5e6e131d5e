//! Operators: the building blocks of an evolution strategy.
//!
//! Every stage of a generation (selection, mutation, reproduction,
//! integration, migration) is an [`Operator`]. An operator pairs an
//! [`IterationType`], which decides how its input is split into batches,
//! with hooks that transform a batch. Operators compose into an
//! [`OperatorChain`].
//!
//! | Module | Operators |
//! |--------|-----------|
//! | [`selection`] | [`Tournament`](selection::Tournament) |
//! | [`mutation`] | [`BitFlip`](mutation::BitFlip), [`UniformInt`](mutation::UniformInt), [`UniformFloat`](mutation::UniformFloat), [`NormalDist`](mutation::NormalDist) |
//! | [`reproduction`] | [`Crossover`](reproduction::Crossover) |
//! | [`integration`] | [`Crowded`](integration::Crowded), [`Generational`](integration::Generational) |
//! | [`migration`] | [`Migration`](migration::Migration) |

mod chain;
mod iteration;
mod operator;

pub mod integration;
pub mod migration;
pub mod mutation;
pub mod reproduction;
pub mod selection;

pub use chain::{ChainStep, OperatorChain};
pub use iteration::{BatchIteration, Batches, IterationType, SingleIteration, WholeIteration};
pub use operator::{Context, Identity, Operator};
