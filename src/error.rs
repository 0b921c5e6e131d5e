//! Error types shared by every layer of the engine.
//!
//! Errors fall into three groups:
//!
//! - **Configuration**: rejected eagerly by constructors and builders.
//! - **Dispatch**: an operator met a container it cannot be applied to.
//! - **Run time**: a fitness function or callback failed; the run is aborted.
//!
//! Nothing in the crate retries. Retry policy belongs to the caller.

use crate::container::ContainerKind;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Failure reported by a user-supplied fitness function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct FitnessError {
    message: String,
}

impl FitnessError {
    /// Creates a fitness error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors produced while configuring or running an evolution.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("invalid bounds: lower={lower}, upper={upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("missing required strategy field: {0}")]
    MissingField(&'static str),

    #[error("iteration type {iteration} cannot iterate over a {kind}")]
    TypeMismatch {
        iteration: String,
        kind: ContainerKind,
    },

    #[error("expected a {expected}, found a {found}")]
    InvalidContainerKind {
        expected: ContainerKind,
        found: ContainerKind,
    },

    #[error("iteration produced index {index} for a container of length {len}")]
    InvalidBatch { index: usize, len: usize },

    #[error("genome shapes differ: {left} genes vs {right} genes")]
    ShapeMismatch { left: usize, right: usize },

    #[error("fitness evaluation failed in generation {generation} for individual {index}: {source}")]
    FitnessEvaluation {
        generation: usize,
        index: usize,
        #[source]
        source: FitnessError,
    },

    #[error("integration expected {expected} demes, found {found}")]
    DemeCountMismatch { expected: usize, found: usize },

    #[error("callback {name} failed: {message}")]
    Callback { name: String, message: String },

    #[error("population is empty")]
    EmptyPopulation,
}

/// Rejects probabilities outside `[0, 1]` (including NaN).
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EvolutionError::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_probability() {
        assert!(check_probability("prob", 0.0).is_ok());
        assert!(check_probability("prob", 1.0).is_ok());
        assert!(check_probability("prob", 0.5).is_ok());
        assert!(check_probability("prob", -0.1).is_err());
        assert!(check_probability("prob", 1.1).is_err());
        assert!(check_probability("prob", f64::NAN).is_err());
    }

    #[test]
    fn test_messages() {
        let err = EvolutionError::InvalidProbability {
            name: "prob",
            value: 2.0,
        };
        assert_eq!(err.to_string(), "prob must be a probability in [0, 1], got 2");

        let err = EvolutionError::InvalidContainerKind {
            expected: ContainerKind::Population,
            found: ContainerKind::Community,
        };
        assert_eq!(err.to_string(), "expected a population, found a community");
    }

    #[test]
    fn test_fitness_error_source() {
        use std::error::Error;
        let err = EvolutionError::FitnessEvaluation {
            generation: 3,
            index: 7,
            source: FitnessError::new("boom"),
        };
        assert!(err.to_string().contains("generation 3"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
    }
}
