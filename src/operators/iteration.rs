//! Iteration types: how an operator walks through a container.
//!
//! An iteration type never looks at individuals. Given the kind and length
//! of a container it yields a lazy, finite sequence of index batches;
//! calling [`IterationType::batches`] again restarts the sequence. The
//! operator copies each batch out of its input and hands it to the
//! matching hook, so the input itself is never modified.

use crate::container::ContainerKind;
use crate::error::{EvolutionError, Result};
use std::fmt;

/// A lazy sequence of index batches.
pub type Batches = Box<dyn Iterator<Item = Vec<usize>> + Send>;

/// Policy that splits a container into batches.
pub trait IterationType: Send + Sync + fmt::Debug {
    /// Human-readable name, used in diagnostics.
    fn name(&self) -> &str;

    /// Whether this policy can iterate over the given container kind.
    ///
    /// Operators refuse to run with a `TypeMismatch` when this is false.
    fn supports(&self, _kind: ContainerKind) -> bool {
        true
    }

    /// Splits a container of `len` elements into index batches.
    fn batches(&self, kind: ContainerKind, len: usize) -> Batches;
}

/// One batch per element: single-individual populations, or
/// single-population communities. The default for every operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleIteration;

impl IterationType for SingleIteration {
    fn name(&self) -> &str {
        "SingleIteration"
    }

    fn batches(&self, _kind: ContainerKind, len: usize) -> Batches {
        Box::new((0..len).map(|i| vec![i]))
    }
}

/// The whole container as one batch.
///
/// Needed by operators that compare individuals with each other, such as
/// tournament selection or crowding integration. An empty container yields
/// no batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WholeIteration;

impl IterationType for WholeIteration {
    fn name(&self) -> &str {
        "WholeIteration"
    }

    fn batches(&self, _kind: ContainerKind, len: usize) -> Batches {
        if len == 0 {
            return Box::new(std::iter::empty());
        }
        Box::new(std::iter::once((0..len).collect()))
    }
}

/// Consecutive groups of a fixed size; the last group may be shorter.
///
/// `BatchIteration::new(2)` feeds parent pairs to crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchIteration {
    size: usize,
}

impl BatchIteration {
    /// # Errors
    /// `InvalidParameter` if `size == 0`.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(EvolutionError::InvalidParameter {
                name: "batch_size",
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self { size })
    }

    pub(crate) const PAIRS: BatchIteration = BatchIteration { size: 2 };

    pub fn size(&self) -> usize {
        self.size
    }
}

impl IterationType for BatchIteration {
    fn name(&self) -> &str {
        "BatchIteration"
    }

    fn batches(&self, _kind: ContainerKind, len: usize) -> Batches {
        let size = self.size;
        Box::new((0..len).step_by(size).map(move |start| {
            let end = (start + size).min(len);
            (start..end).collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(it: &dyn IterationType, len: usize) -> Vec<Vec<usize>> {
        it.batches(ContainerKind::Population, len).collect()
    }

    #[test]
    fn test_single() {
        assert_eq!(collect(&SingleIteration, 3), vec![vec![0], vec![1], vec![2]]);
        assert!(collect(&SingleIteration, 0).is_empty());
    }

    #[test]
    fn test_whole() {
        assert_eq!(collect(&WholeIteration, 3), vec![vec![0, 1, 2]]);
        assert!(collect(&WholeIteration, 0).is_empty());
    }

    #[test]
    fn test_batch() {
        let it = BatchIteration::new(2).unwrap();
        assert_eq!(collect(&it, 5), vec![vec![0, 1], vec![2, 3], vec![4]]);
        assert!(BatchIteration::new(0).is_err());
    }

    #[test]
    fn test_restartable() {
        let it = BatchIteration::new(3).unwrap();
        let first = collect(&it, 7);
        let second = collect(&it, 7);
        assert_eq!(first, second);
    }

    #[test]
    fn test_supports_every_kind_by_default() {
        assert!(SingleIteration.supports(ContainerKind::Population));
        assert!(SingleIteration.supports(ContainerKind::Community));
    }
}
