//! Ordered collection of populations.

use super::population::Population;
use crate::error::{EvolutionError, Result};
use crate::genetics::Gene;
use std::ops::{Index, IndexMut};

/// An ordered collection of populations, one per deme.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Community<G> {
    populations: Vec<Population<G>>,
}

impl<G> Default for Community<G> {
    fn default() -> Self {
        Self {
            populations: Vec::new(),
        }
    }
}

impl<G: Gene> Community<G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Population<G>> {
        self.populations.get(index)
    }

    pub fn push(&mut self, population: Population<G>) {
        self.populations.push(population);
    }

    /// Appends all populations of `other`, keeping their order.
    pub fn integrate(&mut self, other: Community<G>) {
        self.populations.extend(other.populations);
    }

    /// Copies the populations at `indices`, in that order.
    ///
    /// # Errors
    /// `InvalidBatch` if an index is out of range.
    pub fn subset(&self, indices: &[usize]) -> Result<Community<G>> {
        indices
            .iter()
            .map(|&index| {
                self.populations
                    .get(index)
                    .cloned()
                    .ok_or(EvolutionError::InvalidBatch {
                        index,
                        len: self.len(),
                    })
            })
            .collect()
    }

    /// Concatenates all populations into one.
    pub fn flatten(self) -> Population<G> {
        let mut merged = Population::new();
        for population in self.populations {
            merged.integrate(population);
        }
        merged
    }

    /// Total number of individuals over all populations.
    pub fn total_individuals(&self) -> usize {
        self.populations.iter().map(Population::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Population<G>> {
        self.populations.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Population<G>> {
        self.populations.iter_mut()
    }

    pub fn into_vec(self) -> Vec<Population<G>> {
        self.populations
    }
}

impl<G> From<Vec<Population<G>>> for Community<G> {
    fn from(populations: Vec<Population<G>>) -> Self {
        Self { populations }
    }
}

impl<G> From<Population<G>> for Community<G> {
    fn from(population: Population<G>) -> Self {
        Self {
            populations: vec![population],
        }
    }
}

impl<G> FromIterator<Population<G>> for Community<G> {
    fn from_iter<I: IntoIterator<Item = Population<G>>>(iter: I) -> Self {
        Self {
            populations: iter.into_iter().collect(),
        }
    }
}

impl<G> IntoIterator for Community<G> {
    type Item = Population<G>;
    type IntoIter = std::vec::IntoIter<Population<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.populations.into_iter()
    }
}

impl<G> Index<usize> for Community<G> {
    type Output = Population<G>;

    fn index(&self, index: usize) -> &Population<G> {
        &self.populations[index]
    }
}

impl<G> IndexMut<usize> for Community<G> {
    fn index_mut(&mut self, index: usize) -> &mut Population<G> {
        &mut self.populations[index]
    }
}
