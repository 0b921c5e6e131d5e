//! Ordered collection of individuals.

use crate::error::{EvolutionError, Result};
use crate::genetics::{Gene, Individual};
use std::ops::{Index, IndexMut};

/// An ordered, growable collection of individuals.
///
/// Insertion order is significant: operators integrate their batch results
/// in the order the batches were produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population<G> {
    individuals: Vec<Individual<G>>,
}

impl<G> Default for Population<G> {
    fn default() -> Self {
        Self {
            individuals: Vec::new(),
        }
    }
}

impl<G: Gene> Population<G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Individual<G>> {
        self.individuals.get(index)
    }

    pub fn push(&mut self, individual: Individual<G>) {
        self.individuals.push(individual);
    }

    /// Appends all individuals of `other`, keeping their order.
    pub fn integrate(&mut self, other: Population<G>) {
        self.individuals.extend(other.individuals);
    }

    /// Copies the individuals at `indices`, in that order.
    ///
    /// # Errors
    /// `InvalidBatch` if an index is out of range.
    pub fn subset(&self, indices: &[usize]) -> Result<Population<G>> {
        indices
            .iter()
            .map(|&index| {
                self.individuals
                    .get(index)
                    .cloned()
                    .ok_or(EvolutionError::InvalidBatch {
                        index,
                        len: self.len(),
                    })
            })
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual<G>> {
        self.individuals.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Individual<G>> {
        self.individuals.iter_mut()
    }

    pub fn as_slice(&self) -> &[Individual<G>] {
        &self.individuals
    }

    /// Index of the fittest individual; first one wins ties.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, ind) in self.individuals.iter().enumerate() {
            match best {
                Some(b) if !ind.is_fitter_than(&self.individuals[b]) => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Index of the least fit individual; first one wins ties.
    pub fn worst_index(&self) -> Option<usize> {
        let mut worst: Option<usize> = None;
        for (i, ind) in self.individuals.iter().enumerate() {
            match worst {
                Some(w) if !self.individuals[w].is_fitter_than(ind) => {}
                _ => worst = Some(i),
            }
        }
        worst
    }

    pub fn best(&self) -> Option<&Individual<G>> {
        self.best_index().map(|i| &self.individuals[i])
    }

    pub fn worst(&self) -> Option<&Individual<G>> {
        self.worst_index().map(|i| &self.individuals[i])
    }

    /// Replaces the individual at `index`, returning the old one.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn replace(&mut self, index: usize, individual: Individual<G>) -> Individual<G> {
        std::mem::replace(&mut self.individuals[index], individual)
    }

    /// Indices sorted from fittest to least fit (stable).
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.individuals[b].cmp_fitness(&self.individuals[a]));
        order
    }

    pub fn into_vec(self) -> Vec<Individual<G>> {
        self.individuals
    }
}

impl<G> From<Vec<Individual<G>>> for Population<G> {
    fn from(individuals: Vec<Individual<G>>) -> Self {
        Self { individuals }
    }
}

impl<G> From<Individual<G>> for Population<G> {
    fn from(individual: Individual<G>) -> Self {
        Self {
            individuals: vec![individual],
        }
    }
}

impl<G> FromIterator<Individual<G>> for Population<G> {
    fn from_iter<I: IntoIterator<Item = Individual<G>>>(iter: I) -> Self {
        Self {
            individuals: iter.into_iter().collect(),
        }
    }
}

impl<G> IntoIterator for Population<G> {
    type Item = Individual<G>;
    type IntoIter = std::vec::IntoIter<Individual<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<'a, G> IntoIterator for &'a Population<G> {
    type Item = &'a Individual<G>;
    type IntoIter = std::slice::Iter<'a, Individual<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

impl<G> Index<usize> for Population<G> {
    type Output = Individual<G>;

    fn index(&self, index: usize) -> &Individual<G> {
        &self.individuals[index]
    }
}

impl<G> IndexMut<usize> for Population<G> {
    fn index_mut(&mut self, index: usize) -> &mut Individual<G> {
        &mut self.individuals[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(fitness: &[f64]) -> Population<i64> {
        fitness
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let mut ind = Individual::new(vec![i as i64]);
                ind.set_fitness(f);
                ind
            })
            .collect()
    }

    #[test]
    fn test_integrate_keeps_order() {
        let mut a = scored(&[1.0, 2.0]);
        let b = scored(&[3.0]);
        a.integrate(b);
        let fitness: Vec<_> = a.iter().map(|i| i.fitness().unwrap()).collect();
        assert_eq!(fitness, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_subset() {
        let pop = scored(&[1.0, 2.0, 3.0]);
        let sub = pop.subset(&[2, 0]).unwrap();
        assert_eq!(sub[0].genes(), &[2]);
        assert_eq!(sub[1].genes(), &[0]);
        assert!(matches!(
            pop.subset(&[3]),
            Err(EvolutionError::InvalidBatch { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_best_worst_first_wins_ties() {
        let pop = scored(&[2.0, 5.0, 5.0, -1.0, -1.0]);
        assert_eq!(pop.best_index(), Some(1));
        assert_eq!(pop.worst_index(), Some(3));
        assert_eq!(Population::<i64>::new().best_index(), None);
    }

    #[test]
    fn test_ranking() {
        let pop = scored(&[2.0, 5.0, -1.0]);
        assert_eq!(pop.ranking(), vec![1, 0, 2]);
    }

    #[test]
    fn test_copy_does_not_alias() {
        let pop = scored(&[1.0]);
        let mut copy = pop.clone();
        copy[0].genes_mut()[0] = 42;
        assert_eq!(pop[0].genes(), &[0]);
        assert_eq!(pop[0].fitness(), Some(1.0));
    }
}
