//! A single candidate solution.

use super::gene::Gene;
use std::cmp::Ordering;

/// A candidate solution: genes, hidden genes and a cached fitness.
///
/// The number of genes is fixed for the lifetime of the individual.
/// Mutable access is only given as a slice, and taking it invalidates
/// the cached fitness so the engine re-evaluates the individual.
///
/// Higher fitness is better.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual<G> {
    genes: Vec<G>,
    hidden_genes: Vec<f64>,
    fitness: Option<f64>,
}

impl<G: Gene> Individual<G> {
    /// Creates an unevaluated individual without hidden genes.
    pub fn new(genes: Vec<G>) -> Self {
        Self {
            genes,
            hidden_genes: Vec::new(),
            fitness: None,
        }
    }

    /// Replaces the hidden genes.
    pub fn with_hidden_genes(mut self, hidden: Vec<f64>) -> Self {
        self.hidden_genes = hidden;
        self.fitness = None;
        self
    }

    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    /// Mutable view of the genes. Clears the cached fitness.
    pub fn genes_mut(&mut self) -> &mut [G] {
        self.fitness = None;
        &mut self.genes
    }

    pub fn hidden_genes(&self) -> &[f64] {
        &self.hidden_genes
    }

    /// Mutable access to the hidden genes. Clears the cached fitness.
    ///
    /// Given as a `Vec` so an operator can seed strategy parameters on
    /// individuals that were created without them.
    pub fn hidden_genes_mut(&mut self) -> &mut Vec<f64> {
        self.fitness = None;
        &mut self.hidden_genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Cached fitness, `None` until evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Euclidean distance in gene space.
    ///
    /// Genes beyond the shorter of the two sequences are ignored.
    pub fn distance(&self, other: &Self) -> f64 {
        self.genes
            .iter()
            .zip(other.genes.iter())
            .map(|(a, b)| {
                let d = a.to_f64() - b.to_f64();
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Compares by fitness; unevaluated individuals rank below every
    /// evaluated one.
    pub fn cmp_fitness(&self, other: &Self) -> Ordering {
        match (self.fitness, other.fitness) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }

    /// Whether `self` is strictly fitter than `other`.
    pub fn is_fitter_than(&self, other: &Self) -> bool {
        self.cmp_fitness(other) == Ordering::Greater
    }
}
