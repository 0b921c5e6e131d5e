//! Observers of a running evolution.
//!
//! A [`Callback`] receives a read-only [`Snapshot`] after generation 0 has
//! been evaluated, after every later generation, and once more when the
//! run completes. Callbacks keep their own history and outlive the run.
//! An error returned by a callback aborts the run.

use crate::container::Container;
use crate::error::{EvolutionError, Result};
use crate::genetics::{Gene, GenePool, Individual};

/// Read-only view of the engine state at a generation boundary.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a, G> {
    /// Generation index; 0 is the initial population.
    pub generation: usize,
    /// The current population or community.
    pub container: &'a Container<G>,
}

impl<'a, G: Gene> Snapshot<'a, G> {
    pub fn best(&self) -> Option<&'a Individual<G>> {
        self.container.best()
    }

    pub fn worst(&self) -> Option<&'a Individual<G>> {
        self.container.worst()
    }
}

/// Per-generation observer.
///
/// # Implementing
///
/// ```ignore
/// struct Sizes(Vec<usize>);
///
/// impl<G: Gene> Callback<G> for Sizes {
///     fn on_generation(&mut self, snapshot: &Snapshot<'_, G>) -> Result<()> {
///         self.0.push(snapshot.container.len());
///         Ok(())
///     }
/// }
/// ```
pub trait Callback<G: Gene> {
    /// Name used when reporting a failure.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once per generation, starting with generation 0.
    fn on_generation(&mut self, snapshot: &Snapshot<'_, G>) -> Result<()>;

    /// Called once after the last generation.
    fn on_complete(&mut self, _snapshot: &Snapshot<'_, G>) -> Result<()> {
        Ok(())
    }
}

/// Records the best and the worst individual of every generation.
#[derive(Debug, Clone)]
pub struct BestWorst<G> {
    best: Vec<Individual<G>>,
    worst: Vec<Individual<G>>,
}

impl<G: Gene> Default for BestWorst<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gene> BestWorst<G> {
    pub fn new() -> Self {
        Self {
            best: Vec::new(),
            worst: Vec::new(),
        }
    }

    /// Best individual of each generation.
    pub fn best(&self) -> &[Individual<G>] {
        &self.best
    }

    /// Worst individual of each generation.
    pub fn worst(&self) -> &[Individual<G>] {
        &self.worst
    }

    /// Fitness of the best individual of each generation.
    pub fn best_fitness(&self) -> Vec<f64> {
        fitness_series(&self.best)
    }

    /// Fitness of the worst individual of each generation.
    pub fn worst_fitness(&self) -> Vec<f64> {
        fitness_series(&self.worst)
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

fn fitness_series<G: Gene>(individuals: &[Individual<G>]) -> Vec<f64> {
    individuals
        .iter()
        .map(|i| i.fitness().unwrap_or(f64::NEG_INFINITY))
        .collect()
}

impl<G: Gene> Callback<G> for BestWorst<G> {
    fn name(&self) -> &str {
        "BestWorst"
    }

    fn on_generation(&mut self, snapshot: &Snapshot<'_, G>) -> Result<()> {
        let best = snapshot.best().ok_or(EvolutionError::EmptyPopulation)?;
        let worst = snapshot.worst().ok_or(EvolutionError::EmptyPopulation)?;
        self.best.push(best.clone());
        self.worst.push(worst.clone());
        Ok(())
    }
}

/// Records how spread out the genes are in every generation.
///
/// The value for one generation is the mean, over gene positions, of the
/// standard deviation of that gene divided by the width of its range in
/// the pool's gene space. 0 means every individual is identical; for a
/// uniform spread over the range the value is about 0.29.
#[derive(Debug, Clone)]
pub struct Diversity {
    bounds: Vec<(f64, f64)>,
    diversity: Vec<f64>,
}

impl Diversity {
    pub fn new<P: GenePool + ?Sized>(pool: &P) -> Self {
        Self {
            bounds: pool.bounds(),
            diversity: Vec::new(),
        }
    }

    /// Diversity of each recorded generation.
    pub fn diversity(&self) -> &[f64] {
        &self.diversity
    }

    /// Computes the diversity of a set of individuals.
    pub fn measure<'a, G: Gene>(
        &self,
        individuals: impl Iterator<Item = &'a Individual<G>>,
    ) -> Option<f64> {
        let individuals: Vec<&Individual<G>> = individuals.collect();
        if individuals.is_empty() || self.bounds.is_empty() {
            return None;
        }
        let n = individuals.len() as f64;

        let total: f64 = self
            .bounds
            .iter()
            .enumerate()
            .map(|(position, &(lower, upper))| {
                let values: Vec<f64> = individuals
                    .iter()
                    .filter_map(|ind| ind.genes().get(position).map(Gene::to_f64))
                    .collect();
                let mean = values.iter().sum::<f64>() / n;
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                let range = upper - lower;
                if range > 0.0 {
                    variance.sqrt() / range
                } else {
                    0.0
                }
            })
            .sum();
        Some(total / self.bounds.len() as f64)
    }
}

impl<G: Gene> Callback<G> for Diversity {
    fn name(&self) -> &str {
        "Diversity"
    }

    fn on_generation(&mut self, snapshot: &Snapshot<'_, G>) -> Result<()> {
        let value = self
            .measure(snapshot.container.individuals())
            .ok_or(EvolutionError::EmptyPopulation)?;
        self.diversity.push(value);
        Ok(())
    }
}
