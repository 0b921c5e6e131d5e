//! Mutation operators.
//!
//! Every mutation decides per gene, with an independent Bernoulli trial of
//! probability `prob`, whether that gene changes. Genes that are not hit
//! keep their exact value, and an individual with no hit keeps its cached
//! fitness. Operators work on copies: the caller's container is untouched.
//!
//! - [`BitFlip`]: negates boolean genes
//! - [`UniformInt`]: redraws integer genes from `[lowest, highest]`
//! - [`UniformFloat`]: redraws real genes from `[lowest, highest]`
//! - [`NormalDist`]: adds normal noise to real genes, optionally with a
//!   self-adaptive step size stored in hidden gene 0
//!
//! All of them default to [`SingleIteration`] and handle communities by
//! mutating every contained population.

use super::iteration::{IterationType, SingleIteration};
use super::operator::{each_population, Context, Operator};
use crate::container::{Community, Population};
use crate::error::{check_probability, EvolutionError, Result};
use crate::genetics::{Gene, Individual};
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

/// Positions selected by independent Bernoulli trials.
fn bernoulli_hits(len: usize, prob: f64, rng: &mut dyn RngCore) -> Vec<usize> {
    (0..len).filter(|_| rng.random_bool(prob)).collect()
}

/// Applies `mutate` to every individual of a batch.
fn mutate_each<G: Gene>(
    batch: Population<G>,
    rng: &mut dyn RngCore,
    mut mutate: impl FnMut(Individual<G>, &mut dyn RngCore) -> Individual<G>,
) -> Population<G> {
    batch.into_iter().map(|ind| mutate(ind, &mut *rng)).collect()
}

/// Flips boolean genes.
#[derive(Debug)]
pub struct BitFlip {
    prob: f64,
    iteration: Box<dyn IterationType>,
}

impl BitFlip {
    /// # Errors
    /// `InvalidProbability` unless `0 <= prob <= 1`.
    pub fn new(prob: f64) -> Result<Self> {
        Ok(Self {
            prob: check_probability("prob", prob)?,
            iteration: Box::new(SingleIteration),
        })
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }

    fn mutate(&self, mut ind: Individual<bool>, rng: &mut dyn RngCore) -> Individual<bool> {
        let hits = bernoulli_hits(ind.len(), self.prob, rng);
        if !hits.is_empty() {
            let genes = ind.genes_mut();
            for i in hits {
                genes[i] = !genes[i];
            }
        }
        ind
    }
}

impl Operator<bool> for BitFlip {
    fn name(&self) -> &str {
        "BitFlip"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_population(
        &self,
        batch: Population<bool>,
        ctx: &mut Context<'_, bool>,
    ) -> Result<Population<bool>> {
        Ok(mutate_each(batch, ctx.rng, |ind, rng| self.mutate(ind, rng)))
    }

    fn process_community(
        &self,
        batch: Community<bool>,
        ctx: &mut Context<'_, bool>,
    ) -> Result<Community<bool>> {
        each_population(self, batch, ctx)
    }
}

/// Replaces integer genes by a uniform draw from `[lowest, highest]`.
#[derive(Debug)]
pub struct UniformInt {
    prob: f64,
    lowest: i64,
    highest: i64,
    iteration: Box<dyn IterationType>,
}

impl UniformInt {
    /// # Errors
    /// `InvalidProbability` for `prob` outside `[0, 1]`,
    /// `InvalidBounds` if `lowest > highest`.
    pub fn new(prob: f64, lowest: i64, highest: i64) -> Result<Self> {
        if lowest > highest {
            return Err(EvolutionError::InvalidBounds {
                lower: lowest as f64,
                upper: highest as f64,
            });
        }
        Ok(Self {
            prob: check_probability("prob", prob)?,
            lowest,
            highest,
            iteration: Box::new(SingleIteration),
        })
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }

    fn mutate(&self, mut ind: Individual<i64>, rng: &mut dyn RngCore) -> Individual<i64> {
        let hits = bernoulli_hits(ind.len(), self.prob, rng);
        if !hits.is_empty() {
            let genes = ind.genes_mut();
            for i in hits {
                genes[i] = rng.random_range(self.lowest..=self.highest);
            }
        }
        ind
    }
}

impl Operator<i64> for UniformInt {
    fn name(&self) -> &str {
        "UniformInt"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_population(
        &self,
        batch: Population<i64>,
        ctx: &mut Context<'_, i64>,
    ) -> Result<Population<i64>> {
        Ok(mutate_each(batch, ctx.rng, |ind, rng| self.mutate(ind, rng)))
    }

    fn process_community(
        &self,
        batch: Community<i64>,
        ctx: &mut Context<'_, i64>,
    ) -> Result<Community<i64>> {
        each_population(self, batch, ctx)
    }
}

/// Replaces real genes by a uniform draw from `[lowest, highest]`.
#[derive(Debug)]
pub struct UniformFloat {
    prob: f64,
    lowest: f64,
    highest: f64,
    iteration: Box<dyn IterationType>,
}

impl UniformFloat {
    /// # Errors
    /// `InvalidProbability` for `prob` outside `[0, 1]`,
    /// `InvalidBounds` unless `lowest <= highest` (both finite).
    pub fn new(prob: f64, lowest: f64, highest: f64) -> Result<Self> {
        if !(lowest.is_finite() && highest.is_finite() && lowest <= highest) {
            return Err(EvolutionError::InvalidBounds {
                lower: lowest,
                upper: highest,
            });
        }
        Ok(Self {
            prob: check_probability("prob", prob)?,
            lowest,
            highest,
            iteration: Box::new(SingleIteration),
        })
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }

    fn mutate(&self, mut ind: Individual<f64>, rng: &mut dyn RngCore) -> Individual<f64> {
        let hits = bernoulli_hits(ind.len(), self.prob, rng);
        if !hits.is_empty() {
            let genes = ind.genes_mut();
            for i in hits {
                genes[i] = rng.random_range(self.lowest..=self.highest);
            }
        }
        ind
    }
}

impl Operator<f64> for UniformFloat {
    fn name(&self) -> &str {
        "UniformFloat"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_population(
        &self,
        batch: Population<f64>,
        ctx: &mut Context<'_, f64>,
    ) -> Result<Population<f64>> {
        Ok(mutate_each(batch, ctx.rng, |ind, rng| self.mutate(ind, rng)))
    }

    fn process_community(
        &self,
        batch: Community<f64>,
        ctx: &mut Context<'_, f64>,
    ) -> Result<Community<f64>> {
        each_population(self, batch, ctx)
    }
}

/// Adds `N(mu, sigma)` noise to real genes.
///
/// With [`with_alpha`](NormalDist::with_alpha) the step size becomes
/// self-adaptive: each individual stores its own sigma in hidden gene 0,
/// and every pass through the operator multiplies it by `alpha` or
/// `1 / alpha` (chosen with equal probability) after reading it. An
/// individual without hidden genes is seeded with the operator's `sigma`.
///
/// # References
///
/// Schwefel (1981), *Numerical Optimization of Computer Models*
#[derive(Debug)]
pub struct NormalDist {
    prob: f64,
    mu: f64,
    sigma: f64,
    alpha: Option<f64>,
    iteration: Box<dyn IterationType>,
}

impl NormalDist {
    /// # Errors
    /// `InvalidProbability` for `prob` outside `[0, 1]`,
    /// `InvalidParameter` for a non-finite `mu` or a negative/non-finite `sigma`.
    pub fn new(prob: f64, mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() {
            return Err(EvolutionError::InvalidParameter {
                name: "mu",
                reason: format!("must be finite, got {mu}"),
            });
        }
        if !(sigma.is_finite() && sigma >= 0.0) {
            return Err(EvolutionError::InvalidParameter {
                name: "sigma",
                reason: format!("must be non-negative, got {sigma}"),
            });
        }
        Ok(Self {
            prob: check_probability("prob", prob)?,
            mu,
            sigma,
            alpha: None,
            iteration: Box::new(SingleIteration),
        })
    }

    /// Enables the self-adaptive step size.
    ///
    /// # Errors
    /// `InvalidParameter` unless `alpha` is positive and finite.
    pub fn with_alpha(mut self, alpha: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(EvolutionError::InvalidParameter {
                name: "alpha",
                reason: format!("must be positive, got {alpha}"),
            });
        }
        self.alpha = Some(alpha);
        Ok(self)
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }

    fn mutate(&self, mut ind: Individual<f64>, rng: &mut dyn RngCore) -> Individual<f64> {
        let hits = bernoulli_hits(ind.len(), self.prob, rng);

        let sigma = match self.alpha {
            Some(alpha) => {
                let hidden = ind.hidden_genes_mut();
                if hidden.is_empty() {
                    hidden.push(self.sigma);
                }
                let sigma = hidden[0];
                hidden[0] *= if rng.random_bool(0.5) { alpha } else { 1.0 / alpha };
                sigma
            }
            None => self.sigma,
        };

        if !hits.is_empty() {
            let genes = ind.genes_mut();
            for i in hits {
                let z: f64 = rng.sample(StandardNormal);
                genes[i] += self.mu + sigma * z;
            }
        }
        ind
    }
}

impl Operator<f64> for NormalDist {
    fn name(&self) -> &str {
        "NormalDist"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_population(
        &self,
        batch: Population<f64>,
        ctx: &mut Context<'_, f64>,
    ) -> Result<Population<f64>> {
        Ok(mutate_each(batch, ctx.rng, |ind, rng| self.mutate(ind, rng)))
    }

    fn process_community(
        &self,
        batch: Community<f64>,
        ctx: &mut Context<'_, f64>,
    ) -> Result<Community<f64>> {
        each_population(self, batch, ctx)
    }
}
