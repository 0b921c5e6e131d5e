//! Strategy configuration.
//!
//! A [`Strategy`] bundles the operators of one generation with the run
//! parameters. It is assembled with a [`StrategyBuilder`] and validated
//! once, at [`build`](StrategyBuilder::build) time; it never changes while
//! an evolution runs.

use crate::error::{EvolutionError, Result};
use crate::genetics::Gene;
use crate::operators::Operator;
use std::fmt;

/// Immutable configuration of an evolution run.
///
/// # Example
///
/// ```
/// use u_evolution::engine::Strategy;
/// use u_evolution::operators::{integration, mutation, reproduction, selection};
///
/// let strategy = Strategy::<i64>::builder()
///     .with_init_individuals(100)
///     .with_generations(50)
///     .with_selection(selection::Tournament::new(4).unwrap())
///     .with_mutation(mutation::UniformInt::new(0.1, 0, 100).unwrap())
///     .with_reproduction(reproduction::Crossover::new(1, 0.7).unwrap())
///     .with_integration(integration::Crowded::new(10).unwrap())
///     .with_seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(strategy.generations(), 50);
/// ```
pub struct Strategy<G: Gene> {
    init_individuals: usize,
    generations: usize,
    selection: Box<dyn Operator<G>>,
    mutation: Box<dyn Operator<G>>,
    reproduction: Box<dyn Operator<G>>,
    integration: Box<dyn Operator<G>>,
    migration: Option<Box<dyn Operator<G>>>,
    seed: Option<u64>,
    parallel: bool,
}

impl<G: Gene> Strategy<G> {
    pub fn builder() -> StrategyBuilder<G> {
        StrategyBuilder::default()
    }

    /// Number of individuals created for generation 0 (per deme).
    pub fn init_individuals(&self) -> usize {
        self.init_individuals
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn selection(&self) -> &dyn Operator<G> {
        self.selection.as_ref()
    }

    pub fn mutation(&self) -> &dyn Operator<G> {
        self.mutation.as_ref()
    }

    pub fn reproduction(&self) -> &dyn Operator<G> {
        self.reproduction.as_ref()
    }

    pub fn integration(&self) -> &dyn Operator<G> {
        self.integration.as_ref()
    }

    /// Migration step between demes, if any.
    pub fn migration(&self) -> Option<&dyn Operator<G>> {
        self.migration.as_deref()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Whether fitness evaluation should run on the rayon thread pool.
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

impl<G: Gene> fmt::Debug for Strategy<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("init_individuals", &self.init_individuals)
            .field("generations", &self.generations)
            .field("selection", &self.selection.name())
            .field("mutation", &self.mutation.name())
            .field("reproduction", &self.reproduction.name())
            .field("integration", &self.integration.name())
            .field("migration", &self.migration.as_ref().map(|m| m.name()))
            .field("seed", &self.seed)
            .field("parallel", &self.parallel)
            .finish()
    }
}

/// Builder for [`Strategy`].
///
/// Every operator and both counts are required. `seed` defaults to `None`
/// (a random seed per run) and `parallel` to `false`.
pub struct StrategyBuilder<G: Gene> {
    init_individuals: Option<usize>,
    generations: Option<usize>,
    selection: Option<Box<dyn Operator<G>>>,
    mutation: Option<Box<dyn Operator<G>>>,
    reproduction: Option<Box<dyn Operator<G>>>,
    integration: Option<Box<dyn Operator<G>>>,
    migration: Option<Box<dyn Operator<G>>>,
    seed: Option<u64>,
    parallel: bool,
}

impl<G: Gene> Default for StrategyBuilder<G> {
    fn default() -> Self {
        Self {
            init_individuals: None,
            generations: None,
            selection: None,
            mutation: None,
            reproduction: None,
            integration: None,
            migration: None,
            seed: None,
            parallel: false,
        }
    }
}

impl<G: Gene> StrategyBuilder<G> {
    /// Sets the size of the initial population.
    pub fn with_init_individuals(mut self, n: usize) -> Self {
        self.init_individuals = Some(n);
        self
    }

    /// Sets the number of generations to run.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = Some(n);
        self
    }

    pub fn with_selection(mut self, op: impl Operator<G> + 'static) -> Self {
        self.selection = Some(Box::new(op));
        self
    }

    pub fn with_mutation(mut self, op: impl Operator<G> + 'static) -> Self {
        self.mutation = Some(Box::new(op));
        self
    }

    pub fn with_reproduction(mut self, op: impl Operator<G> + 'static) -> Self {
        self.reproduction = Some(Box::new(op));
        self
    }

    pub fn with_integration(mut self, op: impl Operator<G> + 'static) -> Self {
        self.integration = Some(Box::new(op));
        self
    }

    /// Sets the operator applied to communities after integration.
    pub fn with_migration(mut self, op: impl Operator<G> + 'static) -> Self {
        self.migration = Some(Box::new(op));
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration and builds the strategy.
    ///
    /// # Errors
    /// - `MissingField` if a count or operator was never set
    /// - `InvalidParameter` if a count is zero
    pub fn build(self) -> Result<Strategy<G>> {
        let init_individuals = positive(
            "init_individuals",
            self.init_individuals
                .ok_or(EvolutionError::MissingField("init_individuals"))?,
        )?;
        let generations = positive(
            "generations",
            self.generations
                .ok_or(EvolutionError::MissingField("generations"))?,
        )?;

        Ok(Strategy {
            init_individuals,
            generations,
            selection: self
                .selection
                .ok_or(EvolutionError::MissingField("selection"))?,
            mutation: self
                .mutation
                .ok_or(EvolutionError::MissingField("mutation"))?,
            reproduction: self
                .reproduction
                .ok_or(EvolutionError::MissingField("reproduction"))?,
            integration: self
                .integration
                .ok_or(EvolutionError::MissingField("integration"))?,
            migration: self.migration,
            seed: self.seed,
            parallel: self.parallel,
        })
    }
}

fn positive(name: &'static str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(EvolutionError::InvalidParameter {
            name,
            reason: "must be at least 1".into(),
        });
    }
    Ok(value)
}
