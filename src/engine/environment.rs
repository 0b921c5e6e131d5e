//! Generation loop execution.
//!
//! [`Environment`] binds a gene pool to a fitness function and runs
//! strategies against them:
//! initialize → evaluate → select → mutate → reproduce → evaluate
//! offspring → integrate → (migrate) → callbacks → repeat.

use super::callback::{Callback, Snapshot};
use super::strategy::Strategy;
use crate::container::{Community, Container, ContainerKind, Population};
use crate::error::{EvolutionError, FitnessError, Result};
use crate::genetics::{Gene, GenePool, Individual};
use crate::operators::{Context, Operator};
use crate::random::{create_rng, fork_rng};
use tracing::{debug, info, warn};

/// Scores an individual. Higher is better.
///
/// Must not depend on anything but the individual: the engine caches the
/// result and evaluates individuals in any order, possibly in parallel.
///
/// Closures `Fn(&Individual<G>) -> Result<f64, FitnessError>` implement
/// this trait directly; wrap an infallible closure with [`fitness`].
pub trait FitnessFunction<G: Gene>: Send + Sync {
    fn evaluate(&self, individual: &Individual<G>) -> std::result::Result<f64, FitnessError>;
}

impl<G, F> FitnessFunction<G> for F
where
    G: Gene,
    F: Fn(&Individual<G>) -> std::result::Result<f64, FitnessError> + Send + Sync,
{
    fn evaluate(&self, individual: &Individual<G>) -> std::result::Result<f64, FitnessError> {
        self(individual)
    }
}

/// An infallible fitness function. See [`fitness`].
#[derive(Debug, Clone, Copy)]
pub struct FitnessFn<F>(F);

impl<G, F> FitnessFunction<G> for FitnessFn<F>
where
    G: Gene,
    F: Fn(&Individual<G>) -> f64 + Send + Sync,
{
    fn evaluate(&self, individual: &Individual<G>) -> std::result::Result<f64, FitnessError> {
        Ok((self.0)(individual))
    }
}

/// Wraps a closure that cannot fail into a [`FitnessFunction`].
///
/// ```
/// use u_evolution::engine::fitness;
/// use u_evolution::genetics::Individual;
///
/// let ones = fitness(|ind: &Individual<bool>| ind.genes().iter().filter(|&&b| b).count() as f64);
/// # let _ = ones;
/// ```
pub fn fitness<F>(f: F) -> FitnessFn<F> {
    FitnessFn(f)
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<G> {
    /// The final population (or community, for multi-deme runs).
    pub container: Container<G>,
    /// Fittest individual of the final generation.
    pub best: Individual<G>,
    /// Number of generations executed.
    pub generations: usize,
    /// Seed the run's random stream was created from.
    pub seed: u64,
}

impl<G: Gene> EvolutionResult<G> {
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.fitness()
    }
}

/// Executes strategies over a gene pool and a fitness function.
///
/// The environment holds no run state: each call to
/// [`execute`](Environment::execute) creates its own random stream and
/// population and drops them when it returns.
///
/// # Example
///
/// ```
/// use u_evolution::engine::{fitness, BestWorst, Environment, Strategy};
/// use u_evolution::genetics::{BoolPool, Individual};
/// use u_evolution::operators::{integration, mutation, reproduction, selection};
///
/// let environment = Environment::new(
///     BoolPool::new(16).unwrap(),
///     fitness(|ind: &Individual<bool>| ind.genes().iter().filter(|&&b| b).count() as f64),
/// );
/// let strategy = Strategy::builder()
///     .with_init_individuals(30)
///     .with_generations(20)
///     .with_selection(selection::Tournament::new(3).unwrap())
///     .with_mutation(mutation::BitFlip::new(0.05).unwrap())
///     .with_reproduction(reproduction::Crossover::new(1, 0.7).unwrap())
///     .with_integration(integration::Crowded::new(5).unwrap())
///     .with_seed(42)
///     .build()
///     .unwrap();
///
/// let mut tracker = BestWorst::new();
/// let result = environment.execute(&strategy, &mut [&mut tracker]).unwrap();
/// assert_eq!(result.generations, 20);
/// assert_eq!(tracker.len(), 21);
/// ```
#[derive(Debug)]
pub struct Environment<P, F> {
    pool: P,
    fitness: F,
}

impl<P, F> Environment<P, F>
where
    P: GenePool,
    F: FitnessFunction<P::Gene>,
{
    pub fn new(pool: P, fitness: F) -> Self {
        Self { pool, fitness }
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Evolves a single population.
    ///
    /// # Errors
    /// - `FitnessEvaluation` if the fitness function fails or returns NaN
    /// - `Callback` if a callback fails
    /// - any error raised by the strategy's operators
    pub fn execute(
        &self,
        strategy: &Strategy<P::Gene>,
        callbacks: &mut [&mut dyn Callback<P::Gene>],
    ) -> Result<EvolutionResult<P::Gene>> {
        self.run(strategy, None, callbacks)
    }

    /// Evolves `demes` populations side by side (island model).
    ///
    /// Every deme starts with `init_individuals` individuals and is
    /// integrated with its own offspring; the strategy's migration
    /// operator, if any, then exchanges individuals between demes.
    ///
    /// # Errors
    /// `InvalidParameter` if `demes == 0`, otherwise as [`execute`](Self::execute).
    pub fn execute_demes(
        &self,
        strategy: &Strategy<P::Gene>,
        demes: usize,
        callbacks: &mut [&mut dyn Callback<P::Gene>],
    ) -> Result<EvolutionResult<P::Gene>> {
        if demes == 0 {
            return Err(EvolutionError::InvalidParameter {
                name: "demes",
                reason: "a community needs at least one deme".into(),
            });
        }
        self.run(strategy, Some(demes), callbacks)
    }

    fn run(
        &self,
        strategy: &Strategy<P::Gene>,
        demes: Option<usize>,
        callbacks: &mut [&mut dyn Callback<P::Gene>],
    ) -> Result<EvolutionResult<P::Gene>> {
        let seed = strategy.seed().unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        let parallel = strategy.parallel();

        info!(
            seed,
            generations = strategy.generations(),
            init_individuals = strategy.init_individuals(),
            demes = demes.unwrap_or(1),
            "evolution started"
        );
        if parallel && cfg!(not(feature = "parallel")) {
            warn!("parallel evaluation requested but the `parallel` feature is disabled");
        }
        if demes.is_none() && strategy.migration().is_some() {
            warn!("migration is configured but a single population has no demes to migrate between");
        }

        // 1. Initialize
        let n = strategy.init_individuals();
        let mut state: Container<P::Gene> = match demes {
            None => self.pool.create_population(n, &mut rng).into(),
            Some(demes) => (0..demes)
                .map(|_| {
                    let mut deme_rng = fork_rng(&mut rng);
                    self.pool.create_population(n, &mut deme_rng)
                })
                .collect::<Community<_>>()
                .into(),
        };

        // 2. Evaluate generation 0
        self.evaluate(&mut state, 0, parallel)?;
        notify(
            callbacks,
            &Snapshot {
                generation: 0,
                container: &state,
            },
        )?;

        // 3. Generation loop
        for generation in 1..=strategy.generations() {
            self.evaluate(&mut state, generation, parallel)?;

            let mut ctx: Context<'_, P::Gene> = Context::new(&mut rng).with_pool(&self.pool);
            let mating_pool = strategy.selection().process(state.clone(), &mut ctx)?;
            let mutated = strategy.mutation().process(mating_pool, &mut ctx)?;
            let mut offspring = strategy.reproduction().process(mutated, &mut ctx)?;

            self.evaluate(&mut offspring, generation, parallel)?;
            state = integrate(strategy.integration(), state, offspring, &mut ctx)?;

            if let Some(migration) = strategy.migration() {
                if state.kind() == ContainerKind::Community {
                    state = migration.process(state, &mut ctx)?;
                    self.evaluate(&mut state, generation, parallel)?;
                }
            }

            debug!(
                generation,
                size = state.len(),
                best = state.best().and_then(Individual::fitness),
                worst = state.worst().and_then(Individual::fitness),
                "generation complete"
            );
            notify(
                callbacks,
                &Snapshot {
                    generation,
                    container: &state,
                },
            )?;
        }

        // 4. Terminate
        let snapshot = Snapshot {
            generation: strategy.generations(),
            container: &state,
        };
        for callback in callbacks.iter_mut() {
            callback
                .on_complete(&snapshot)
                .map_err(|e| callback_error(&**callback, e))?;
        }

        let best = state.best().cloned().ok_or(EvolutionError::EmptyPopulation)?;
        info!(
            seed,
            best_fitness = best.fitness(),
            size = state.len(),
            "evolution finished"
        );

        Ok(EvolutionResult {
            container: state,
            best,
            generations: strategy.generations(),
            seed,
        })
    }

    /// Evaluates every individual that has no cached fitness.
    fn evaluate(
        &self,
        container: &mut Container<P::Gene>,
        generation: usize,
        parallel: bool,
    ) -> Result<()> {
        let pending: Vec<(usize, &mut Individual<P::Gene>)> = container
            .individuals_mut()
            .enumerate()
            .filter(|(_, ind)| !ind.is_evaluated())
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        if parallel {
            #[cfg(feature = "parallel")]
            return self.evaluate_parallel(pending, generation);
        }

        for (index, individual) in pending {
            let value = self.score(individual, generation, index)?;
            individual.set_fitness(value);
        }
        Ok(())
    }

    /// Scores on the rayon pool, then writes every result back to the
    /// individual it belongs to before returning.
    #[cfg(feature = "parallel")]
    fn evaluate_parallel(
        &self,
        pending: Vec<(usize, &mut Individual<P::Gene>)>,
        generation: usize,
    ) -> Result<()> {
        use rayon::prelude::*;

        let scores = pending
            .par_iter()
            .map(|(index, individual)| self.score(individual, generation, *index))
            .collect::<Result<Vec<f64>>>()?;
        for ((_, individual), value) in pending.into_iter().zip(scores) {
            individual.set_fitness(value);
        }
        Ok(())
    }

    fn score(
        &self,
        individual: &Individual<P::Gene>,
        generation: usize,
        index: usize,
    ) -> Result<f64> {
        self.fitness
            .evaluate(individual)
            .and_then(|value| {
                if value.is_nan() {
                    Err(FitnessError::new("fitness function returned NaN"))
                } else {
                    Ok(value)
                }
            })
            .map_err(|source| EvolutionError::FitnessEvaluation {
                generation,
                index,
                source,
            })
    }
}

/// Merges offspring into the residents.
///
/// The integration operator receives a community `[residents, offspring]`
/// and its result is flattened into the next population. Communities are
/// integrated deme by deme.
///
/// An operator that hands back more than one population did not merge
/// anything; flattening that would grow the population every generation,
/// so it is rejected.
fn integrate<G: Gene>(
    integration: &dyn Operator<G>,
    residents: Container<G>,
    offspring: Container<G>,
    ctx: &mut Context<'_, G>,
) -> Result<Container<G>> {
    match (residents, offspring) {
        (Container::Population(residents), Container::Population(offspring)) => {
            Ok(merge(integration, residents, offspring, ctx)?.into())
        }
        (Container::Community(residents), Container::Community(offspring)) => {
            if residents.len() != offspring.len() {
                return Err(EvolutionError::DemeCountMismatch {
                    expected: residents.len(),
                    found: offspring.len(),
                });
            }
            residents
                .into_iter()
                .zip(offspring)
                .map(|(r, o)| merge(integration, r, o, ctx))
                .collect::<Result<Community<G>>>()
                .map(Container::from)
        }
        (residents, offspring) => Err(EvolutionError::InvalidContainerKind {
            expected: residents.kind(),
            found: offspring.kind(),
        }),
    }
}

fn merge<G: Gene>(
    integration: &dyn Operator<G>,
    residents: Population<G>,
    offspring: Population<G>,
    ctx: &mut Context<'_, G>,
) -> Result<Population<G>> {
    let batch = Community::from(vec![residents, offspring]);
    let merged = integration.process(batch.into(), ctx)?.into_community()?;
    if merged.len() > 1 {
        return Err(EvolutionError::InvalidParameter {
            name: "integration",
            reason: format!(
                "{} returned {} populations instead of merging residents and offspring into one",
                integration.name(),
                merged.len()
            ),
        });
    }
    Ok(merged.flatten())
}

fn notify<G: Gene>(
    callbacks: &mut [&mut dyn Callback<G>],
    snapshot: &Snapshot<'_, G>,
) -> Result<()> {
    for callback in callbacks.iter_mut() {
        callback
            .on_generation(snapshot)
            .map_err(|e| callback_error(&**callback, e))?;
    }
    Ok(())
}

fn callback_error<G: Gene>(callback: &dyn Callback<G>, error: EvolutionError) -> EvolutionError {
    match error {
        EvolutionError::Callback { .. } => error,
        other => EvolutionError::Callback {
            name: callback.name().to_string(),
            message: other.to_string(),
        },
    }
}
