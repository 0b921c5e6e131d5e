//! Selection operators.
//!
//! Selection determines which individuals form the mating pool.
//! All strategies assume **maximization** (higher fitness = better);
//! individuals without a fitness lose every comparison.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::iteration::{IterationType, WholeIteration};
use super::operator::{each_population, Context, Operator};
use crate::container::{Community, Population};
use crate::error::{EvolutionError, Result};
use crate::genetics::Gene;
use rand::seq::index;

/// Tournament selection: sample `size` distinct individuals uniformly,
/// keep the fittest, repeat until the mating pool is full.
///
/// Higher `size` = stronger selection pressure.
/// - size=2: light pressure (good for diversity)
/// - size=3-5: moderate pressure (typical default)
/// - size>5: strong pressure (risk of premature convergence)
///
/// Ties go to the first sampled participant, so the outcome is fixed by
/// the run's random stream. The winner is always one of the participants.
///
/// The mating pool has the size of the input population unless
/// [`with_target`](Tournament::with_target) says otherwise. Operates on the
/// whole population at once ([`WholeIteration`]); communities are selected
/// population by population.
///
/// # Complexity
/// O(size) per draw
#[derive(Debug)]
pub struct Tournament {
    size: usize,
    target: Option<usize>,
    iteration: Box<dyn IterationType>,
}

impl Tournament {
    /// # Errors
    /// `InvalidParameter` if `size == 0`.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(EvolutionError::InvalidParameter {
                name: "size",
                reason: "a tournament needs at least one participant".into(),
            });
        }
        Ok(Self {
            size,
            target: None,
            iteration: Box::new(WholeIteration),
        })
    }

    /// Fixes the number of individuals selected per batch.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl<G: Gene> Operator<G> for Tournament {
    fn name(&self) -> &str {
        "Tournament"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_population(
        &self,
        batch: Population<G>,
        ctx: &mut Context<'_, G>,
    ) -> Result<Population<G>> {
        let n = batch.len();
        if n == 0 {
            return Ok(batch);
        }
        let target = self.target.unwrap_or(n);
        let amount = self.size.min(n);

        let mut selected = Population::with_capacity(target);
        for _ in 0..target {
            let mut participants = index::sample(&mut *ctx.rng, n, amount).into_iter();
            let mut winner = participants
                .next()
                .ok_or(EvolutionError::EmptyPopulation)?;
            for candidate in participants {
                if batch[candidate].is_fitter_than(&batch[winner]) {
                    winner = candidate;
                }
            }
            selected.push(batch[winner].clone());
        }
        Ok(selected)
    }

    fn process_community(
        &self,
        batch: Community<G>,
        ctx: &mut Context<'_, G>,
    ) -> Result<Community<G>> {
        each_population(self, batch, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::genetics::Individual;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn make_population(fitnesses: &[f64]) -> Population<i64> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let mut ind = Individual::new(vec![i as i64]);
                ind.set_fitness(f);
                ind
            })
            .collect()
    }

    fn select(op: &Tournament, pop: Population<i64>, seed: u64) -> Population<i64> {
        let mut rng = create_rng(seed);
        let mut ctx = Context::new(&mut rng);
        op.process(pop.into(), &mut ctx)
            .unwrap()
            .into_population()
            .unwrap()
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let op = Tournament::new(2).unwrap().with_target(10_000);
        let selected = select(&op, pop, 42);

        let mut counts = [0u32; 4];
        for ind in &selected {
            counts[ind.genes()[0] as usize] += 1;
        }
        // Index 0 (fitness=10.0) wins every tournament it enters: 1 - (3/4 * 2/3) = 1/2
        assert!(
            counts[0] > 4500,
            "expected best to be selected ~50% of the time, got {counts:?}"
        );
        // Index 2 (fitness=1.0) can never win a tournament of two distinct participants
        assert_eq!(counts[2], 0);
    }

    #[test]
    fn test_full_size_tournament_always_picks_best() {
        let pop = make_population(&[3.0, 9.0, -2.0]);
        let op = Tournament::new(3).unwrap();
        let selected = select(&op, pop, 42);
        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|i| i.fitness() == Some(9.0)));
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let op = Tournament::new(1).unwrap().with_target(10_000);
        let selected = select(&op, pop, 42);

        let mut counts = [0u32; 4];
        for ind in &selected {
            counts[ind.genes()[0] as usize] += 1;
        }
        for &c in &counts {
            assert!(c > 2000, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_unevaluated_loses() {
        let mut pop = make_population(&[-100.0]);
        pop.push(Individual::new(vec![99]));
        let op = Tournament::new(2).unwrap();
        let selected = select(&op, pop, 42);
        assert!(selected.iter().all(|i| i.genes() == [0]));
    }

    #[test]
    fn test_empty_population() {
        let op = Tournament::new(3).unwrap();
        assert!(select(&op, Population::new(), 42).is_empty());
        assert!(Tournament::new(0).is_err());
    }

    #[test]
    fn test_community_selects_per_population() {
        let community = Community::from(vec![
            make_population(&[1.0, 2.0]),
            make_population(&[5.0, 6.0, 7.0]),
        ]);
        let op = Tournament::new(3).unwrap();
        let mut rng = create_rng(42);
        let mut ctx = Context::new(&mut rng);
        let out = op.process(community.into(), &mut ctx).unwrap();

        let Container::Community(out) = out else {
            panic!("expected a community");
        };
        assert_eq!(out.len(), 2);
        assert!(out[0].iter().all(|i| i.fitness() == Some(2.0)));
        assert!(out[1].iter().all(|i| i.fitness() == Some(7.0)));
    }

    #[test]
    fn test_same_seed_same_selection() {
        let op = Tournament::new(2).unwrap();
        let pop = make_population(&[4.0, 4.0, 1.0, 3.0, 4.0]);
        assert_eq!(select(&op, pop.clone(), 7), select(&op, pop, 7));
    }

    proptest! {
        #[test]
        fn prop_winner_is_never_worst_of_many(
            fitnesses in prop::collection::vec(-100.0f64..100.0, 2..30),
            seed in any::<u64>(),
        ) {
            let n = fitnesses.len();
            let pop = make_population(&fitnesses);
            let min = fitnesses.iter().cloned().fold(f64::INFINITY, f64::min);
            let op = Tournament::new(n).unwrap();
            let selected = select(&op, pop, seed);
            prop_assert_eq!(selected.len(), n);
            let max = fitnesses.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            for ind in &selected {
                let f = ind.fitness().unwrap();
                prop_assert!(f >= min);
                prop_assert_eq!(f, max);
            }
        }
    }
}
