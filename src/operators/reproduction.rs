//! Reproduction (recombination) operators.
//!
//! # References
//!
//! - De Jong & Spears (1992), "A formal analysis of the role of multi-point
//!   crossover in genetic algorithms"

use super::iteration::{BatchIteration, IterationType};
use super::operator::{each_population, Context, Operator};
use crate::container::{Community, Population};
use crate::error::{check_probability, EvolutionError, Result};
use crate::genetics::{Gene, Individual};
use rand::seq::index;
use rand::{Rng, RngCore};

/// N-point crossover.
///
/// Walks the population in pairs ([`BatchIteration`] of size 2). With
/// probability `probability` a pair is recombined: `npoints` distinct cut
/// positions are drawn and the segments between them are taken
/// alternately from the two parents, giving two offspring. Otherwise the
/// parents pass through unchanged, fitness included. A trailing unpaired
/// individual always passes through.
///
/// `npoints` is capped at `genes - 1`; genomes with fewer than two genes
/// cannot be cut and pass through.
///
/// # Complexity
/// O(n) time per pair
#[derive(Debug)]
pub struct Crossover {
    npoints: usize,
    probability: f64,
    iteration: Box<dyn IterationType>,
}

impl Crossover {
    /// # Errors
    /// `InvalidParameter` if `npoints == 0`,
    /// `InvalidProbability` for `probability` outside `[0, 1]`.
    pub fn new(npoints: usize, probability: f64) -> Result<Self> {
        if npoints == 0 {
            return Err(EvolutionError::InvalidParameter {
                name: "npoints",
                reason: "crossover needs at least one cut point".into(),
            });
        }
        Ok(Self {
            npoints,
            probability: check_probability("probability", probability)?,
            iteration: Box::new(BatchIteration::PAIRS),
        })
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }

    /// Recombines two parents at random cut points.
    ///
    /// # Errors
    /// `ShapeMismatch` if the parents differ in length.
    pub fn recombine<G: Gene>(
        &self,
        first: &Individual<G>,
        second: &Individual<G>,
        rng: &mut dyn RngCore,
    ) -> Result<(Individual<G>, Individual<G>)> {
        let n = first.len();
        if n != second.len() {
            return Err(EvolutionError::ShapeMismatch {
                left: n,
                right: second.len(),
            });
        }
        if n < 2 {
            return Ok((first.clone(), second.clone()));
        }

        // Cut positions in 1..n, ascending.
        let mut cuts: Vec<usize> = index::sample(rng, n - 1, self.npoints.min(n - 1))
            .into_iter()
            .map(|c| c + 1)
            .collect();
        cuts.sort_unstable();

        let (a, b) = (first.genes(), second.genes());
        let mut child1 = Vec::with_capacity(n);
        let mut child2 = Vec::with_capacity(n);
        let mut swapped = false;
        let mut cut_iter = cuts.into_iter().peekable();
        for i in 0..n {
            if cut_iter.peek() == Some(&i) {
                cut_iter.next();
                swapped = !swapped;
            }
            if swapped {
                child1.push(b[i].clone());
                child2.push(a[i].clone());
            } else {
                child1.push(a[i].clone());
                child2.push(b[i].clone());
            }
        }

        Ok((
            Individual::new(child1).with_hidden_genes(first.hidden_genes().to_vec()),
            Individual::new(child2).with_hidden_genes(second.hidden_genes().to_vec()),
        ))
    }
}

impl<G: Gene> Operator<G> for Crossover {
    fn name(&self) -> &str {
        "Crossover"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_population(
        &self,
        batch: Population<G>,
        ctx: &mut Context<'_, G>,
    ) -> Result<Population<G>> {
        let parents = batch.into_vec();
        let mut offspring = Population::with_capacity(parents.len());
        let mut chunks = parents.chunks_exact(2);
        for pair in &mut chunks {
            if ctx.rng.random_bool(self.probability) {
                let (c1, c2) = self.recombine(&pair[0], &pair[1], &mut *ctx.rng)?;
                offspring.push(c1);
                offspring.push(c2);
            } else {
                offspring.push(pair[0].clone());
                offspring.push(pair[1].clone());
            }
        }
        for rest in chunks.remainder() {
            offspring.push(rest.clone());
        }
        Ok(offspring)
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
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn cross(op: &Crossover, parents: Vec<Individual<i64>>, seed: u64) -> Population<i64> {
        let mut rng = create_rng(seed);
        let mut ctx = Context::new(&mut rng);
        op.process(Population::from(parents).into(), &mut ctx)
            .unwrap()
            .into_population()
            .unwrap()
    }

    fn evaluated(genes: Vec<i64>, fitness: f64) -> Individual<i64> {
        let mut ind = Individual::new(genes);
        ind.set_fitness(fitness);
        ind
    }

    #[test]
    fn test_probability_zero_is_identity() {
        let op = Crossover::new(2, 0.0).unwrap();
        let parents = vec![
            evaluated(vec![1, 1, 1, 1], 1.0),
            evaluated(vec![2, 2, 2, 2], 2.0),
            evaluated(vec![3, 3, 3, 3], 3.0),
        ];
        let out = cross(&op, parents.clone(), 42);
        assert_eq!(out.into_vec(), parents);
    }

    #[test]
    fn test_single_point_recombination() {
        let op = Crossover::new(1, 1.0).unwrap();
        let p1: Vec<i64> = vec![0, 0, 0, 0, 0];
        let p2: Vec<i64> = vec![1, 1, 1, 1, 1];

        for seed in 0..50 {
            let out = cross(
                &op,
                vec![Individual::new(p1.clone()), Individual::new(p2.clone())],
                seed,
            );
            assert_eq!(out.len(), 2);
            let (c1, c2) = (out[0].genes(), out[1].genes());
            let k = c1.iter().position(|&g| g == 1).expect("a cut must happen");
            assert!((1..5).contains(&k));
            let mut expected1 = p1[..k].to_vec();
            expected1.extend_from_slice(&p2[k..]);
            let mut expected2 = p2[..k].to_vec();
            expected2.extend_from_slice(&p1[k..]);
            assert_eq!(c1, expected1.as_slice());
            assert_eq!(c2, expected2.as_slice());
            assert!(!out[0].is_evaluated());
        }
    }

    #[test]
    fn test_odd_individual_passes_through() {
        let op = Crossover::new(1, 1.0).unwrap();
        let last = evaluated(vec![7, 7], 7.0);
        let out = cross(
            &op,
            vec![
                Individual::new(vec![0, 0]),
                Individual::new(vec![1, 1]),
                last.clone(),
            ],
            42,
        );
        assert_eq!(out.len(), 3);
        assert_eq!(out[2], last);
    }

    #[test]
    fn test_shape_mismatch() {
        let op = Crossover::new(1, 1.0).unwrap();
        let mut rng = create_rng(42);
        let mut ctx = Context::new(&mut rng);
        let pop = Population::from(vec![Individual::new(vec![0i64, 0]), Individual::new(vec![1])]);
        assert!(matches!(
            op.process(pop.into(), &mut ctx),
            Err(EvolutionError::ShapeMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(Crossover::new(0, 0.5).is_err());
        assert!(Crossover::new(1, 1.5).is_err());
    }

    #[test]
    fn test_hidden_genes_follow_prefix() {
        let op = Crossover::new(1, 1.0).unwrap();
        let a = Individual::new(vec![0i64, 0, 0]).with_hidden_genes(vec![0.1]);
        let b = Individual::new(vec![1i64, 1, 1]).with_hidden_genes(vec![0.9]);
        let out = cross(&op, vec![a, b], 42);
        assert_eq!(out[0].hidden_genes(), &[0.1]);
        assert_eq!(out[1].hidden_genes(), &[0.9]);
    }

    proptest! {
        #[test]
        fn prop_offspring_are_complementary(
            n in 2usize..20,
            npoints in 1usize..6,
            seed in any::<u64>(),
        ) {
            let op = Crossover::new(npoints, 1.0).unwrap();
            let p1: Vec<i64> = (0..n as i64).collect();
            let p2: Vec<i64> = (0..n as i64).map(|g| -g - 1).collect();
            let out = cross(&op, vec![Individual::new(p1.clone()), Individual::new(p2.clone())], seed);

            let cuts = (1..n).filter(|&i| (out[0].genes()[i] < 0) != (out[0].genes()[i - 1] < 0)).count();
            prop_assert_eq!(cuts, npoints.min(n - 1));
            for i in 0..n {
                let (g1, g2) = (out[0].genes()[i], out[1].genes()[i]);
                prop_assert!((g1 == p1[i] && g2 == p2[i]) || (g1 == p2[i] && g2 == p1[i]));
            }
        }
    }
}
