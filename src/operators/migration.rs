//! Migration between the demes of a community (island model).
//!
//! # References
//!
//! - Whitley, Rana & Heckendorn (1999), "The Island Model Genetic Algorithm:
//!   On Separability, Population Size and Convergence"

use super::iteration::{IterationType, WholeIteration};
use super::operator::{Context, Operator};
use crate::container::Community;
use crate::error::{EvolutionError, Result};
use crate::genetics::Gene;

/// Ring migration.
///
/// Deme `i` sends copies of its `migrants` fittest individuals to deme
/// `(i + 1) % demes`, where they replace the least fit residents. All
/// emigrants are chosen before anything is replaced, so the outcome does
/// not depend on the order in which demes are visited. Deme sizes are
/// preserved and a community with fewer than two demes is left alone.
///
/// Populations have no demes to migrate between and pass through.
#[derive(Debug)]
pub struct Migration {
    migrants: usize,
    iteration: Box<dyn IterationType>,
}

impl Migration {
    /// # Errors
    /// `InvalidParameter` if `migrants == 0`.
    pub fn new(migrants: usize) -> Result<Self> {
        if migrants == 0 {
            return Err(EvolutionError::InvalidParameter {
                name: "migrants",
                reason: "at least one individual must migrate".into(),
            });
        }
        Ok(Self {
            migrants,
            iteration: Box::new(WholeIteration),
        })
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }

    pub fn migrants(&self) -> usize {
        self.migrants
    }
}

impl<G: Gene> Operator<G> for Migration {
    fn name(&self) -> &str {
        "Migration"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_community(
        &self,
        mut batch: Community<G>,
        _ctx: &mut Context<'_, G>,
    ) -> Result<Community<G>> {
        let demes = batch.len();
        if demes < 2 {
            return Ok(batch);
        }

        let emigrants: Vec<Vec<_>> = batch
            .iter()
            .map(|deme| {
                deme.ranking()
                    .into_iter()
                    .take(self.migrants)
                    .map(|i| deme[i].clone())
                    .collect()
            })
            .collect();

        for (source, group) in emigrants.into_iter().enumerate() {
            let target = &mut batch[(source + 1) % demes];
            let mut slots = target.ranking();
            slots.reverse();
            for (slot, migrant) in slots.into_iter().zip(group) {
                target.replace(slot, migrant);
            }
        }

        tracing::trace!(demes, migrants = self.migrants, "ring migration");
        Ok(batch)
    }
}
