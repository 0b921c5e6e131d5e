//! Integration operators: merging offspring into a resident population.
//!
//! The engine hands an integration operator a [`Community`] whose first
//! population holds the residents and whose remaining populations hold
//! offspring. The operator returns a community with the single population
//! that becomes the next generation. This is where population-size
//! invariants are enforced across generations.

use super::iteration::{IterationType, WholeIteration};
use super::operator::{Context, Operator};
use crate::container::{Community, Population};
use crate::error::{EvolutionError, Result};
use crate::genetics::Gene;
use rand::seq::index;

/// Splits an integration batch into residents and all offspring.
fn residents_and_offspring<G: Gene>(
    batch: Community<G>,
) -> Option<(Population<G>, Population<G>)> {
    let mut populations = batch.into_iter();
    let residents = populations.next()?;
    let offspring = Community::from_iter(populations).flatten();
    Some((residents, offspring))
}

/// Crowding replacement (De Jong, 1975).
///
/// Offspring are inserted while the resident population is below its
/// capacity. Beyond it, each offspring draws `crowding_factor` residents at
/// random, finds the one closest in gene space, and replaces it only if the
/// offspring is strictly fitter. Since a resident is only ever displaced by
/// a fitter individual, the best fitness never decreases.
///
/// The capacity defaults to the current number of residents, which keeps the
/// population size constant; residents beyond an explicit capacity are
/// dropped worst first.
///
/// # References
///
/// De Jong (1975), *An Analysis of the Behavior of a Class of Genetic
/// Adaptive Systems*
#[derive(Debug)]
pub struct Crowded {
    crowding_factor: usize,
    capacity: Option<usize>,
    iteration: Box<dyn IterationType>,
}

impl Crowded {
    /// # Errors
    /// `InvalidParameter` if `crowding_factor == 0`.
    pub fn new(crowding_factor: usize) -> Result<Self> {
        if crowding_factor == 0 {
            return Err(EvolutionError::InvalidParameter {
                name: "crowding_factor",
                reason: "must sample at least one resident".into(),
            });
        }
        Ok(Self {
            crowding_factor,
            capacity: None,
            iteration: Box::new(WholeIteration),
        })
    }

    /// Bounds the population size.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }
}

impl<G: Gene> Operator<G> for Crowded {
    fn name(&self) -> &str {
        "Crowded"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_community(
        &self,
        batch: Community<G>,
        ctx: &mut Context<'_, G>,
    ) -> Result<Community<G>> {
        let Some((residents, offspring)) = residents_and_offspring(batch) else {
            return Ok(Community::new());
        };
        let capacity = self.capacity.unwrap_or(residents.len());

        let mut residents = if residents.len() > capacity {
            let mut keep: Vec<usize> = residents.ranking().into_iter().take(capacity).collect();
            keep.sort_unstable();
            residents.subset(&keep)?
        } else {
            residents
        };

        for child in offspring {
            if residents.len() < capacity {
                residents.push(child);
                continue;
            }
            if residents.is_empty() {
                continue;
            }
            let amount = self.crowding_factor.min(residents.len());
            let mut nearest: Option<(usize, f64)> = None;
            for candidate in index::sample(&mut *ctx.rng, residents.len(), amount) {
                let distance = child.distance(&residents[candidate]);
                match nearest {
                    Some((_, best)) if distance >= best => {}
                    _ => nearest = Some((candidate, distance)),
                }
            }
            if let Some((target, _)) = nearest {
                if child.is_fitter_than(&residents[target]) {
                    residents.replace(target, child);
                }
            }
        }
        Ok(Community::from(residents))
    }
}

/// Generational replacement with optional elitism.
///
/// Offspring replace the residents. The `elites` fittest residents survive
/// by taking the places of the least fit offspring.
#[derive(Debug)]
pub struct Generational {
    elites: usize,
    iteration: Box<dyn IterationType>,
}

impl Generational {
    pub fn new(elites: usize) -> Self {
        Self {
            elites,
            iteration: Box::new(WholeIteration),
        }
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }
}

impl<G: Gene> Operator<G> for Generational {
    fn name(&self) -> &str {
        "Generational"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }

    fn process_community(
        &self,
        batch: Community<G>,
        _ctx: &mut Context<'_, G>,
    ) -> Result<Community<G>> {
        let Some((residents, mut offspring)) = residents_and_offspring(batch) else {
            return Ok(Community::new());
        };

        let elites: Vec<usize> = residents.ranking().into_iter().take(self.elites).collect();
        let mut losers = offspring.ranking();
        losers.reverse();
        let mut losers = losers.into_iter();
        for elite in elites {
            let survivor = residents[elite].clone();
            match losers.next() {
                Some(slot) if residents[elite].is_fitter_than(&offspring[slot]) => {
                    offspring.replace(slot, survivor);
                }
                Some(_) => {}
                None => offspring.push(survivor),
            }
        }
        Ok(Community::from(offspring))
    }
}
