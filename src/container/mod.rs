//! Containers that operators work on.
//!
//! Operators accept exactly two container shapes:
//!
//! - [`Population`]: an ordered collection of individuals
//! - [`Community`]: an ordered collection of populations (demes / islands)
//!
//! [`Container`] tags the two so a single `process` entry point can
//! dispatch over them without runtime type inspection.

mod community;
mod population;

pub use community::Community;
pub use population::Population;

use crate::error::{EvolutionError, Result};
use crate::genetics::{Gene, Individual};
use std::fmt;

/// Which of the two container shapes a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Population,
    Community,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Population => f.write_str("population"),
            ContainerKind::Community => f.write_str("community"),
        }
    }
}

/// A population or a community.
#[derive(Debug, Clone, PartialEq)]
pub enum Container<G> {
    Population(Population<G>),
    Community(Community<G>),
}

impl<G: Gene> Container<G> {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Population(_) => ContainerKind::Population,
            Container::Community(_) => ContainerKind::Community,
        }
    }

    /// Number of direct elements: individuals or populations.
    pub fn len(&self) -> usize {
        match self {
            Container::Population(p) => p.len(),
            Container::Community(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every individual, in order, regardless of nesting.
    pub fn individuals(&self) -> Box<dyn Iterator<Item = &Individual<G>> + '_> {
        match self {
            Container::Population(p) => Box::new(p.iter()),
            Container::Community(c) => Box::new(c.iter().flat_map(|p| p.iter())),
        }
    }

    /// Mutable access to every individual, in order.
    pub fn individuals_mut(&mut self) -> Box<dyn Iterator<Item = &mut Individual<G>> + '_> {
        match self {
            Container::Population(p) => Box::new(p.iter_mut()),
            Container::Community(c) => Box::new(c.iter_mut().flat_map(|p| p.iter_mut())),
        }
    }

    /// Fittest individual across the whole container.
    pub fn best(&self) -> Option<&Individual<G>> {
        self.individuals().max_by(|a, b| a.cmp_fitness(b))
    }

    /// Least fit individual across the whole container.
    pub fn worst(&self) -> Option<&Individual<G>> {
        self.individuals().min_by(|a, b| a.cmp_fitness(b))
    }

    pub fn as_population(&self) -> Option<&Population<G>> {
        match self {
            Container::Population(p) => Some(p),
            Container::Community(_) => None,
        }
    }

    pub fn as_community(&self) -> Option<&Community<G>> {
        match self {
            Container::Community(c) => Some(c),
            Container::Population(_) => None,
        }
    }

    /// Unwraps a population.
    ///
    /// # Errors
    /// `InvalidContainerKind` if this is a community.
    pub fn into_population(self) -> Result<Population<G>> {
        match self {
            Container::Population(p) => Ok(p),
            Container::Community(_) => Err(EvolutionError::InvalidContainerKind {
                expected: ContainerKind::Population,
                found: ContainerKind::Community,
            }),
        }
    }

    /// Unwraps a community.
    ///
    /// # Errors
    /// `InvalidContainerKind` if this is a population.
    pub fn into_community(self) -> Result<Community<G>> {
        match self {
            Container::Community(c) => Ok(c),
            Container::Population(_) => Err(EvolutionError::InvalidContainerKind {
                expected: ContainerKind::Community,
                found: ContainerKind::Population,
            }),
        }
    }
}

impl<G> From<Population<G>> for Container<G> {
    fn from(p: Population<G>) -> Self {
        Container::Population(p)
    }
}

impl<G> From<Community<G>> for Container<G> {
    fn from(c: Community<G>) -> Self {
        Container::Community(c)
    }
}
