//! Gene pools: factories that enforce an encoding.

use super::gene::Gene;
use super::individual::Individual;
use crate::container::Population;
use crate::error::{EvolutionError, Result};
use rand::{Rng, RngCore};

/// Factory for individuals of one encoding.
///
/// The engine asks the pool for the initial population and hands it to
/// operators through the [`Context`](crate::operators::Context). Pools are
/// object safe so an environment can hold any of them behind `dyn`.
///
/// # Implementing
///
/// ```ignore
/// struct Permutations { n: usize }
///
/// impl GenePool for Permutations {
///     type Gene = i64;
///     fn gene_count(&self) -> usize { self.n }
///     fn bounds(&self) -> Vec<(f64, f64)> { vec![(0.0, (self.n - 1) as f64); self.n] }
///     fn create(&self, rng: &mut dyn RngCore) -> Individual<i64> {
///         let mut genes: Vec<i64> = (0..self.n as i64).collect();
///         genes.shuffle(rng);
///         Individual::new(genes)
///     }
///     fn contains(&self, ind: &Individual<i64>) -> bool { ind.len() == self.n }
/// }
/// ```
pub trait GenePool: Send + Sync {
    /// The gene type this pool produces.
    type Gene: Gene;

    /// Number of genes of every individual.
    fn gene_count(&self) -> usize;

    /// Gene space: `(lower, upper)` for every gene position.
    fn bounds(&self) -> Vec<(f64, f64)>;

    /// Draws one random individual.
    fn create(&self, rng: &mut dyn RngCore) -> Individual<Self::Gene>;

    /// Whether an individual satisfies the encoding (shape and bounds).
    fn contains(&self, individual: &Individual<Self::Gene>) -> bool;

    /// Draws `n` independent individuals.
    fn create_population(&self, n: usize, rng: &mut dyn RngCore) -> Population<Self::Gene> {
        (0..n).map(|_| self.create(rng)).collect()
    }

    /// Copies an existing individual.
    fn copy(&self, individual: &Individual<Self::Gene>) -> Individual<Self::Gene> {
        individual.clone()
    }
}

fn check_shape(shape: usize) -> Result<usize> {
    if shape == 0 {
        return Err(EvolutionError::InvalidParameter {
            name: "shape",
            reason: "a genome needs at least one gene".into(),
        });
    }
    Ok(shape)
}

/// Bit-string encoding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoolPool {
    shape: usize,
}

impl BoolPool {
    pub fn new(shape: usize) -> Result<Self> {
        Ok(Self {
            shape: check_shape(shape)?,
        })
    }
}

impl GenePool for BoolPool {
    type Gene = bool;

    fn gene_count(&self) -> usize {
        self.shape
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); self.shape]
    }

    fn create(&self, rng: &mut dyn RngCore) -> Individual<bool> {
        Individual::new((0..self.shape).map(|_| rng.random_bool(0.5)).collect())
    }

    fn contains(&self, individual: &Individual<bool>) -> bool {
        individual.len() == self.shape
    }
}

/// Integer encoding with inclusive bounds `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegerPool {
    shape: usize,
    lower: i64,
    upper: i64,
}

impl IntegerPool {
    /// # Errors
    /// `InvalidBounds` if `lower > upper`, `InvalidParameter` if `shape == 0`.
    pub fn new(shape: usize, lower: i64, upper: i64) -> Result<Self> {
        if lower > upper {
            return Err(EvolutionError::InvalidBounds {
                lower: lower as f64,
                upper: upper as f64,
            });
        }
        Ok(Self {
            shape: check_shape(shape)?,
            lower,
            upper,
        })
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }
}

impl GenePool for IntegerPool {
    type Gene = i64;

    fn gene_count(&self) -> usize {
        self.shape
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(self.lower as f64, self.upper as f64); self.shape]
    }

    fn create(&self, rng: &mut dyn RngCore) -> Individual<i64> {
        Individual::new(
            (0..self.shape)
                .map(|_| rng.random_range(self.lower..=self.upper))
                .collect(),
        )
    }

    fn contains(&self, individual: &Individual<i64>) -> bool {
        individual.len() == self.shape
            && individual
                .genes()
                .iter()
                .all(|g| (self.lower..=self.upper).contains(g))
    }
}

/// Real-valued encoding over `[lower, upper)`.
///
/// With [`with_step_size`](FloatPool::with_step_size) every created
/// individual carries one hidden gene holding its own mutation step size,
/// as used by self-adaptive [`NormalDist`](crate::operators::mutation::NormalDist).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatPool {
    shape: usize,
    lower: f64,
    upper: f64,
    step_size: Option<f64>,
}

impl FloatPool {
    /// # Errors
    /// `InvalidBounds` unless `lower < upper` (both finite).
    pub fn new(shape: usize, lower: f64, upper: f64) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(EvolutionError::InvalidBounds { lower, upper });
        }
        Ok(Self {
            shape: check_shape(shape)?,
            lower,
            upper,
            step_size: None,
        })
    }

    /// Seeds a step size hidden gene on every created individual.
    pub fn with_step_size(mut self, sigma: f64) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(EvolutionError::InvalidParameter {
                name: "step_size",
                reason: format!("must be positive, got {sigma}"),
            });
        }
        self.step_size = Some(sigma);
        Ok(self)
    }
}

impl GenePool for FloatPool {
    type Gene = f64;

    fn gene_count(&self) -> usize {
        self.shape
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(self.lower, self.upper); self.shape]
    }

    fn create(&self, rng: &mut dyn RngCore) -> Individual<f64> {
        let genes = (0..self.shape)
            .map(|_| rng.random_range(self.lower..self.upper))
            .collect();
        let individual = Individual::new(genes);
        match self.step_size {
            Some(sigma) => individual.with_hidden_genes(vec![sigma]),
            None => individual,
        }
    }

    fn contains(&self, individual: &Individual<f64>) -> bool {
        individual.len() == self.shape
            && individual
                .genes()
                .iter()
                .all(|g| *g >= self.lower && *g < self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_integer_pool_inclusive_bounds() {
        let pool = IntegerPool::new(5, 0, 3).unwrap();
        let mut rng = create_rng(42);
        let mut seen_upper = false;
        for _ in 0..200 {
            let ind = pool.create(&mut rng);
            assert!(pool.contains(&ind));
            seen_upper |= ind.genes().contains(&3);
        }
        assert!(seen_upper, "upper bound should be reachable");
    }

    #[test]
    fn test_integer_pool_rejects() {
        assert!(matches!(
            IntegerPool::new(5, 10, 0),
            Err(EvolutionError::InvalidBounds { .. })
        ));
        assert!(IntegerPool::new(0, 0, 10).is_err());
        assert!(IntegerPool::new(1, 4, 4).is_ok());

        let pool = IntegerPool::new(2, 0, 10).unwrap();
        assert!(!pool.contains(&Individual::new(vec![0, 11])));
        assert!(!pool.contains(&Individual::new(vec![0])));
    }

    #[test]
    fn test_create_population() {
        let pool = BoolPool::new(8).unwrap();
        let mut rng = create_rng(42);
        let pop = pool.create_population(30, &mut rng);
        assert_eq!(pop.len(), 30);
        assert!(pop.iter().all(|ind| pool.contains(ind) && !ind.is_evaluated()));
    }

    #[test]
    fn test_float_pool_step_size() {
        let pool = FloatPool::new(3, -1.0, 1.0)
            .unwrap()
            .with_step_size(0.25)
            .unwrap();
        let mut rng = create_rng(42);
        let ind = pool.create(&mut rng);
        assert_eq!(ind.hidden_genes(), &[0.25]);
        assert!(pool.contains(&ind));

        assert!(FloatPool::new(3, 1.0, 1.0).is_err());
        assert!(FloatPool::new(3, 0.0, f64::INFINITY).is_err());
        assert!(FloatPool::new(3, 0.0, 1.0).unwrap().with_step_size(0.0).is_err());
    }

    #[test]
    fn test_copy_is_independent() {
        let pool = IntegerPool::new(3, 0, 9).unwrap();
        let mut rng = create_rng(1);
        let original = pool.create(&mut rng);
        let mut copy = pool.copy(&original);
        copy.genes_mut()[0] = if original.genes()[0] == 0 { 1 } else { 0 };
        assert_ne!(copy.genes(), original.genes());
    }
}
