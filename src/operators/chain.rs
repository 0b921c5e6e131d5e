//! Ordered composition of operators.

use super::operator::{Context, Operator};
use crate::container::Container;
use crate::error::{EvolutionError, Result};
use crate::genetics::Gene;
use rand::Rng;
use std::fmt;

/// One step of an [`OperatorChain`].
pub enum ChainStep<G: Gene> {
    /// Always apply this operator.
    Single(Box<dyn Operator<G>>),
    /// Apply one of these, chosen uniformly at random on every run.
    OneOf(Vec<Box<dyn Operator<G>>>),
}

/// Operators applied one after another, each step feeding the next.
///
/// A step can hold alternatives, in which case one of them is drawn from
/// the context's random source each time the chain runs. This expresses
/// "mutate with A half of the time and with B otherwise" without a
/// dedicated branching operator.
///
/// The chain is an [`Operator`] itself, so it can stand anywhere a single
/// operator is expected.
///
/// # Examples
///
/// ```
/// use u_evolution::operators::OperatorChain;
/// use u_evolution::operators::mutation::{UniformFloat, NormalDist};
///
/// let chain = OperatorChain::<f64>::new()
///     .then(UniformFloat::new(0.1, -1.0, 1.0).unwrap())
///     .one_of(vec![
///         Box::new(NormalDist::new(0.2, 0.0, 0.5).unwrap()),
///         Box::new(UniformFloat::new(0.2, -1.0, 1.0).unwrap()),
///     ])
///     .unwrap();
///
/// assert_eq!(chain.to_string(), "UniformFloat - (NormalDist | UniformFloat)");
/// ```
pub struct OperatorChain<G: Gene> {
    steps: Vec<ChainStep<G>>,
}

impl<G: Gene> Default for OperatorChain<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gene> OperatorChain<G> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a single operator.
    pub fn then(mut self, operator: impl Operator<G> + 'static) -> Self {
        self.steps.push(ChainStep::Single(Box::new(operator)));
        self
    }

    /// Appends a random-choice step.
    ///
    /// # Errors
    /// `InvalidParameter` if `alternatives` is empty.
    pub fn one_of(mut self, alternatives: Vec<Box<dyn Operator<G>>>) -> Result<Self> {
        if alternatives.is_empty() {
            return Err(EvolutionError::InvalidParameter {
                name: "alternatives",
                reason: "a random-choice step needs at least one operator".into(),
            });
        }
        self.steps.push(ChainStep::OneOf(alternatives));
        Ok(self)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<G: Gene> Operator<G> for OperatorChain<G> {
    fn name(&self) -> &str {
        "OperatorChain"
    }

    fn process(
        &self,
        mut container: Container<G>,
        ctx: &mut Context<'_, G>,
    ) -> Result<Container<G>> {
        for (step_index, step) in self.steps.iter().enumerate() {
            let operator = match step {
                ChainStep::Single(operator) => operator.as_ref(),
                ChainStep::OneOf(alternatives) => {
                    let choice = ctx.rng.random_range(0..alternatives.len());
                    let operator = alternatives[choice].as_ref();
                    tracing::trace!(
                        step = step_index,
                        operator = operator.name(),
                        "chain step chose alternative"
                    );
                    operator
                }
            };
            let kind = container.kind();
            container = operator.process(container, ctx)?;
            if container.kind() != kind {
                return Err(EvolutionError::InvalidContainerKind {
                    expected: kind,
                    found: container.kind(),
                });
            }
        }
        Ok(container)
    }
}

impl<G: Gene> fmt::Display for OperatorChain<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .steps
            .iter()
            .map(|step| match step {
                ChainStep::Single(operator) => operator.name().to_string(),
                ChainStep::OneOf(alternatives) => {
                    let names: Vec<&str> = alternatives.iter().map(|o| o.name()).collect();
                    format!("({})", names.join(" | "))
                }
            })
            .collect();
        f.write_str(&rendered.join(" - "))
    }
}

impl<G: Gene> fmt::Debug for OperatorChain<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatorChain({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Community, Population};
    use crate::genetics::Individual;
    use crate::operators::Identity;
    use crate::random::create_rng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Adds a constant to every gene and counts its invocations.
    struct Add {
        amount: i64,
        calls: Arc<AtomicUsize>,
    }

    impl Add {
        fn new(amount: i64) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    amount,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl Operator<i64> for Add {
        fn name(&self) -> &str {
            "Add"
        }

        fn process(
            &self,
            container: Container<i64>,
            ctx: &mut Context<'_, i64>,
        ) -> Result<Container<i64>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            super::super::operator::dispatch(self, container, ctx)
        }

        fn process_population(
            &self,
            batch: Population<i64>,
            _ctx: &mut Context<'_, i64>,
        ) -> Result<Population<i64>> {
            Ok(batch
                .into_iter()
                .map(|mut ind| {
                    ind.genes_mut()[0] += self.amount;
                    ind
                })
                .collect())
        }
    }

    /// Turns any population into a community.
    struct Wrap;

    impl Operator<i64> for Wrap {
        fn name(&self) -> &str {
            "Wrap"
        }

        fn process(
            &self,
            container: Container<i64>,
            _ctx: &mut Context<'_, i64>,
        ) -> Result<Container<i64>> {
            Ok(Community::from(container.into_population()?).into())
        }
    }

    fn start() -> Container<i64> {
        Population::from(vec![Individual::new(vec![0]), Individual::new(vec![10])]).into()
    }

    #[test]
    fn test_steps_run_in_order() {
        let (a, _) = Add::new(1);
        let (b, _) = Add::new(100);
        let chain = OperatorChain::<i64>::new().then(a).then(b).then(Identity::new());

        let mut rng = create_rng(42);
        let mut ctx = Context::new(&mut rng);
        let out = chain.process(start(), &mut ctx).unwrap();
        let genes: Vec<i64> = out.individuals().map(|i| i.genes()[0]).collect();
        assert_eq!(genes, vec![101, 111]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = OperatorChain::<i64>::new();
        let mut rng = create_rng(42);
        let mut ctx = Context::new(&mut rng);
        assert_eq!(chain.process(start(), &mut ctx).unwrap(), start());
    }

    #[test]
    fn test_random_choice_is_uniform() {
        let (a, calls_a) = Add::new(1);
        let (b, calls_b) = Add::new(2);
        let (c, calls_c) = Add::new(3);
        let chain = OperatorChain::<i64>::new()
            .one_of(vec![Box::new(a), Box::new(b), Box::new(c)])
            .unwrap();

        let mut rng = create_rng(42);
        let mut ctx = Context::new(&mut rng);
        let n = 3000;
        for _ in 0..n {
            chain.process(start(), &mut ctx).unwrap();
        }

        let counts = [
            calls_a.load(Ordering::Relaxed),
            calls_b.load(Ordering::Relaxed),
            calls_c.load(Ordering::Relaxed),
        ];
        assert_eq!(counts.iter().sum::<usize>(), n);
        for &count in &counts {
            assert!(
                (850..=1150).contains(&count),
                "expected roughly uniform choice, got {counts:?}"
            );
        }
    }

    #[test]
    fn test_empty_alternatives_rejected() {
        assert!(OperatorChain::<i64>::new().one_of(Vec::new()).is_err());
    }

    #[test]
    fn test_kind_change_is_rejected() {
        let chain = OperatorChain::<i64>::new().then(Wrap);
        let mut rng = create_rng(42);
        let mut ctx = Context::new(&mut rng);
        assert!(matches!(
            chain.process(start(), &mut ctx),
            Err(EvolutionError::InvalidContainerKind { .. })
        ));
    }

    #[test]
    fn test_display() {
        let (a, _) = Add::new(1);
        let (b, _) = Add::new(2);
        let chain = OperatorChain::<i64>::new()
            .then(Identity::new())
            .one_of(vec![Box::new(a), Box::new(b)])
            .unwrap();
        assert_eq!(chain.to_string(), "Identity - (Add | Add)");
    }
}
