//! The operator capability and its dispatch.

use super::iteration::{IterationType, SingleIteration};
use crate::container::{Community, Container, Population};
use crate::error::{EvolutionError, Result};
use crate::genetics::{Gene, GenePool};
use rand::RngCore;

/// Per-invocation resources handed to operators.
///
/// The random source is owned by the running environment and lent to
/// every operator in turn. The gene pool is optional so operators can be
/// used standalone.
pub struct Context<'a, G: Gene> {
    pub rng: &'a mut dyn RngCore,
    pub pool: Option<&'a dyn GenePool<Gene = G>>,
    /// Batches passed through by default hooks in the current `process` call.
    pass_throughs: usize,
}

impl<'a, G: Gene> Context<'a, G> {
    pub fn new(rng: &'a mut dyn RngCore) -> Self {
        Self {
            rng,
            pool: None,
            pass_throughs: 0,
        }
    }

    pub fn with_pool(mut self, pool: &'a dyn GenePool<Gene = G>) -> Self {
        self.pool = Some(pool);
        self
    }
}

/// A unit of transformation over populations and communities.
///
/// [`process`](Operator::process) splits its input with the operator's
/// [`IterationType`], passes every batch to the hook for the input's kind
/// and concatenates the results in batch order. The output has the same
/// kind as the input.
///
/// Both hooks are optional. A hook that is not overridden passes its batch
/// through unchanged; `process` then emits one `tracing` warning for the
/// call, so any operator is a safe identity for container kinds it was not
/// written for.
///
/// # Implementing
///
/// ```ignore
/// struct Negate;
///
/// impl Operator<bool> for Negate {
///     fn name(&self) -> &str { "Negate" }
///
///     fn process_population(
///         &self,
///         batch: Population<bool>,
///         _ctx: &mut Context<'_, bool>,
///     ) -> Result<Population<bool>> {
///         Ok(batch.into_iter().map(|mut ind| {
///             ind.genes_mut().iter_mut().for_each(|g| *g = !*g);
///             ind
///         }).collect())
///     }
/// }
/// ```
pub trait Operator<G: Gene>: Send + Sync {
    /// Human-readable name, used in diagnostics and chain rendering.
    fn name(&self) -> &str;

    /// Batching policy. Defaults to [`SingleIteration`].
    fn iteration(&self) -> &dyn IterationType {
        &SingleIteration
    }

    /// Transforms one population batch.
    fn process_population(
        &self,
        batch: Population<G>,
        ctx: &mut Context<'_, G>,
    ) -> Result<Population<G>> {
        ctx.pass_throughs += 1;
        Ok(batch)
    }

    /// Transforms one community batch.
    fn process_community(
        &self,
        batch: Community<G>,
        ctx: &mut Context<'_, G>,
    ) -> Result<Community<G>> {
        ctx.pass_throughs += 1;
        Ok(batch)
    }

    /// Processes a whole container and returns a new one of the same kind.
    ///
    /// # Errors
    /// - `TypeMismatch` if the iteration type does not support the kind
    /// - `InvalidBatch` if the iteration type yields an out-of-range index
    /// - anything the hooks return
    fn process(&self, container: Container<G>, ctx: &mut Context<'_, G>) -> Result<Container<G>> {
        dispatch(self, container, ctx)
    }
}

/// Default `process`: batch, call the hook, integrate in order.
///
/// Pass-through counts are scoped to this call so that operators nested
/// inside a hook report their own.
pub(crate) fn dispatch<G, O>(
    operator: &O,
    container: Container<G>,
    ctx: &mut Context<'_, G>,
) -> Result<Container<G>>
where
    G: Gene,
    O: Operator<G> + ?Sized,
{
    let kind = container.kind();
    let iteration = operator.iteration();
    if !iteration.supports(kind) {
        return Err(EvolutionError::TypeMismatch {
            iteration: iteration.name().to_string(),
            kind,
        });
    }

    let outer = std::mem::take(&mut ctx.pass_throughs);
    let result = run_batches(operator, iteration, container, ctx);
    let batches = std::mem::replace(&mut ctx.pass_throughs, outer);
    if batches > 0 {
        tracing::warn!(
            operator = operator.name(),
            %kind,
            batches,
            "operator has no behaviour for this container kind; passing it through unchanged"
        );
    }
    result
}

fn run_batches<G, O>(
    operator: &O,
    iteration: &dyn IterationType,
    container: Container<G>,
    ctx: &mut Context<'_, G>,
) -> Result<Container<G>>
where
    G: Gene,
    O: Operator<G> + ?Sized,
{
    let kind = container.kind();
    match container {
        Container::Population(population) => {
            let mut result = Population::with_capacity(population.len());
            for indices in iteration.batches(kind, population.len()) {
                let batch = population.subset(&indices)?;
                result.integrate(operator.process_population(batch, ctx)?);
            }
            Ok(Container::Population(result))
        }
        Container::Community(community) => {
            let mut result = Community::new();
            for indices in iteration.batches(kind, community.len()) {
                let batch = community.subset(&indices)?;
                result.integrate(operator.process_community(batch, ctx)?);
            }
            Ok(Container::Community(result))
        }
    }
}

/// Runs `operator` over every population of `community` independently.
///
/// Population-level operators use this as their community hook.
pub(crate) fn each_population<G, O>(
    operator: &O,
    community: Community<G>,
    ctx: &mut Context<'_, G>,
) -> Result<Community<G>>
where
    G: Gene,
    O: Operator<G> + ?Sized,
{
    let mut result = Community::new();
    for population in community {
        let processed = operator.process(Container::Population(population), ctx)?;
        result.push(processed.into_population()?);
    }
    Ok(result)
}

/// The base operator: no hooks, so every container passes through.
///
/// Useful as a placeholder for the selection, mutation or reproduction
/// step of a strategy, or inside a chain. It cannot integrate: the engine
/// rejects an integration step that leaves residents and offspring apart.
#[derive(Debug)]
pub struct Identity {
    iteration: Box<dyn IterationType>,
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl Identity {
    pub fn new() -> Self {
        Self {
            iteration: Box::new(SingleIteration),
        }
    }

    pub fn with_iteration(mut self, iteration: impl IterationType + 'static) -> Self {
        self.iteration = Box::new(iteration);
        self
    }
}

impl<G: Gene> Operator<G> for Identity {
    fn name(&self) -> &str {
        "Identity"
    }

    fn iteration(&self) -> &dyn IterationType {
        self.iteration.as_ref()
    }
}
