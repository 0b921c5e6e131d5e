//! Criterion benchmarks for u-evolution.
//!
//! Measures operator throughput on synthetic populations and the cost of
//! a complete run on the integer target-matching problem.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_evolution::container::{Container, Population};
use u_evolution::engine::{fitness, Environment, Strategy};
use u_evolution::genetics::{FloatPool, GenePool, Individual, IntegerPool};
use u_evolution::operators::integration::Crowded;
use u_evolution::operators::mutation::{NormalDist, UniformInt};
use u_evolution::operators::reproduction::Crossover;
use u_evolution::operators::selection::Tournament;
use u_evolution::operators::{Context, Operator};
use u_evolution::random::create_rng;

const TARGET: [i64; 5] = [4, 74, 43, 23, 0];

fn negative_mse(ind: &Individual<i64>) -> f64 {
    let sum: f64 = ind
        .genes()
        .iter()
        .zip(TARGET)
        .map(|(&g, t)| ((g - t) as f64).powi(2))
        .sum();
    -sum / TARGET.len() as f64
}

fn evaluated_population(n: usize) -> Population<i64> {
    let pool = IntegerPool::new(TARGET.len(), 0, 100).unwrap();
    let mut rng = create_rng(42);
    pool.create_population(n, &mut rng)
        .into_iter()
        .map(|mut ind| {
            let f = negative_mse(&ind);
            ind.set_fitness(f);
            ind
        })
        .collect()
}

// ===========================================================================
// Operators
// ===========================================================================

fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");

    for &n in &[100, 1000] {
        let population: Container<i64> = evaluated_population(n).into();

        let tournament = Tournament::new(4).unwrap();
        group.bench_with_input(BenchmarkId::new("tournament", n), &population, |b, p| {
            let mut rng = create_rng(42);
            b.iter(|| {
                let mut ctx = Context::new(&mut rng);
                black_box(tournament.process(p.clone(), &mut ctx).unwrap())
            })
        });

        let uniform = UniformInt::new(0.1, 0, 100).unwrap();
        group.bench_with_input(BenchmarkId::new("uniform_int", n), &population, |b, p| {
            let mut rng = create_rng(42);
            b.iter(|| {
                let mut ctx = Context::new(&mut rng);
                black_box(uniform.process(p.clone(), &mut ctx).unwrap())
            })
        });

        let crossover = Crossover::new(1, 0.7).unwrap();
        group.bench_with_input(BenchmarkId::new("crossover", n), &population, |b, p| {
            let mut rng = create_rng(42);
            b.iter(|| {
                let mut ctx = Context::new(&mut rng);
                black_box(crossover.process(p.clone(), &mut ctx).unwrap())
            })
        });
    }

    let pool = FloatPool::new(50, -5.0, 5.0)
        .unwrap()
        .with_step_size(0.5)
        .unwrap();
    let mut rng = create_rng(42);
    let population: Container<f64> = pool.create_population(1000, &mut rng).into();
    let normal = NormalDist::new(0.1, 0.0, 0.5)
        .unwrap()
        .with_alpha(1.2)
        .unwrap();
    group.bench_function("normal_dist_self_adaptive/1000", |b| {
        let mut rng = create_rng(42);
        b.iter(|| {
            let mut ctx = Context::new(&mut rng);
            black_box(normal.process(population.clone(), &mut ctx).unwrap())
        })
    });

    group.finish();
}

// ===========================================================================
// Full runs
// ===========================================================================

fn bench_synchronous_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronous_process");
    group.sample_size(10);

    let environment = Environment::new(IntegerPool::new(5, 0, 100).unwrap(), fitness(negative_mse));

    for &(pop, gen) in &[(100, 50), (100, 100), (500, 50)] {
        let strategy = Strategy::builder()
            .with_init_individuals(pop)
            .with_generations(gen)
            .with_selection(Tournament::new(4).unwrap())
            .with_mutation(UniformInt::new(0.1, 0, 100).unwrap())
            .with_reproduction(Crossover::new(1, 0.7).unwrap())
            .with_integration(Crowded::new(10).unwrap())
            .with_seed(42)
            .build()
            .unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("p{pop}_g{gen}")),
            &strategy,
            |b, s| {
                b.iter(|| {
                    let result = environment.execute(black_box(s), &mut []).unwrap();
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_operators, bench_synchronous_process);
criterion_main!(benches);
