use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use num_complex::Complex;
use rand::Rng;
use rustfft::FftPlanner;
use wisefft::{FftDirection, PlanFlags, Planner, PlannerConfig, Problem};

fn random_input(n: usize) -> Vec<Complex<f64>> {
    let mut input = vec![Complex::<f64>::default(); n];
    for z in input.iter_mut() {
        *z = Complex {
            re: rand::rng().random(),
            im: rand::rng().random(),
        };
    }
    input
}

fn check_size(c: &mut Criterion, n: usize, flags: PlanFlags, group: &str) {
    let input = random_input(n);

    c.bench_function(format!("rustfft {group}").as_str(), |b| {
        let plan = FftPlanner::new().plan_fft_forward(n);
        let mut working = input.to_vec();
        b.iter(|| {
            plan.process(&mut working);
        })
    });

    c.bench_function(format!("wisefft {group}").as_str(), |b| {
        let mut planner = Planner::<f64, _>::with_config(PlannerConfig::default());
        let plan = planner
            .acquire_plan(FftDirection::Forward, flags, Problem::dft_1d(n).unwrap())
            .unwrap();
        let mut working = input.to_vec();
        b.iter(|| {
            plan.execute(&mut working).unwrap();
        })
    });
}

pub fn bench_planning(c: &mut Criterion) {
    for (flags, name) in [
        (PlanFlags::ESTIMATE, "estimate"),
        (PlanFlags::MEASURE, "measure"),
    ] {
        c.bench_function(format!("wisefft planning {name}").as_str(), |b| {
            b.iter_batched(
                || Planner::<f64, _>::with_config(PlannerConfig::default()),
                |mut planner| {
                    for n in [64usize, 256, 1024, 4096] {
                        let plan = planner
                            .acquire_plan(FftDirection::Forward, flags, Problem::dft_1d(n).unwrap())
                            .unwrap();
                        planner.destroy_plan(plan);
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_planning(c);
    check_size(c, 1024, PlanFlags::MEASURE, "1024");
    check_size(c, 4096, PlanFlags::PATIENT, "4096");
    check_size(c, 900, PlanFlags::MEASURE, "900");
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
