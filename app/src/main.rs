use num_complex::Complex;
use rand::Rng;
use rustfft::FftPlanner;
use std::time::Instant;
use wisefft::{FftDirection, PlanFlags, Planner, PlannerConfig, Problem};

fn main() {
    let mut planner = Planner::<f32, _>::with_config(PlannerConfig::default());
    let mut reference = FftPlanner::<f32>::new();

    for n in [64usize, 81, 1024, 1296] {
        let start = Instant::now();
        let forward = planner
            .acquire_plan(
                FftDirection::Forward,
                PlanFlags::PATIENT,
                Problem::dft_1d(n).unwrap(),
            )
            .unwrap();
        let planning = start.elapsed();

        let mut data = vec![Complex::<f32>::default(); n];
        for z in data.iter_mut() {
            *z = Complex {
                re: rand::rng().random(),
                im: rand::rng().random(),
            };
        }
        let mut cvt = data.clone();

        forward.execute(&mut data).unwrap();
        reference.plan_fft_forward(n).process(&mut cvt);

        let scale = 1.0 / f32::sqrt(n as f32);
        let max_error = data
            .iter()
            .zip(cvt.iter())
            .map(|(a, b)| ((a - b) * scale).norm())
            .fold(0f32, f32::max);
        println!(
            "n {n}: {} cost {:e}, planned in {planning:?}, max error {max_error:e}",
            forward.strategy_name(),
            forward.cost()
        );
        assert!(max_error < 1e-3, "mismatch against rustfft for {n}");
        planner.destroy_plan(forward);
    }

    let wisdom = planner.builder().wisdom().export_to_string().unwrap();
    println!("{wisdom}");
}
