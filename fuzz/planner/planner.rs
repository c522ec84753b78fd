#![no_main]

use libfuzzer_sys::fuzz_target;
use num_complex::Complex;
use wisefft::{FftDirection, PlanFlags, Planner, PlannerConfig, Problem};

#[derive(arbitrary::Arbitrary, Debug)]
struct Target {
    forward: bool,
    size: u16,
    howmany: u8,
    flags: u8,
    re: f64,
    im: f64,
}

fuzz_target!(|data: Target| {
    if data.size == 0 || data.size > 4096 || data.howmany == 0 || data.howmany > 4 {
        return;
    }
    let n = data.size as usize;
    let howmany = data.howmany as usize;
    let direction = if data.forward {
        FftDirection::Forward
    } else {
        FftDirection::Inverse
    };
    let flags = PlanFlags::from_bits_truncate(data.flags as u32) - PlanFlags::WISDOM_ONLY;
    let mut planner = Planner::<f64, _>::with_config(PlannerConfig::default());
    let plan = planner
        .acquire_plan(direction, flags, Problem::dft_batched(n, howmany).unwrap())
        .unwrap();
    let mut chunk = vec![Complex::new(data.re, data.im); n * howmany];
    plan.execute(&mut chunk).unwrap();
    let mut target = vec![Complex::default(); n * howmany];
    plan.execute_out_of_place(&chunk, &mut target).unwrap();
    planner.destroy_plan(plan);
});
