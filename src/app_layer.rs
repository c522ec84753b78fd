/*
 * // Copyright (c) Radzivon Bartoshyk 10/2026. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
//! Planning against private staging buffers.
//!
//! Candidates are timed on memory the planner owns, placed so its alignment
//! class matches the caller's buffers, and the caller's addresses are put
//! back on the returned plan.
use crate::api::ApiPlan;
use crate::err::try_vec;
use crate::flags::{Patience, PlanFlags};
use crate::planner::Planner;
use crate::problem::{Problem, ProblemKind, SplitBinding};
use crate::search::PlanBuilder;
use crate::traits::FftSample;
use crate::util::alignment_of_address;
use crate::{FftDirection, FftError};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayerConfig {
    pub wisdom_path: PathBuf,
    /// Exchange wisdom with `wisdom_path` on the first call only.
    pub generate_wisdom: bool,
    /// Also stage the output of out-of-place problems.
    pub relocate_output: bool,
}

impl Default for AppLayerConfig {
    fn default() -> Self {
        AppLayerConfig {
            wisdom_path: PathBuf::from("wis.dat"),
            generate_wisdom: false,
            relocate_output: true,
        }
    }
}

impl AppLayerConfig {
    pub fn with_wisdom_path(mut self, wisdom_path: impl Into<PathBuf>) -> AppLayerConfig {
        self.wisdom_path = wisdom_path.into();
        self
    }

    pub fn with_generate_wisdom(mut self, generate_wisdom: bool) -> AppLayerConfig {
        self.generate_wisdom = generate_wisdom;
        self
    }

    pub fn with_relocate_output(mut self, relocate_output: bool) -> AppLayerConfig {
        self.relocate_output = relocate_output;
        self
    }
}

fn staging<T: FftSample>(size: usize) -> Result<Vec<T>, FftError> {
    Ok(try_vec![T::default(); 2 * size + 1])
}

/// Binding into `staging` whose base shares the alignment class of the
/// base of `original`. The base is the real part for forward transforms and
/// the imaginary part for inverse ones.
fn relocate<T>(original: SplitBinding, staging: &[T], sign: FftDirection) -> SplitBinding {
    let scalar = size_of::<T>();
    let original_base = match sign {
        FftDirection::Forward => original.re,
        FftDirection::Inverse => original.im,
    };
    let mut base = staging.as_ptr() as usize;
    let original_aligned = alignment_of_address::<T>(original_base) == 0;
    let staging_aligned = alignment_of_address::<T>(base) == 0;
    if original_aligned != staging_aligned {
        base += scalar;
    }
    match sign {
        FftDirection::Forward => SplitBinding {
            re: base,
            im: base + scalar,
        },
        FftDirection::Inverse => SplitBinding {
            re: base + scalar,
            im: base,
        },
    }
}

impl<T: FftSample, B: PlanBuilder<T>> Planner<T, B> {
    pub(crate) fn acquire_relocated(
        &mut self,
        app_layer: &AppLayerConfig,
        sign: FftDirection,
        flags: PlanFlags,
        mut problem: Problem,
    ) -> Option<ApiPlan<T>> {
        if problem.kind() != ProblemKind::Dft {
            log::error!("{}", FftError::UnsupportedProblem(problem.kind()));
            return None;
        }
        let flags = flags.with_patience(Patience::Patient);

        if !self.wisdom_synced {
            if let Err(err) = self.builder.import_wisdom(&app_layer.wisdom_path) {
                log::warn!("Cannot import wisdom: {err}");
            }
            if app_layer.generate_wisdom {
                self.wisdom_synced = true;
            }
        }

        let size = problem.total_size();
        let original_input = problem.input();
        let original_output = problem.output();
        let in_place = problem.is_in_place();

        let input_staging = match staging::<T>(size) {
            Ok(staging) => staging,
            Err(err) => {
                log::error!("Cannot allocate input staging: {err}");
                return None;
            }
        };
        problem.input = relocate(original_input, &input_staging, sign);
        let mut output_staging = None;
        if in_place {
            problem.output = problem.input;
        } else if app_layer.relocate_output {
            let staged = match staging::<T>(size) {
                Ok(staging) => staging,
                Err(err) => {
                    log::error!("Cannot allocate output staging: {err}");
                    return None;
                }
            };
            problem.output = relocate(original_output, &staged, sign);
            output_staging = Some(staged);
        }
        log::debug!(
            "Relocated {:?} -> {:?}, {:?} -> {:?}",
            original_input,
            problem.input,
            original_output,
            problem.output
        );

        let mut plan = self.mkapiplan(sign, flags, problem);

        if !self.wisdom_synced {
            if app_layer.generate_wisdom {
                self.wisdom_synced = true;
            }
            if let Err(err) = self.builder.export_wisdom(&app_layer.wisdom_path) {
                log::warn!("Cannot export wisdom: {err}");
            }
        }

        if let Some(plan) = plan.as_mut() {
            let problem = plan.problem_mut();
            problem.input = original_input;
            problem.output = if in_place {
                original_input
            } else {
                original_output
            };
        }
        drop(output_staging);
        drop(input_staging);
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dft::Dft;
    use crate::plan::Plan;
    use crate::planner::PlannerConfig;
    use crate::problem::{IoDim, Tensor};
    use crate::search::{Attempt, SearchContext, SolverSearch};
    use crate::strategy::FftStrategy;
    use crate::tile::CacheGeometry;
    use crate::wisdom::ForgetScope;
    use num_complex::Complex;
    use std::path::Path;

    #[derive(Default)]
    struct RecordingBuilder {
        seen: Vec<(PlanFlags, SplitBinding, SplitBinding)>,
        imports: usize,
        exports: usize,
    }

    impl PlanBuilder<f64> for RecordingBuilder {
        fn build(&mut self, ctx: &mut SearchContext, problem: &Problem) -> Attempt<f64> {
            self.seen.push((ctx.flags, problem.input(), problem.output()));
            let strategy: Box<dyn FftStrategy<f64>> =
                Box::new(Dft::new(problem.transform_size(), ctx.direction));
            Attempt::Built(Plan::new(strategy, 1., ctx.flags))
        }

        fn forget(&mut self, _: ForgetScope) {}

        fn import_wisdom(&mut self, _: &Path) -> Result<bool, FftError> {
            self.imports += 1;
            Err(FftError::WisdomIo("wis.dat: not found".to_string()))
        }

        fn export_wisdom(&self, _: &Path) -> Result<(), FftError> {
            Ok(())
        }
    }

    fn app_planner(app_layer: AppLayerConfig) -> Planner<f64, RecordingBuilder> {
        Planner::new(
            PlannerConfig::default().with_app_layer(app_layer),
            RecordingBuilder::default(),
        )
    }

    #[test]
    fn test_forward_relocation_keeps_alignment_class() {
        let buffer = vec![Complex::<f64>::default(); 32];
        for shift in [0usize, size_of::<f64>()] {
            let mut original = SplitBinding::interleaved(&buffer);
            original.re += shift;
            original.im += shift;
            let problem = Problem::dft_1d(16)
                .unwrap()
                .with_buffers(original, original);
            let mut planner = app_planner(AppLayerConfig::default());
            let plan = planner
                .acquire_plan(FftDirection::Forward, PlanFlags::ESTIMATE, problem)
                .unwrap();

            let (flags, input, output) = planner.builder().seen[0];
            assert_eq!(flags & PlanFlags::PATIENCE, PlanFlags::PATIENT);
            assert_ne!(input, original);
            assert_eq!(input, output);
            assert_eq!(input.im, input.re + size_of::<f64>());
            assert_eq!(
                alignment_of_address::<f64>(input.re) == 0,
                alignment_of_address::<f64>(original.re) == 0
            );
            assert_eq!(plan.problem().input(), original);
            assert_eq!(plan.problem().output(), original);
        }
    }

    #[test]
    fn test_inverse_relocation_bases_imaginary_part() {
        let input_buffer = vec![Complex::<f64>::default(); 8];
        let output_buffer = vec![Complex::<f64>::default(); 8];
        let original_input = SplitBinding::interleaved(&input_buffer);
        let original_output = SplitBinding::interleaved(&output_buffer);
        let problem = Problem::dft_1d(8)
            .unwrap()
            .with_buffers(original_input, original_output);
        let mut planner = app_planner(AppLayerConfig::default());
        let plan = planner
            .acquire_plan(FftDirection::Inverse, PlanFlags::MEASURE, problem)
            .unwrap();

        let (_, input, output) = planner.builder().seen[0];
        assert_eq!(input.re, input.im + size_of::<f64>());
        assert_eq!(output.re, output.im + size_of::<f64>());
        assert_ne!(input, output);
        assert_eq!(
            alignment_of_address::<f64>(input.im) == 0,
            alignment_of_address::<f64>(original_input.im) == 0
        );
        assert_eq!(plan.problem().input(), original_input);
        assert_eq!(plan.problem().output(), original_output);
    }

    #[test]
    fn test_output_stays_when_not_relocated() {
        let input_buffer = vec![Complex::<f64>::default(); 4];
        let output_buffer = vec![Complex::<f64>::default(); 4];
        let original_output = SplitBinding::interleaved(&output_buffer);
        let problem = Problem::dft_1d(4)
            .unwrap()
            .with_buffers(SplitBinding::interleaved(&input_buffer), original_output);
        let mut planner = app_planner(AppLayerConfig::default().with_relocate_output(false));
        _ = planner.acquire_plan(FftDirection::Forward, PlanFlags::ESTIMATE, problem);
        assert_eq!(planner.builder().seen[0].2, original_output);
    }

    #[test]
    fn test_unsupported_kind_touches_nothing() {
        let mut planner = app_planner(AppLayerConfig::default());
        let problem = Problem::new(
            ProblemKind::Rdft,
            Tensor::new(vec![IoDim::new(8, 1, 1)]),
            Tensor::rank0(),
        )
        .unwrap();
        let plan = planner.acquire_plan(FftDirection::Forward, PlanFlags::ESTIMATE, problem);
        assert!(plan.is_none());
        assert!(planner.builder().seen.is_empty());
        assert_eq!(planner.builder().imports, 0);
    }

    #[test]
    fn test_wisdom_is_read_once_when_generating() {
        let mut planner = app_planner(AppLayerConfig::default().with_generate_wisdom(true));
        for _ in 0..3 {
            _ = planner.acquire_plan(
                FftDirection::Forward,
                PlanFlags::ESTIMATE,
                Problem::dft_1d(4).unwrap(),
            );
        }
        assert_eq!(planner.builder().imports, 1);

        let mut planner = app_planner(AppLayerConfig::default());
        for _ in 0..3 {
            _ = planner.acquire_plan(
                FftDirection::Forward,
                PlanFlags::ESTIMATE,
                Problem::dft_1d(4).unwrap(),
            );
        }
        assert_eq!(planner.builder().imports, 3);
    }

    #[test]
    fn test_wisdom_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let app_layer = AppLayerConfig::default().with_wisdom_path(dir.path().join("wis.dat"));
        let config = PlannerConfig::default().with_app_layer(app_layer.clone());

        let mut planner = Planner::new(
            config.clone(),
            SolverSearch::<f32>::new(CacheGeometry::default()),
        );
        let plan = planner.acquire_plan(
            FftDirection::Forward,
            PlanFlags::ESTIMATE,
            Problem::dft_1d(64).unwrap(),
        );
        assert!(plan.is_some());
        assert!(app_layer.wisdom_path.exists());

        let mut fresh = Planner::new(config, SolverSearch::<f32>::new(CacheGeometry::default()));
        let plan = fresh.acquire_plan(
            FftDirection::Forward,
            PlanFlags::WISDOM_ONLY,
            Problem::dft_1d(64).unwrap(),
        );
        assert!(plan.is_some());
    }
}
