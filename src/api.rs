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
use crate::flags::{HashInfo, Patience, PlanFlags};
use crate::plan::{ActivePlan, Plan};
use crate::planner::Planner;
use crate::problem::Problem;
use crate::search::{Attempt, PlanBuilder, SearchContext};
use crate::traits::FftSample;
use crate::trig::AwakeMode;
use crate::wisdom::{ForgetScope, WisdomPolicy};
use crate::{FftDirection, FftError};
use num_complex::Complex;

/// Executable plan together with the problem it solves.
///
/// Fields drop in order, so the plan is put to sleep and released before
/// the problem.
pub struct ApiPlan<T> {
    plan: ActivePlan<T>,
    problem: Problem,
    sign: FftDirection,
}

impl<T> ApiPlan<T> {
    /// Transforms `data` in place; `data` holds the whole batch.
    pub fn execute(&self, data: &mut [Complex<T>]) -> Result<(), FftError> {
        let expected = self.problem.total_size();
        if data.len() != expected {
            return Err(FftError::InvalidInPlaceLength(expected, data.len()));
        }
        self.plan.execute(data)
    }

    pub fn execute_out_of_place(
        &self,
        src: &[Complex<T>],
        dst: &mut [Complex<T>],
    ) -> Result<(), FftError>
    where
        T: Copy,
    {
        let expected = self.problem.total_size();
        if src.len() != expected {
            return Err(FftError::InvalidInPlaceLength(expected, src.len()));
        }
        if dst.len() != expected {
            return Err(FftError::InvalidInPlaceLength(expected, dst.len()));
        }
        dst.copy_from_slice(src);
        self.plan.execute(dst)
    }

    /// Cost recorded by the most patient search that produced the plan.
    pub fn cost(&self) -> f64 {
        self.plan.pcost()
    }

    pub fn flags(&self) -> PlanFlags {
        self.plan.flags()
    }

    pub fn sign(&self) -> FftDirection {
        self.sign
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub(crate) fn problem_mut(&mut self) -> &mut Problem {
        &mut self.problem
    }

    pub fn strategy_name(&self) -> String {
        self.plan.strategy().descriptor().name()
    }
}

impl<T: FftSample, B: PlanBuilder<T>> Planner<T, B> {
    /// Plans `problem` for transforms in direction `sign`.
    ///
    /// Returns `None` when no plan could be found, in which case the problem
    /// is dropped.
    pub fn acquire_plan(
        &mut self,
        sign: FftDirection,
        flags: PlanFlags,
        problem: Problem,
    ) -> Option<ApiPlan<T>> {
        match self.config.app_layer.clone() {
            Some(app_layer) => self.acquire_relocated(&app_layer, sign, flags, problem),
            None => self.mkapiplan(sign, flags, problem),
        }
    }

    /// Releases `plan` between the planner hooks.
    pub fn destroy_plan(&mut self, plan: ApiPlan<T>) {
        self.run_before_hook();
        drop(plan);
        self.run_after_hook();
    }

    pub(crate) fn mkapiplan(
        &mut self,
        sign: FftDirection,
        flags: PlanFlags,
        problem: Problem,
    ) -> Option<ApiPlan<T>> {
        self.run_before_hook();
        self.ctx = SearchContext::new(sign, self.config.time_limit);

        let best = if flags.contains(PlanFlags::WISDOM_ONLY) {
            match self.mkplan0(&problem, flags, WisdomPolicy::Only) {
                Attempt::Built(plan) => Some((plan, flags, 0.)),
                _ => None,
            }
        } else {
            self.escalate(&problem, flags)
        };

        let plan = best.and_then(|(candidate, used_flags, pcost)| {
            self.rebuild_blessed(&problem, candidate, used_flags, pcost)
        });

        let api_plan = plan.and_then(|plan| match plan.awaken(AwakeMode::for_precision::<T>()) {
            Ok(plan) => Some(ApiPlan {
                plan,
                problem,
                sign,
            }),
            Err((_, err)) => {
                log::warn!("Cannot awaken plan: {err}");
                None
            }
        });

        self.builder.forget(ForgetScope::Accursed);
        self.run_after_hook();
        api_plan
    }

    /// Plans at increasing patience; yields the last plan found, the flags
    /// it was planned with and its cost.
    fn escalate(
        &mut self,
        problem: &Problem,
        flags: PlanFlags,
    ) -> Option<(Plan<T>, PlanFlags, f64)> {
        let pat_max = flags.patience().level();
        let pat_min = if self.config.time_limit.is_some() {
            0
        } else {
            pat_max
        };
        let base = flags.without_patience();

        let mut best: Option<(Plan<T>, PlanFlags)> = None;
        for patience in &Patience::LEVELS[pat_min..=pat_max] {
            let attempt_flags = base | patience.flag();
            match self.mkplan(problem, attempt_flags) {
                Some(plan) => {
                    log::debug!(
                        "Plan at {patience:?} costs {}, strategy {}",
                        plan.pcost(),
                        plan.strategy().descriptor().name()
                    );
                    best = Some((plan, attempt_flags));
                }
                None => {
                    debug_assert!(best.is_none() || self.ctx.timed_out);
                    break;
                }
            }
        }

        best.map(|(plan, used_flags)| {
            let pcost = plan.pcost();
            (plan, used_flags, pcost)
        })
    }

    /// Rebuilds the winner with wisdom blessing and carries `pcost` over.
    fn rebuild_blessed(
        &mut self,
        problem: &Problem,
        candidate: Plan<T>,
        used_flags: PlanFlags,
        pcost: f64,
    ) -> Option<Plan<T>> {
        self.ctx.hash_info = HashInfo::BLESSING;
        let rebuilt = self.mkplan(problem, used_flags);
        self.ctx.hash_info = HashInfo::empty();
        drop(candidate);
        let mut plan = rebuilt?;
        plan.set_pcost(pcost);
        Some(plan)
    }
}
