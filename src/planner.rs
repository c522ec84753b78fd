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
use crate::app_layer::AppLayerConfig;
use crate::flags::PlanFlags;
use crate::plan::Plan;
use crate::problem::Problem;
use crate::search::{Attempt, PlanBuilder, SearchContext, SolverSearch};
use crate::tile::CacheGeometry;
use crate::traits::FftSample;
use crate::wisdom::{ForgetScope, WisdomPolicy};
use crate::FftDirection;
use std::marker::PhantomData;
use std::time::Duration;

/// Callback run around planning and plan destruction.
pub type PlannerHook = Box<dyn FnMut() + Send>;

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// With a limit set, planning escalates from `ESTIMATE` upwards and
    /// keeps the best plan found before the limit ran out.
    pub time_limit: Option<Duration>,
    /// Plans built per construction attempt.
    pub candidates: usize,
    /// Pick the cheapest of the candidates instead of the first one.
    pub select_lowest_cost: bool,
    pub app_layer: Option<AppLayerConfig>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            time_limit: None,
            candidates: 1,
            select_lowest_cost: false,
            app_layer: None,
        }
    }
}

impl PlannerConfig {
    pub fn with_time_limit(mut self, time_limit: Duration) -> PlannerConfig {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_candidates(mut self, candidates: usize, select_lowest_cost: bool) -> PlannerConfig {
        self.candidates = candidates.max(1);
        self.select_lowest_cost = select_lowest_cost;
        self
    }

    pub fn with_app_layer(mut self, app_layer: AppLayerConfig) -> PlannerConfig {
        self.app_layer = Some(app_layer);
        self
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum RecoveryStep {
    Normal,
    IgnoreInfeasible,
    RetryAfterForget,
    IgnoreAll,
    Failed,
}

/// Search controller. Owns the plan builder, and with it all wisdom.
pub struct Planner<T, B> {
    pub(crate) config: PlannerConfig,
    pub(crate) builder: B,
    pub(crate) before: Option<PlannerHook>,
    pub(crate) after: Option<PlannerHook>,
    pub(crate) ctx: SearchContext,
    /// Set once the application layer stops exchanging wisdom with disk.
    pub(crate) wisdom_synced: bool,
    phantom: PhantomData<fn() -> T>,
}

impl<T: FftSample> Planner<T, SolverSearch<T>> {
    /// Planner over the built-in strategies, tuned to the detected cache.
    pub fn with_config(config: PlannerConfig) -> Planner<T, SolverSearch<T>> {
        Planner::new(config, SolverSearch::new(CacheGeometry::detect()))
    }
}

impl<T: FftSample, B: PlanBuilder<T>> Planner<T, B> {
    pub fn new(config: PlannerConfig, builder: B) -> Planner<T, B> {
        let ctx = SearchContext::new(FftDirection::Forward, config.time_limit);
        Planner {
            config,
            builder,
            before: None,
            after: None,
            ctx,
            wisdom_synced: false,
            phantom: PhantomData,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    /// Replaces both hooks; `None` disables one.
    pub fn set_hooks(&mut self, before: Option<PlannerHook>, after: Option<PlannerHook>) {
        self.before = before;
        self.after = after;
    }

    /// Whether the last planning call hit the time limit.
    pub fn timed_out(&self) -> bool {
        self.ctx.timed_out
    }

    pub(crate) fn run_before_hook(&mut self) {
        if let Some(hook) = self.before.as_mut() {
            hook();
        }
    }

    pub(crate) fn run_after_hook(&mut self) {
        if let Some(hook) = self.after.as_mut() {
            hook();
        }
    }

    /// One construction attempt, building every configured candidate.
    pub(crate) fn mkplan0(
        &mut self,
        problem: &Problem,
        flags: PlanFlags,
        policy: WisdomPolicy,
    ) -> Attempt<T> {
        self.ctx.flags = flags;
        self.ctx.policy = policy;
        let count = self.config.candidates.max(1);
        if count == 1 {
            self.ctx.candidate_index = 0;
            return self.builder.build(&mut self.ctx, problem);
        }

        let mut arena = Vec::with_capacity(count);
        for index in 0..count {
            self.ctx.candidate_index = index;
            arena.push(self.builder.build(&mut self.ctx, problem));
        }
        self.ctx.candidate_index = 0;

        if self.config.select_lowest_cost {
            let mut best: Option<(usize, f64)> = None;
            for (index, attempt) in arena.iter().enumerate() {
                if let Attempt::Built(plan) = attempt
                    && best.is_none_or(|(_, cost)| plan.pcost() < cost)
                {
                    best = Some((index, plan.pcost()));
                }
            }
            if let Some((index, cost)) = best {
                log::debug!("Candidate {index} of {count} wins with cost {cost}");
                return arena.swap_remove(index);
            }
        }
        arena.swap_remove(0)
    }

    /// Builds a plan, recovering from stale or inconsistent wisdom.
    pub(crate) fn mkplan(&mut self, problem: &Problem, flags: PlanFlags) -> Option<Plan<T>> {
        let mut step = RecoveryStep::Normal;
        loop {
            let (attempt, on_inconsistent, otherwise) = match step {
                RecoveryStep::Normal => (
                    self.mkplan0(problem, flags, WisdomPolicy::Normal),
                    RecoveryStep::RetryAfterForget,
                    RecoveryStep::IgnoreInfeasible,
                ),
                RecoveryStep::IgnoreInfeasible => (
                    self.mkplan0(
                        problem,
                        flags.force_estimator(),
                        WisdomPolicy::IgnoreInfeasible,
                    ),
                    RecoveryStep::RetryAfterForget,
                    RecoveryStep::Failed,
                ),
                RecoveryStep::RetryAfterForget => {
                    log::warn!("Inconsistent wisdom detected, forgetting all wisdom");
                    self.builder.forget(ForgetScope::Everything);
                    (
                        self.mkplan0(problem, flags, WisdomPolicy::Normal),
                        RecoveryStep::IgnoreAll,
                        RecoveryStep::Failed,
                    )
                }
                RecoveryStep::IgnoreAll => {
                    log::warn!("Wisdom still inconsistent, planning without wisdom");
                    self.builder.forget(ForgetScope::Everything);
                    (
                        self.mkplan0(problem, flags.force_estimator(), WisdomPolicy::IgnoreAll),
                        RecoveryStep::Failed,
                        RecoveryStep::Failed,
                    )
                }
                RecoveryStep::Failed => return None,
            };
            step = match attempt {
                Attempt::Built(plan) => return Some(plan),
                Attempt::Inconsistent => on_inconsistent,
                Attempt::Infeasible | Attempt::Unavailable => otherwise,
            };
        }
    }
}
