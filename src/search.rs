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
use crate::err::try_vec;
use crate::flags::{HashInfo, PlanFlags, SearchFlags};
use crate::plan::Plan;
use crate::problem::Problem;
use crate::strategy::{FftStrategy, StrategyDescriptor};
use crate::tile::CacheGeometry;
use crate::traits::FftSample;
use crate::trig::AwakeMode;
use crate::wisdom::{ForgetScope, Solution, WisdomPolicy, WisdomStore};
use crate::{FftDirection, FftError};
use num_complex::Complex;
use std::marker::PhantomData;
use std::path::Path;
use std::time::{Duration, Instant};

/// State of one planning call, shared by every construction attempt in it.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub flags: PlanFlags,
    pub hash_info: HashInfo,
    pub policy: WisdomPolicy,
    pub direction: FftDirection,
    pub start: Instant,
    pub time_limit: Option<Duration>,
    /// Sticky for the rest of the call once set.
    pub timed_out: bool,
    pub candidate_index: usize,
}

impl SearchContext {
    pub fn new(direction: FftDirection, time_limit: Option<Duration>) -> SearchContext {
        SearchContext {
            flags: PlanFlags::empty(),
            hash_info: HashInfo::empty(),
            policy: WisdomPolicy::Normal,
            direction,
            start: Instant::now(),
            time_limit,
            timed_out: false,
            candidate_index: 0,
        }
    }

    pub fn search_flags(&self) -> SearchFlags {
        SearchFlags::map(self.flags, self.hash_info)
    }

    /// Estimating never times out.
    pub fn time_exhausted(&mut self) -> bool {
        if self.search_flags().timing_reps == 0 {
            return false;
        }
        if self.timed_out {
            return true;
        }
        if let Some(limit) = self.time_limit
            && self.start.elapsed() >= limit
        {
            self.timed_out = true;
        }
        self.timed_out
    }
}

/// Outcome of one construction attempt.
pub enum Attempt<T> {
    Built(Plan<T>),
    /// No strategy applies, or the time limit ran out.
    Infeasible,
    /// Recorded wisdom could not be turned back into a plan.
    Inconsistent,
    /// Wisdom-only request without matching wisdom.
    Unavailable,
}

impl<T> Attempt<T> {
    pub fn is_built(&self) -> bool {
        matches!(self, Attempt::Built(_))
    }
}

/// Construction primitive driven by the planner.
pub trait PlanBuilder<T> {
    fn build(&mut self, ctx: &mut SearchContext, problem: &Problem) -> Attempt<T>;

    fn forget(&mut self, scope: ForgetScope);

    /// `Ok(false)` when there was nothing to import.
    fn import_wisdom(&mut self, path: &Path) -> Result<bool, FftError>;

    fn export_wisdom(&self, path: &Path) -> Result<(), FftError>;
}

/// Wisdom-backed search over the built-in strategies.
pub struct SolverSearch<T> {
    geometry: CacheGeometry,
    wisdom: WisdomStore,
    phantom: PhantomData<fn() -> T>,
}

impl<T: FftSample> Default for SolverSearch<T> {
    fn default() -> Self {
        SolverSearch::new(CacheGeometry::default())
    }
}

impl<T: FftSample> SolverSearch<T> {
    pub fn new(geometry: CacheGeometry) -> SolverSearch<T> {
        SolverSearch {
            geometry,
            wisdom: WisdomStore::new(),
            phantom: PhantomData,
        }
    }

    pub fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    pub fn wisdom(&self) -> &WisdomStore {
        &self.wisdom
    }

    pub fn wisdom_mut(&mut self) -> &mut WisdomStore {
        &mut self.wisdom
    }

    fn from_wisdom(
        &mut self,
        ctx: &SearchContext,
        key: &str,
        n: usize,
        descriptor: StrategyDescriptor,
        cost: f64,
    ) -> Attempt<T> {
        match descriptor.instantiate::<T>(ctx.direction, &self.geometry) {
            Some(strategy) if strategy.length() == n => {
                let search = ctx.search_flags();
                if search.is_blessing() {
                    self.wisdom.bless(key, search.patience);
                }
                Attempt::Built(Plan::new(strategy, cost, ctx.flags))
            }
            _ => {
                log::warn!("Wisdom for {key} names unusable strategy {descriptor:?}");
                Attempt::Inconsistent
            }
        }
    }

    /// Seconds per batch, or `None` when the candidate could not run.
    fn measure(
        &self,
        strategy: &mut dyn FftStrategy<T>,
        scratch: &mut [Complex<T>],
        reps: usize,
    ) -> Option<f64> {
        strategy.awake(AwakeMode::for_precision::<T>()).ok()?;
        let start = Instant::now();
        let mut status = Ok(());
        for _ in 0..reps {
            status = strategy.execute(scratch);
            if status.is_err() {
                break;
            }
        }
        let elapsed = start.elapsed().as_secs_f64();
        strategy.sleep();
        status.ok()?;
        Some(elapsed / reps as f64)
    }

    fn rank(
        &self,
        ctx: &mut SearchContext,
        n: usize,
        howmany: usize,
    ) -> Result<Option<Vec<(StrategyDescriptor, f64)>>, FftError> {
        let search = ctx.search_flags();
        let candidates =
            StrategyDescriptor::enumerate(n, search.quadratic_limit(), search.transpose_methods());
        let mut ranked = Vec::with_capacity(candidates.len());
        if search.timing_reps == 0 {
            for descriptor in candidates {
                ranked.push((descriptor, descriptor.op_count() * howmany as f64));
            }
        } else {
            let mut scratch = try_vec![Complex::<T>::default(); n * howmany];
            for (i, dst) in scratch.iter_mut().enumerate() {
                *dst = Complex::new(T::from_trig((i % 7) as f64), T::from_trig((i % 3) as f64));
            }
            for descriptor in candidates {
                if ctx.time_exhausted() {
                    return Ok(None);
                }
                let Some(mut strategy) = descriptor.instantiate::<T>(ctx.direction, &self.geometry)
                else {
                    continue;
                };
                if let Some(cost) = self.measure(strategy.as_mut(), &mut scratch, search.timing_reps)
                {
                    ranked.push((descriptor, cost));
                }
            }
        }
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(Some(ranked))
    }
}

impl<T: FftSample> PlanBuilder<T> for SolverSearch<T> {
    fn build(&mut self, ctx: &mut SearchContext, problem: &Problem) -> Attempt<T> {
        let search = ctx.search_flags();
        let key = problem.signature(ctx.direction);
        let Some((n, howmany)) = problem.contiguous_rank1() else {
            return match ctx.policy {
                WisdomPolicy::Only => Attempt::Unavailable,
                _ => Attempt::Infeasible,
            };
        };

        // Later candidates are alternatives to the recorded best one.
        let consult = ctx.candidate_index == 0 && ctx.policy != WisdomPolicy::IgnoreAll;
        if consult {
            match self.wisdom.lookup(&key, search.patience) {
                Some(Solution::Recorded { descriptor, cost }) => {
                    return self.from_wisdom(ctx, &key, n, descriptor, cost);
                }
                Some(Solution::Infeasible) if ctx.policy != WisdomPolicy::IgnoreInfeasible => {
                    return match ctx.policy {
                        WisdomPolicy::Only => Attempt::Unavailable,
                        _ => Attempt::Infeasible,
                    };
                }
                _ => {}
            }
        }
        if ctx.policy == WisdomPolicy::Only {
            return Attempt::Unavailable;
        }

        if ctx.time_exhausted() {
            return Attempt::Infeasible;
        }
        let ranked = match self.rank(ctx, n, howmany) {
            Ok(Some(ranked)) => ranked,
            Ok(None) => {
                log::debug!("Search for {key} ran out of time");
                return Attempt::Infeasible;
            }
            Err(err) => {
                log::warn!("Search for {key} failed: {err}");
                return Attempt::Infeasible;
            }
        };
        if ranked.is_empty() {
            if ctx.candidate_index == 0 {
                self.wisdom
                    .record(&key, search.patience, Solution::Infeasible, search.is_blessing());
            }
            return Attempt::Infeasible;
        }

        let (descriptor, cost) = ranked[ctx.candidate_index.min(ranked.len() - 1)];
        let Some(strategy) = descriptor.instantiate::<T>(ctx.direction, &self.geometry) else {
            return Attempt::Infeasible;
        };
        log::debug!(
            "Selected {} for {key} at {:?}, cost {cost}",
            descriptor.name(),
            search.patience
        );
        if ctx.candidate_index == 0 {
            self.wisdom.record(
                &key,
                search.patience,
                Solution::Recorded { descriptor, cost },
                search.is_blessing(),
            );
        }
        Attempt::Built(Plan::new(strategy, cost, ctx.flags))
    }

    fn forget(&mut self, scope: ForgetScope) {
        self.wisdom.forget(scope);
    }

    fn import_wisdom(&mut self, path: &Path) -> Result<bool, FftError> {
        if !path.exists() {
            return Ok(false);
        }
        Ok(self.wisdom.import_from_path(path)? > 0)
    }

    fn export_wisdom(&self, path: &Path) -> Result<(), FftError> {
        self.wisdom.export_to_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Patience;

    fn context(flags: PlanFlags, policy: WisdomPolicy) -> SearchContext {
        let mut ctx = SearchContext::new(FftDirection::Forward, None);
        ctx.flags = flags;
        ctx.policy = policy;
        ctx
    }

    #[test]
    fn test_estimate_records_wisdom() {
        let mut search = SolverSearch::<f64>::default();
        let problem = Problem::dft_1d(256).unwrap();
        let mut ctx = context(PlanFlags::ESTIMATE, WisdomPolicy::Normal);
        let Attempt::Built(plan) = search.build(&mut ctx, &problem) else {
            panic!("estimate must always succeed");
        };
        assert_eq!(
            plan.strategy().descriptor(),
            StrategyDescriptor::Radix2 { n: 256 }
        );
        assert_eq!(search.wisdom().len(), 1);
        let entry = &search.wisdom().entries()[0];
        assert_eq!(entry.patience, Patience::Estimate);
        assert!(!entry.blessed);
    }

    #[test]
    fn test_wisdom_only() {
        let mut search = SolverSearch::<f32>::default();
        let problem = Problem::dft_1d(64).unwrap();
        let mut ctx = context(PlanFlags::MEASURE, WisdomPolicy::Only);
        assert!(matches!(
            search.build(&mut ctx, &problem),
            Attempt::Unavailable
        ));
        assert!(search.wisdom().is_empty());

        let mut ctx = context(PlanFlags::PATIENT, WisdomPolicy::Normal);
        assert!(search.build(&mut ctx, &problem).is_built());
        let mut ctx = context(PlanFlags::MEASURE, WisdomPolicy::Only);
        assert!(search.build(&mut ctx, &problem).is_built());
    }

    #[test]
    fn test_unusable_wisdom_is_inconsistent() {
        let mut search = SolverSearch::<f64>::default();
        let problem = Problem::dft_1d(64).unwrap();
        let key = problem.signature(FftDirection::Forward);
        search.wisdom_mut().record(
            &key,
            Patience::Estimate,
            Solution::Recorded {
                descriptor: StrategyDescriptor::Radix2 { n: 32 },
                cost: 1.,
            },
            false,
        );
        let mut ctx = context(PlanFlags::ESTIMATE, WisdomPolicy::Normal);
        assert!(matches!(
            search.build(&mut ctx, &problem),
            Attempt::Inconsistent
        ));
        let mut ctx = context(PlanFlags::ESTIMATE, WisdomPolicy::IgnoreAll);
        assert!(search.build(&mut ctx, &problem).is_built());
    }

    #[test]
    fn test_infeasible_marker() {
        let mut search = SolverSearch::<f64>::default();
        let problem = Problem::dft_1d(9).unwrap();
        let key = problem.signature(FftDirection::Forward);
        search
            .wisdom_mut()
            .record(&key, Patience::Measure, Solution::Infeasible, false);
        let mut ctx = context(PlanFlags::MEASURE, WisdomPolicy::Normal);
        assert!(matches!(
            search.build(&mut ctx, &problem),
            Attempt::Infeasible
        ));
        let mut ctx = context(PlanFlags::MEASURE, WisdomPolicy::IgnoreInfeasible);
        assert!(search.build(&mut ctx, &problem).is_built());
    }

    #[test]
    fn test_blessing_on_hit() {
        let mut search = SolverSearch::<f64>::default();
        let problem = Problem::dft_1d(16).unwrap();
        let mut ctx = context(PlanFlags::ESTIMATE, WisdomPolicy::Normal);
        assert!(search.build(&mut ctx, &problem).is_built());
        ctx.hash_info = HashInfo::BLESSING;
        assert!(search.build(&mut ctx, &problem).is_built());
        search.forget(ForgetScope::Accursed);
        assert_eq!(search.wisdom().len(), 1);
    }

    #[test]
    fn test_timeout_spares_estimates() {
        let mut search = SolverSearch::<f32>::default();
        let problem = Problem::dft_1d(32).unwrap();
        let mut ctx = SearchContext::new(FftDirection::Inverse, Some(Duration::ZERO));
        ctx.flags = PlanFlags::MEASURE;
        assert!(matches!(
            search.build(&mut ctx, &problem),
            Attempt::Infeasible
        ));
        assert!(ctx.timed_out);
        ctx.flags = PlanFlags::ESTIMATE;
        assert!(search.build(&mut ctx, &problem).is_built());
    }

    #[test]
    fn test_candidate_index_walks_ranking() {
        let mut search = SolverSearch::<f64>::default();
        let problem = Problem::dft_1d(64).unwrap();
        let mut ctx = context(PlanFlags::ESTIMATE, WisdomPolicy::Normal);
        let mut costs = Vec::new();
        for index in 0..8 {
            ctx.candidate_index = index;
            let Attempt::Built(plan) = search.build(&mut ctx, &problem) else {
                panic!("estimate must always succeed");
            };
            costs.push(plan.pcost());
        }
        assert!(costs.windows(2).all(|x| x[0] <= x[1]));
        assert_eq!(search.wisdom().len(), 1);
    }

    #[test]
    fn test_strided_problem_is_infeasible() {
        let mut search = SolverSearch::<f64>::default();
        let problem = Problem::new(
            crate::problem::ProblemKind::Dft,
            crate::problem::Tensor::new(vec![crate::problem::IoDim::new(8, 2, 2)]),
            crate::problem::Tensor::rank0(),
        )
        .unwrap();
        let mut ctx = context(PlanFlags::ESTIMATE, WisdomPolicy::Normal);
        assert!(matches!(
            search.build(&mut ctx, &problem),
            Attempt::Infeasible
        ));
    }
}
