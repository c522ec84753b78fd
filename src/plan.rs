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
use crate::flags::PlanFlags;
use crate::strategy::FftStrategy;
use crate::trig::AwakeMode;
use crate::FftError;
use num_complex::Complex;
use std::mem::ManuallyDrop;

/// Compiled, dormant strategy for one problem shape.
///
/// A dormant plan holds no trigonometric tables and cannot execute; see
/// [`Plan::awaken`].
pub struct Plan<T> {
    strategy: Box<dyn FftStrategy<T>>,
    pcost: f64,
    flags: PlanFlags,
}

impl<T> Plan<T> {
    pub fn new(strategy: Box<dyn FftStrategy<T>>, pcost: f64, flags: PlanFlags) -> Plan<T> {
        Plan {
            strategy,
            pcost,
            flags,
        }
    }

    /// Measured or estimated cost recorded by the search.
    pub fn pcost(&self) -> f64 {
        self.pcost
    }

    pub fn set_pcost(&mut self, pcost: f64) {
        self.pcost = pcost;
    }

    /// Flags the plan was constructed under.
    pub fn flags(&self) -> PlanFlags {
        self.flags
    }

    pub fn strategy(&self) -> &dyn FftStrategy<T> {
        self.strategy.as_ref()
    }

    /// Materializes the tables and returns the executable form.
    ///
    /// On failure the plan is handed back still asleep.
    pub fn awaken(mut self, mode: AwakeMode) -> Result<ActivePlan<T>, (Plan<T>, FftError)> {
        match self.strategy.awake(mode) {
            Ok(()) => Ok(ActivePlan {
                plan: ManuallyDrop::new(self),
            }),
            Err(err) => {
                self.strategy.sleep();
                Err((self, err))
            }
        }
    }
}

/// Awake plan. Dropping it puts the strategy back to sleep first.
pub struct ActivePlan<T> {
    plan: ManuallyDrop<Plan<T>>,
}

impl<T> ActivePlan<T> {
    pub fn pcost(&self) -> f64 {
        self.plan.pcost
    }

    pub fn flags(&self) -> PlanFlags {
        self.plan.flags
    }

    pub fn strategy(&self) -> &dyn FftStrategy<T> {
        self.plan.strategy.as_ref()
    }

    pub fn execute(&self, data: &mut [Complex<T>]) -> Result<(), FftError> {
        self.plan.strategy.execute(data)
    }

    /// Releases the tables, giving the dormant plan back.
    pub fn sleep(self) -> Plan<T> {
        let mut this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the plan is moved out exactly once.
        let mut plan = unsafe { ManuallyDrop::take(&mut this.plan) };
        plan.strategy.sleep();
        plan
    }
}

impl<T> Drop for ActivePlan<T> {
    fn drop(&mut self) {
        self.plan.strategy.sleep();
        // SAFETY: drop runs once and `plan` is not touched afterwards.
        unsafe { ManuallyDrop::drop(&mut self.plan) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyDescriptor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub(crate) struct Counters {
        pub awake: AtomicUsize,
        pub sleep: AtomicUsize,
    }

    pub(crate) struct CountingStrategy {
        counters: Arc<Counters>,
        awake: bool,
    }

    impl CountingStrategy {
        pub(crate) fn new(counters: Arc<Counters>) -> CountingStrategy {
            CountingStrategy {
                counters,
                awake: false,
            }
        }
    }

    impl FftStrategy<f32> for CountingStrategy {
        fn descriptor(&self) -> StrategyDescriptor {
            StrategyDescriptor::Dft { n: 1 }
        }

        fn length(&self) -> usize {
            1
        }

        fn awake(&mut self, _: AwakeMode) -> Result<(), FftError> {
            self.awake = true;
            self.counters.awake.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn sleep(&mut self) {
            self.awake = false;
            self.counters.sleep.fetch_add(1, Ordering::Relaxed);
        }

        fn execute(&self, _: &mut [Complex<f32>]) -> Result<(), FftError> {
            if self.awake {
                Ok(())
            } else {
                Err(FftError::PlanIsAsleep)
            }
        }
    }

    #[test]
    fn test_drop_puts_plan_to_sleep() {
        let counters = Arc::new(Counters::default());
        let plan = Plan::new(
            Box::new(CountingStrategy::new(counters.clone())),
            2.,
            PlanFlags::ESTIMATE,
        );
        let active = plan.awaken(AwakeMode::SinCos).map_err(|x| x.1).unwrap();
        active.execute(&mut []).unwrap();
        drop(active);
        assert_eq!(counters.awake.load(Ordering::Relaxed), 1);
        assert_eq!(counters.sleep.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_sleep_returns_dormant_plan() {
        let counters = Arc::new(Counters::default());
        let plan = Plan::new(
            Box::new(CountingStrategy::new(counters.clone())),
            5.,
            PlanFlags::MEASURE,
        );
        let active = plan.awaken(AwakeMode::SqrtNTable).map_err(|x| x.1).unwrap();
        assert_eq!(active.pcost(), 5.);
        let dormant = active.sleep();
        assert_eq!(counters.sleep.load(Ordering::Relaxed), 1);
        assert!(matches!(
            dormant.strategy().execute(&mut []),
            Err(FftError::PlanIsAsleep)
        ));
        assert_eq!(dormant.flags(), PlanFlags::MEASURE);
        drop(dormant);
        assert_eq!(counters.sleep.load(Ordering::Relaxed), 1);
    }
}
