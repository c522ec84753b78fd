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
use crate::transpose::TransposeMethod;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Planning request flags.
    ///
    /// Exactly one patience bit is meaningful; with none set the planner
    /// behaves as if [`PlanFlags::MEASURE`] was given.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct PlanFlags: u32 {
        const MEASURE = 1 << 0;
        const ESTIMATE = 1 << 1;
        const PATIENT = 1 << 2;
        const EXHAUSTIVE = 1 << 3;
        /// Return a plan only when wisdom for the problem is present.
        const WISDOM_ONLY = 1 << 4;

        const PATIENCE = Self::ESTIMATE.bits()
            | Self::MEASURE.bits()
            | Self::PATIENT.bits()
            | Self::EXHAUSTIVE.bits();
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct HashInfo: u32 {
        /// Marks wisdom produced by the call as authoritative.
        const BLESSING = 1 << 0;
    }
}

/// Planning effort, ordered from cheapest to most thorough.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Patience {
    Estimate,
    Measure,
    Patient,
    Exhaustive,
}

impl Patience {
    pub const LEVELS: [Patience; 4] = [
        Patience::Estimate,
        Patience::Measure,
        Patience::Patient,
        Patience::Exhaustive,
    ];

    pub fn level(self) -> usize {
        self as usize
    }

    pub fn flag(self) -> PlanFlags {
        match self {
            Patience::Estimate => PlanFlags::ESTIMATE,
            Patience::Measure => PlanFlags::MEASURE,
            Patience::Patient => PlanFlags::PATIENT,
            Patience::Exhaustive => PlanFlags::EXHAUSTIVE,
        }
    }
}

impl PlanFlags {
    /// Most thorough patience requested, `ESTIMATE` taking precedence.
    pub fn patience(self) -> Patience {
        if self.contains(PlanFlags::ESTIMATE) {
            Patience::Estimate
        } else if self.contains(PlanFlags::EXHAUSTIVE) {
            Patience::Exhaustive
        } else if self.contains(PlanFlags::PATIENT) {
            Patience::Patient
        } else {
            Patience::Measure
        }
    }

    pub fn without_patience(self) -> PlanFlags {
        self.difference(PlanFlags::PATIENCE)
    }

    pub fn with_patience(self, patience: Patience) -> PlanFlags {
        self.without_patience() | patience.flag()
    }

    /// Drops every patience bit but `ESTIMATE`.
    pub fn force_estimator(self) -> PlanFlags {
        self.with_patience(Patience::Estimate)
    }
}

/// Search parameters derived from the request flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchFlags {
    pub patience: Patience,
    pub hash_info: HashInfo,
    /// Timed executions per measured candidate; zero means estimate only.
    pub timing_reps: usize,
    /// Admits candidates whose operation count grows quadratically.
    pub admit_expensive: bool,
}

const EXPENSIVE_LIMIT: usize = 64;

impl SearchFlags {
    pub fn map(flags: PlanFlags, hash_info: HashInfo) -> SearchFlags {
        let patience = flags.patience();
        let timing_reps = match patience {
            Patience::Estimate => 0,
            Patience::Measure => 1,
            Patience::Patient => 3,
            Patience::Exhaustive => 5,
        };
        SearchFlags {
            patience,
            hash_info,
            timing_reps,
            admit_expensive: patience == Patience::Exhaustive,
        }
    }

    pub fn is_blessing(&self) -> bool {
        self.hash_info.contains(HashInfo::BLESSING)
    }

    /// Transposition methods a square decomposition is tried with.
    pub fn transpose_methods(&self) -> &'static [TransposeMethod] {
        match self.patience {
            Patience::Estimate => &[TransposeMethod::Tiled],
            Patience::Measure => &[TransposeMethod::Tiled, TransposeMethod::TiledBuf],
            Patience::Patient | Patience::Exhaustive => &TransposeMethod::ALL,
        }
    }

    pub(crate) fn quadratic_limit(&self) -> usize {
        if self.admit_expensive {
            usize::MAX
        } else {
            EXPENSIVE_LIMIT
        }
    }
}
