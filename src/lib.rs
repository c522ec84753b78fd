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
#![cfg_attr(docsrs, feature(doc_cfg))]
//! Self-tuning FFT planning.
//!
//! A [`Planner`] searches execution strategies for a [`Problem`] at
//! increasing patience, remembers what it measured as wisdom, and hands out
//! an awake [`ApiPlan`] ready to execute. The in-place square transposition
//! engine the square decomposition relies on is exposed on its own.
mod api;
mod app_layer;
mod dft;
mod err;
mod flags;
mod four_step;
mod plan;
mod planner;
mod problem;
mod radix2;
mod search;
mod strategy;
mod tile;
mod traits;
mod transpose;
mod trig;
mod util;
mod wisdom;

pub use api::ApiPlan;
pub use app_layer::AppLayerConfig;
pub use err::FftError;
pub use flags::{HashInfo, Patience, PlanFlags, SearchFlags};
pub use plan::{ActivePlan, Plan};
pub use planner::{Planner, PlannerConfig, PlannerHook};
pub use problem::{IoDim, Problem, ProblemKind, SplitBinding, Tensor};
pub use search::{Attempt, PlanBuilder, SearchContext, SolverSearch};
pub use strategy::{FftStrategy, InnerKernel, StrategyDescriptor};
pub use tile::CacheGeometry;
pub use traits::{FftSample, FftTrigonometry};
pub use transpose::{
    TransposeMethod, transpose, transpose_tiled, transpose_tiled_with, transpose_tiledbuf,
    transpose_tiledbuf_with,
};
pub use trig::AwakeMode;
pub use util::alignment_of;
pub use wisdom::{ForgetScope, Solution, WisdomEntry, WisdomPolicy, WisdomStore};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum FftDirection {
    Forward,
    Inverse,
}

impl FftDirection {
    /// Sign of the exponent: `-1` forward, `+1` inverse.
    pub fn sign(self) -> i32 {
        match self {
            FftDirection::Forward => -1,
            FftDirection::Inverse => 1,
        }
    }

    pub fn inverse(self) -> FftDirection {
        match self {
            FftDirection::Forward => FftDirection::Inverse,
            FftDirection::Inverse => FftDirection::Forward,
        }
    }
}
