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
use num_traits::{Float, MulAdd};
use std::fmt::Debug;

pub trait FftTrigonometry {
    /// Returns `(sin(pi * self), cos(pi * self))`.
    fn sincos_pi(self) -> (Self, Self)
    where
        Self: Sized;
}

impl FftTrigonometry for f64 {
    #[inline]
    fn sincos_pi(self) -> (f64, f64) {
        // exact at the quarter turns, where the product with PI would drift
        let doubled = self * 2.;
        if doubled == doubled.round() {
            return match (doubled as i64).rem_euclid(4) {
                0 => (0., 1.),
                1 => (1., 0.),
                2 => (0., -1.),
                _ => (-1., 0.),
            };
        }
        (self * std::f64::consts::PI).sin_cos()
    }
}

impl FftTrigonometry for f32 {
    #[inline]
    fn sincos_pi(self) -> (f32, f32) {
        let (s, c) = (self as f64).sincos_pi();
        (s as f32, c as f32)
    }
}

/// Scalar type a plan can execute on.
pub trait FftSample:
    Float + FftTrigonometry + MulAdd<Self, Output = Self> + Default + Debug + Send + Sync + 'static
{
    /// Narrows a value computed in trigonometric (`f64`) precision.
    fn from_trig(value: f64) -> Self;
}

impl FftSample for f32 {
    #[inline]
    fn from_trig(value: f64) -> Self {
        value as f32
    }
}

impl FftSample for f64 {
    #[inline]
    fn from_trig(value: f64) -> Self {
        value
    }
}
