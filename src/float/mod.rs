// This file is part of FLOAT-CIRCUITS.
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Unsigned floating-point numbers in-circuit.
//!
//! A float of scale `p` is an (exponent, mantissa) pair. The exponent is
//! either `0`, in which case the mantissa must be `0` too and the pair
//! represents the value zero, or a non-zero `k`-bit integer, in which case
//! the mantissa must be normalized, i.e. in `[2^p, 2^(p+1))`, and the pair
//! represents the value `mantissa * 2^(exponent - p)`.
//!
//! There is no sign, all representable values are non-negative.

pub mod cpu;
mod float_gadget;

pub use float_gadget::FloatGadget;

use ff::PrimeField;
use halo2_proofs::circuit::Value;

use crate::{
    types::{AssignedNative, InnerValue},
    utils::util::fe_to_u64,
};

/// The shape parameters of a float format: the number of exponent bits `k`
/// and the mantissa scale `p`. They are fixed per circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloatParams {
    exponent_bits: u32,
    mantissa_bits: u32,
}

impl FloatParams {
    /// Creates a new set of float parameters.
    ///
    /// # Panics
    ///
    /// If `exponent_bits` or `mantissa_bits` is zero.
    pub fn new(exponent_bits: u32, mantissa_bits: u32) -> Self {
        assert!(exponent_bits > 0, "the exponent needs at least one bit");
        assert!(mantissa_bits > 0, "the mantissa scale must be positive");
        FloatParams {
            exponent_bits,
            mantissa_bits,
        }
    }

    /// The number of exponent bits, `k`.
    pub fn exponent_bits(&self) -> u32 {
        self.exponent_bits
    }

    /// The mantissa scale, `p`. A normalized mantissa occupies `p + 1` bits.
    pub fn mantissa_bits(&self) -> u32 {
        self.mantissa_bits
    }

    // The bit position of the leading mantissa bit after normalizing an
    // aligned sum, 2p + 1. An unnormalized sum of two aligned mantissas
    // occupies at most 2p + 2 bits.
    pub(crate) fn sum_msb(&self) -> u32 {
        2 * self.mantissa_bits + 1
    }

    // The shift that brings a normalized sum back to scale p, p + 1.
    pub(crate) fn round_shift(&self) -> u32 {
        self.mantissa_bits + 1
    }

    // The number of bits of the magnitude key e * 2^(p+1) + m.
    pub(crate) fn magnitude_bits(&self) -> u32 {
        self.exponent_bits + self.mantissa_bits + 1
    }
}

/// An unsigned floating-point value, off-circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Float {
    /// The exponent, `0` or a `k`-bit integer.
    pub exponent: u64,
    /// The mantissa, `0` or an integer in `[2^p, 2^(p+1))`.
    pub mantissa: u64,
}

impl Float {
    /// Creates a new float from its raw parts. No well-formedness check is
    /// performed, use [cpu::is_well_formed] for that.
    pub fn new(exponent: u64, mantissa: u64) -> Self {
        Float { exponent, mantissa }
    }

    /// The representation of the value zero.
    pub fn zero() -> Self {
        Float {
            exponent: 0,
            mantissa: 0,
        }
    }

    /// The represented value, as an `f64` approximation.
    pub fn to_f64(&self, params: &FloatParams) -> f64 {
        if self.exponent == 0 {
            return 0.0;
        }
        let scale = self.exponent as i64 - params.mantissa_bits() as i64;
        (self.mantissa as f64) * 2f64.powi(scale as i32)
    }
}

/// An assigned floating-point value: a pair of assigned native elements
/// holding the exponent and the mantissa.
#[derive(Clone, Debug)]
pub struct AssignedFloat<F: PrimeField> {
    pub(crate) exponent: AssignedNative<F>,
    pub(crate) mantissa: AssignedNative<F>,
}

impl<F: PrimeField> AssignedFloat<F> {
    /// CAUTION: use only if you know what you are doing!
    ///
    /// Builds an assigned float from raw components *without* adding any
    /// well-formedness constraint. The caller is responsible for asserting
    /// well-formedness before handing the result to other gadgets.
    pub fn from_parts_unsafe(exponent: AssignedNative<F>, mantissa: AssignedNative<F>) -> Self {
        AssignedFloat { exponent, mantissa }
    }

    /// The assigned exponent.
    pub fn exponent(&self) -> &AssignedNative<F> {
        &self.exponent
    }

    /// The assigned mantissa.
    pub fn mantissa(&self) -> &AssignedNative<F> {
        &self.mantissa
    }
}

impl<F: PrimeField> InnerValue for AssignedFloat<F> {
    type Element = Float;

    fn value(&self) -> Value<Float> {
        self.exponent
            .value()
            .zip(self.mantissa.value())
            .map(|(e, m)| Float {
                exponent: fe_to_u64(*e),
                mantissa: fe_to_u64(*m),
            })
    }
}
