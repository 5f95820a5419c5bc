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

//! Chip and gadget for native field arithmetic.

mod native_chip;
mod native_gadget;

use ff::PrimeField;
use halo2_proofs::circuit::Value;
pub use native_chip::{NativeChip, NativeConfig};
pub use native_gadget::{AssignedBounded, NativeGadget};
#[cfg(any(test, feature = "testing"))]
use rand::RngCore;

use crate::{
    field::AssignedNative,
    types::{InnerConstants, InnerValue},
};
#[cfg(any(test, feature = "testing"))]
use crate::utils::types::Sampleable;

/// An assigned value that is constrained to be `0` or `1`.
///
/// The only entry points to this type are instructions that enforce the
/// Boolean constraint, so downstream code can rely on its value being a bit.
#[derive(Clone, Debug)]
pub struct AssignedBit<F: PrimeField>(pub(crate) AssignedNative<F>);

impl<F: PrimeField> From<&AssignedBit<F>> for AssignedNative<F> {
    fn from(bit: &AssignedBit<F>) -> Self {
        bit.0.clone()
    }
}

impl<F: PrimeField> InnerValue for AssignedBit<F> {
    type Element = bool;

    fn value(&self) -> Value<bool> {
        self.0.value().map(|v| *v != F::ZERO)
    }
}

impl<F: PrimeField> InnerConstants for AssignedBit<F> {
    fn inner_zero() -> bool {
        false
    }

    fn inner_one() -> bool {
        true
    }
}

#[cfg(any(test, feature = "testing"))]
impl<F: PrimeField> Sampleable for AssignedBit<F> {
    fn sample_inner(mut rng: impl RngCore) -> bool {
        rng.next_u32() % 2 == 0
    }
}
