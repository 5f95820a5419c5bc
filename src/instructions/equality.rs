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

//! Equality instructions interface.
//!
//! It provides functions for checking (dis)equality of assigned values in the
//! circuit.
//!
//! This trait is parametrized by a generic `Assigned` (required to implement
//! [InnerValue]) which defines the type over which we check equality.

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::types::{AssignedBit, InnerValue};

/// The set of circuit instructions for equality operations.
pub trait EqualityInstructions<F, Assigned>
where
    F: PrimeField,
    Assigned: InnerValue,
{
    /// Returns `1` if the elements are equal, returns `0` otherwise.
    fn is_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        y: &Assigned,
    ) -> Result<AssignedBit<F>, Error>;

    /// Returns `1` iff the given element equals the given constant.
    fn is_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        constant: Assigned::Element,
    ) -> Result<AssignedBit<F>, Error>;
}
