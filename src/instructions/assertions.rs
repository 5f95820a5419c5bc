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

//! Assertion instructions interface.
//!
//! It provides functions for (dis)equality assertions for values of type
//! `Assigned` (a generic of this trait that implements [InnerValue]).
//! Furthermore, assertions between `Assigned` elements and fixed values of
//! type `Assigned::Element`.

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::types::InnerValue;

/// The set of circuit instructions for assertion operations.
pub trait AssertionInstructions<F, Assigned>
where
    F: PrimeField,
    Assigned: InnerValue,
{
    /// Ensures that the given assigned elements are the same.
    fn assert_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        y: &Assigned,
    ) -> Result<(), Error>;

    /// Ensures that the given assigned elements are different.
    fn assert_not_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        y: &Assigned,
    ) -> Result<(), Error>;

    /// Ensures that the given assigned element is equal to the given constant.
    fn assert_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        constant: Assigned::Element,
    ) -> Result<(), Error>;

    /// Ensures that the given assigned element is different from the given
    /// constant.
    fn assert_not_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        constant: Assigned::Element,
    ) -> Result<(), Error>;
}
