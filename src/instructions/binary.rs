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

//! Binary instructions interface.
//!
//! It provides functions for performing Boolean operations over [AssignedBit]s.

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::types::AssignedBit;

/// The set of circuit instructions for binary operations.
pub trait BinaryInstructions<F: PrimeField> {
    /// Conjunction of the given assigned bits.
    ///
    /// # Panics
    ///
    /// If `bits.len() == 0`.
    fn and(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error>;

    /// Disjunction of the given assigned bits.
    ///
    /// # Panics
    ///
    /// If `bits.len() == 0`.
    fn or(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error>;

    /// Exclusive-OR of all the given assigned bits.
    ///
    /// # Panics
    ///
    /// If `bits.len() == 0`.
    fn xor(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error>;

    /// Negation of the given assigned bit.
    fn not(
        &self,
        layouter: &mut impl Layouter<F>,
        bit: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error>;
}
