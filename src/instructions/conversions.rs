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

//! Conversion instructions interface.
//!
//! It provides functions to convert between two types and their assigned
//! counterparts.
//!
//! The trait is parametrised by the source and target types, `AssignedSource`
//! and `AssignedTarget` respectively.

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::types::InnerValue;

/// The set of circuit instructions for conversion operations.
pub trait ConversionInstructions<F, AssignedSource, AssignedTarget>
where
    F: PrimeField,
    AssignedSource: InnerValue,
    AssignedTarget: InnerValue,
{
    /// Converts an AssignedSource::Element into an AssignedTarget::Element,
    /// returns `None` if the conversion failed.
    // We choose to require this conversion at the chip level to have flexilibity.
    // Different chips may convert between the same types in different ways.
    // If that were not the case, we could alternatively perform the conversion at
    // the type level.
    fn convert_value(&self, x: &AssignedSource::Element) -> Option<AssignedTarget::Element>;

    /// Converts an AssignedSource into an AssignedTarget.
    fn convert(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedSource,
    ) -> Result<AssignedTarget, Error>;
}

/// The set of circuit instructions for unsafe conversion operations.
pub trait UnsafeConversionInstructions<F, AssignedSource, AssignedTarget>:
    ConversionInstructions<F, AssignedSource, AssignedTarget>
where
    F: PrimeField,
    AssignedSource: InnerValue,
    AssignedTarget: InnerValue,
{
    /// Converts an AssignedSource element into an AssignedTarget one.
    /// Potentially more efficient than `convert`, but see the warning below.
    ///
    /// # WARNING
    ///
    /// This function does not guarantee that the target object is built
    /// correctly. Make sure you know what you are doing if you use this
    /// function, e.g. you know that the source element has been sufficiently
    /// restricted so that the resulting target element is properly constrained.
    fn convert_unsafe(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedSource,
    ) -> Result<AssignedTarget, Error>;
}
