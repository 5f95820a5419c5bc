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

//! Halo2 gadgets for floating-point arithmetic over prime fields.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

pub mod instructions;
mod utils;

pub mod field;
pub mod float;

// Re-exporting the proof system for convenience and usability.
pub use halo2_proofs;

/// Tools useful for testing
pub mod testing_utils {
    #[cfg(any(test, feature = "testing"))]
    pub use crate::utils::{types::Sampleable, util::FromScratch};
}

/// Types for assigned circuit values and non-assigned counterparts, and traits
/// for treating with them generically.
pub mod types {
    pub use crate::{
        field::{
            native::{AssignedBit, AssignedBounded},
            AssignedNative,
        },
        float::{AssignedFloat, Float, FloatParams},
        utils::{
            types::{InnerConstants, InnerValue},
            ComposableChip,
        },
    };
}
