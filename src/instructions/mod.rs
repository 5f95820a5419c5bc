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

//! Set of instructions interfaces.
pub mod arithmetic;
pub mod assertions;
pub mod assignments;
pub mod binary;
pub mod comparison;
pub mod control_flow;
pub mod conversions;
pub mod decomposition;
pub mod equality;
pub mod float;
pub mod native;
pub mod zero;

pub use arithmetic::ArithInstructions;
pub use assertions::AssertionInstructions;
pub use assignments::AssignmentInstructions;
pub use binary::BinaryInstructions;
pub use comparison::ComparisonInstructions;
pub use control_flow::ControlFlowInstructions;
pub use conversions::{ConversionInstructions, UnsafeConversionInstructions};
pub use decomposition::DecompositionInstructions;
pub use equality::EqualityInstructions;
pub use float::FloatInstructions;
pub use native::NativeInstructions;
pub use zero::ZeroInstructions;
